//! Multi-file bytecode aggregation: strips blank/comment lines, records
//! `#define`/`#main` directives, and concatenates the remainder for the VM
//! to scan into classes.

use rustc_hash::FxHashMap;

use glyph_core::LoadError;

#[derive(Debug, Default)]
pub struct Program {
    lines: Vec<String>,
    definitions: FxHashMap<String, String>,
    main_class: Option<String>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one source file's raw lines into the program, stripping blanks
    /// and `;`-comments and recording any `#define`/`#main` directives.
    ///
    /// The original loader only ever records `#define` values; nothing in
    /// the reference implementation substitutes them back into later lines,
    /// so this keeps the same "store, don't expand" behavior rather than
    /// inventing a textual substitution pass the spec doesn't actually show.
    pub fn add_source(&mut self, lines: &[&str]) -> Result<(), LoadError> {
        for raw in lines {
            let trimmed = raw.trim_start();
            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }

            let args: Vec<&str> = trimmed.split_whitespace().collect();
            match args.first().copied() {
                Some("#define") => {
                    let key = args.get(1).copied().unwrap_or_default().to_string();
                    if self.definitions.contains_key(&key) {
                        return Err(LoadError::DuplicateDefinition { key });
                    }
                    let value = args[2.min(args.len())..].join(" ");
                    self.definitions.insert(key, value);
                }
                Some("#main") => {
                    self.main_class = Some(args.get(1).copied().unwrap_or_default().to_string());
                }
                _ => self.lines.push(trimmed.to_string()),
            }
        }
        Ok(())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn definition(&self, key: &str) -> Option<&str> {
        self.definitions.get(key).map(String::as_str)
    }

    pub fn main_class(&self) -> Option<&str> {
        self.main_class.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_blank_and_comment_lines() {
        let mut program = Program::new();
        program.add_source(&["", "; a comment", "  cdef Main", "   "]).unwrap();
        assert_eq!(program.lines(), &["cdef Main".to_string()]);
    }

    #[test]
    fn records_define_and_main() {
        let mut program = Program::new();
        program.add_source(&["#define VERSION 1.0", "#main Main", "cdef Main"]).unwrap();
        assert_eq!(program.definition("VERSION"), Some("1.0"));
        assert_eq!(program.main_class(), Some("Main"));
        assert_eq!(program.lines(), &["cdef Main".to_string()]);
    }

    #[test]
    fn duplicate_define_is_a_load_error() {
        let mut program = Program::new();
        program.add_source(&["#define VERSION 1.0"]).unwrap();
        let err = program.add_source(&["#define VERSION 2.0"]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateDefinition { .. }));
    }

    #[test]
    fn concatenates_multiple_sources_in_order() {
        let mut program = Program::new();
        program.add_source(&["cdef A", "cbegin", "cend"]).unwrap();
        program.add_source(&["cdef B", "cbegin", "cend"]).unwrap();
        assert_eq!(program.lines().len(), 6);
        assert_eq!(program.lines()[0], "cdef A");
        assert_eq!(program.lines()[3], "cdef B");
    }
}
