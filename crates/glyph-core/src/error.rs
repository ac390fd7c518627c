//! Unified error types shared across the toolchain.
//!
//! Each phase (lex, parse, build, load, execute) has its own error type;
//! [`CoreError`] wraps them for callers that want one `Result` alias across
//! phase boundaries.
//!
//! ```text
//! CoreError (top-level wrapper)
//! ├── LexError      - Tokenizer errors
//! ├── ParseError    - Parser errors (with ParseErrorKind)
//! ├── BuildError    - Package/node-builder errors (duplicate names)
//! ├── LoadError     - Bytecode loader errors (redefinition, malformed section)
//! └── RuntimeError  - VM execution errors (missing class/method)
//! ```

use thiserror::Error;

use crate::Span;

/// Maximum number of characters of source context shown around a diagnostic caret.
pub const MAX_ERROR_LINE_LENGTH: usize = 30;

// ============================================================================
// Lexer errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("invalid escape sequence at {span}")]
    InvalidEscape { span: Span },

    #[error("unterminated literal at {span}")]
    UnterminatedLiteral { span: Span },

    #[error("multiple dot symbols in number at {span}")]
    MultipleDots { span: Span },

    #[error("{type_name} cannot have a floating-point value at {span}")]
    FractionalOnIntegerSuffix { span: Span, type_name: &'static str },

    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::InvalidEscape { span }
            | LexError::UnterminatedLiteral { span }
            | LexError::MultipleDots { span }
            | LexError::FractionalOnIntegerSuffix { span, .. }
            | LexError::UnexpectedChar { span, .. } => *span,
        }
    }

    /// Render with a trimmed source line and a caret, matching the tokenizer's
    /// own diagnostic contract (line trimmed to [`MAX_ERROR_LINE_LENGTH`] chars).
    pub fn display_with_source(&self, source: &str) -> String {
        let span = self.span();
        render_caret(source, span, &self.to_string())
    }
}

// ============================================================================
// Parser errors
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    ExpectedToken,
    UnexpectedToken,
    UnexpectedEof,
    ExpectedExpression,
    ExpectedType,
    ExpectedIdentifier,
    InvalidOperator,
    InvalidModifier,
    InvalidSyntax,
}

impl ParseErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedToken => "unexpected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedExpression => "expected expression",
            ParseErrorKind::ExpectedType => "expected type",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::InvalidOperator => "invalid operator",
            ParseErrorKind::InvalidModifier => "invalid modifier",
            ParseErrorKind::InvalidSyntax => "invalid syntax",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse-phase diagnostic. The parser is fail-fast: the first `ParseError`
/// halts parsing (see `ERROR HANDLING DESIGN`).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// `Invalid token. Expected <kinds>, but got <actual>` per the parser's contract.
    pub fn expected(span: Span, expected: &str, got: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("Invalid token. Expected {expected}, but got {got}"),
        )
    }

    pub fn display_with_source(&self, source: &str) -> String {
        render_caret(source, self.span, &self.to_string())
    }
}

// ============================================================================
// Build errors (Package / node builder)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("type `{name}` is already declared in this package")]
    DuplicateType { name: String },

    #[error("method {name}({}) is already declared", params.join(", "))]
    DuplicateMethod { name: String, params: Vec<String> },

    #[error("modifiers cannot be attached to a non-modifiable declaration at {span}")]
    DanglingModifiers { span: Span },
}

// ============================================================================
// Load errors (bytecode / program loader)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("class `{name}` is already defined")]
    ClassRedefinition { name: String },

    #[error("malformed section: {detail}")]
    MalformedSection { detail: String },

    #[error("duplicate `#define {key}`")]
    DuplicateDefinition { key: String },
}

// ============================================================================
// Runtime errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("NoSuchClassException: {name}")]
    NoSuchClass { name: String },

    #[error("NoSuchMethodException: {class}.{method}({})", params.join(", "))]
    NoSuchMethod {
        class: String,
        method: String,
        params: Vec<String>,
    },

    #[error("stack type mismatch: expected {expected}, found {found}")]
    StackTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

// ============================================================================
// Unified wrapper
// ============================================================================

#[derive(Debug, Clone, Error)]
pub enum CoreError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

/// Largest byte index `<= idx` that lies on a UTF-8 char boundary of `s`.
fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Smallest byte index `>= idx` that lies on a UTF-8 char boundary of `s`.
fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

/// Shared caret-diagnostic renderer: header line, source snippet trimmed to
/// [`MAX_ERROR_LINE_LENGTH`] characters centered on the column, caret pointer.
fn render_caret(source: &str, span: Span, header: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("Error at {}:{}: {}\n", span.line, span.col, header));

    let Some(line_text) = source.lines().nth(span.line as usize - 1) else {
        return out;
    };

    let col = span.col as usize;
    let (snippet, caret_col) = if line_text.len() > MAX_ERROR_LINE_LENGTH {
        let half = MAX_ERROR_LINE_LENGTH / 2;
        let start = col.saturating_sub(half).min(line_text.len());
        let end = (start + MAX_ERROR_LINE_LENGTH).min(line_text.len());
        let start = end.saturating_sub(MAX_ERROR_LINE_LENGTH);
        let start = floor_char_boundary(line_text, start);
        let end = ceil_char_boundary(line_text, end.max(start));
        (&line_text[start..end], col.saturating_sub(start))
    } else {
        (line_text, col)
    };

    out.push_str(&format!("{:>3} | {}\n", span.line, snippet));
    let indent = " ".repeat(caret_col.saturating_sub(1));
    let pointer = if span.len <= 1 {
        "^".to_string()
    } else {
        "^".to_string() + &"~".repeat((span.len - 1) as usize)
    };
    out.push_str(&format!("    | {indent}{pointer}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_contains_location() {
        let err = ParseError::expected(Span::new(1, 5, 1), "';'", "'}'");
        let rendered = err.display_with_source("let x = 1}");
        assert!(rendered.contains("1:5"));
        assert!(rendered.contains('^'));
    }

    #[test]
    fn lex_error_fractional_suffix_message() {
        let err = LexError::FractionalOnIntegerSuffix {
            span: Span::new(1, 1, 4),
            type_name: "Integer",
        };
        assert!(err.to_string().contains("Integer cannot have a floating-point value"));
    }

    #[test]
    fn long_line_is_trimmed_to_budget() {
        let source = "x".repeat(100);
        let err = ParseError::expected(Span::new(1, 50, 1), "identifier", "eof");
        let rendered = err.display_with_source(&source);
        let snippet_line = rendered.lines().nth(1).unwrap();
        assert!(snippet_line.len() <= 3 + 3 + MAX_ERROR_LINE_LENGTH + 2);
    }

    #[test]
    fn long_multibyte_line_does_not_panic_on_trim() {
        let source = "héllo wörld ".repeat(10);
        let err = ParseError::expected(Span::new(1, 50, 1), "identifier", "eof");
        let rendered = err.display_with_source(&source);
        assert!(rendered.contains('^'));
    }
}
