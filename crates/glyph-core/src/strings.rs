//! Shared text helpers: UTF-32 conversion and the join/split routines used by
//! import-path resolution and type-prefix parsing.

/// Decode a UTF-8 source string into its Unicode scalar values.
///
/// The tokenizer's stated input is "a UTF-32 string"; callers that start from
/// a `&str` go through this once up front rather than re-decoding per token.
pub fn to_utf32(source: &str) -> Vec<char> {
    source.chars().collect()
}

/// Re-encode a UTF-32 buffer back to UTF-8.
pub fn from_utf32(chars: &[char]) -> String {
    chars.iter().collect()
}

/// Split a string on `sep`, dropping empty segments (mirrors the original
/// loader's `split` used for import path components).
pub fn split_nonempty(s: &str, sep: char) -> Vec<&str> {
    s.split(sep).filter(|seg| !seg.is_empty()).collect()
}

/// The final path component of a qualified import name, splitting first on
/// `/` then on `.` as the package builder's import table requires.
pub fn import_short_name(qualified: &str) -> &str {
    let after_slash = split_nonempty(qualified, '/').pop().unwrap_or(qualified);
    split_nonempty(after_slash, '.')
        .pop()
        .unwrap_or(after_slash)
}

/// Join an iterator of displayable items with `sep`, as the textual bytecode
/// and diagnostic renderers do for parameter/type lists.
pub fn join<I, T>(items: I, sep: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf32_round_trip() {
        let source = "let x = 1;";
        let chars = to_utf32(source);
        assert_eq!(from_utf32(&chars), source);
    }

    #[test]
    fn import_short_name_slash_then_dot() {
        assert_eq!(import_short_name("a/b/c.D"), "D");
        assert_eq!(import_short_name("Simple"), "Simple");
        assert_eq!(import_short_name("a.b.C"), "C");
    }

    #[test]
    fn join_formats_with_separator() {
        assert_eq!(join(["I", "J", "Z"], ", "), "I, J, Z");
        assert_eq!(join(Vec::<&str>::new(), ", "), "");
    }
}
