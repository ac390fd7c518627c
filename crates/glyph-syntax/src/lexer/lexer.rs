//! Tokenizer: converts UTF-8 source text into a stream of [`Token`]s.
//!
//! Dispatch order follows the tokenizer's contract exactly: whitespace/EOF,
//! identifier-start, operator characters, separators, digits, string/char
//! literals, then annotations. The lexer copies lexeme content into the
//! arena so tokens can outlive the source buffer.

use std::collections::VecDeque;

use bumpalo::Bump;
use glyph_core::{LexError, Span};

use super::cursor::{is_ident_continue, is_ident_start, Cursor};
use super::token::{classify_keyword, Token, TokenKind};

const OPERATOR_CHARS: &str = ".=+-*/<>?!^&~$|";
const FRACTIONAL_TYPE_NAMES: &[(TokenKind, &str)] = &[
    (TokenKind::Byte, "Byte"),
    (TokenKind::Short, "Short"),
    (TokenKind::Integer, "Integer"),
    (TokenKind::Long, "Long"),
];

pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    lookahead: VecDeque<Token<'ast>>,
    pub errors: Vec<LexError>,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            lookahead: VecDeque::new(),
            errors: Vec::new(),
        }
    }

    /// Pop the next token, consuming any buffered lookahead first.
    pub fn next_token(&mut self) -> Token<'ast> {
        self.lookahead.pop_front().unwrap_or_else(|| self.scan_token())
    }

    /// Peek `n` tokens ahead (0 = next token) without consuming.
    pub fn peek_nth(&mut self, n: usize) -> Token<'ast> {
        while self.lookahead.len() <= n {
            let tok = self.scan_token();
            self.lookahead.push_back(tok);
        }
        self.lookahead[n]
    }

    pub fn peek_token(&mut self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Tokenize the entire source to completion (including the trailing
    /// `Finish`), for callers that want a full stream up front.
    pub fn tokenize_all(mut self) -> (Vec<Token<'ast>>, Vec<LexError>) {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let finished = tok.is(TokenKind::Finish);
            tokens.push(tok);
            if finished {
                break;
            }
        }
        (tokens, self.errors)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        let len = self.cursor.column().saturating_sub(start_col);
        Span::new(start_line, start_col, len)
    }

    fn scan_token(&mut self) -> Token<'ast> {
        loop {
            let line = self.cursor.line();
            let col = self.cursor.column();
            let Some(ch) = self.cursor.peek() else {
                return self.make_token(TokenKind::Finish, "", Span::point(line, col));
            };

            if ch == '\0' {
                return self.make_token(TokenKind::Finish, "", Span::point(line, col));
            }

            if ch == '\n' {
                self.cursor.advance();
                return self.make_token(TokenKind::NewLine, "\n", Span::point(line, col));
            }

            if ch.is_whitespace() {
                self.cursor.advance();
                continue;
            }

            if is_ident_start(ch) {
                return self.scan_identifier(line, col);
            }
            if ch == '@' {
                self.cursor.advance();
                return self.scan_annotation(line, col);
            }
            if ch.is_ascii_digit() {
                return self.scan_number(line, col);
            }
            if ch == '"' {
                return self.scan_literal(line, col, true);
            }
            if ch == '\'' {
                return self.scan_literal(line, col, false);
            }
            if let Some(kind) = separator_kind(ch) {
                self.cursor.advance();
                return self.make_token(kind, self.intern_char(ch), Span::new(line, col, 1));
            }
            if OPERATOR_CHARS.contains(ch) {
                self.cursor.advance();
                return self.make_token(TokenKind::Operator, self.intern_char(ch), Span::new(line, col, 1));
            }

            self.cursor.advance();
            return self.make_error(
                LexError::UnexpectedChar {
                    ch,
                    span: Span::new(line, col, 1),
                },
                Span::new(line, col, 1),
            );
        }
    }

    fn scan_identifier(&mut self, line: u32, col: u32) -> Token<'ast> {
        let word = self.cursor.eat_while(is_ident_continue);
        let span = self.span_from(line, col);
        let kind = classify_keyword(word).unwrap_or(TokenKind::Identifier);
        self.make_token(kind, word, span)
    }

    fn scan_annotation(&mut self, line: u32, col: u32) -> Token<'ast> {
        let name = self.cursor.eat_while(is_ident_continue);
        let span = self.span_from(line, col);
        self.make_token(TokenKind::Annotation, name, span)
    }

    fn scan_number(&mut self, line: u32, col: u32) -> Token<'ast> {
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_nth(1), Some('x') | Some('X')) {
            self.cursor.advance();
            self.cursor.advance();
            let digits = self.cursor.eat_while_ascii(|b| b.is_ascii_hexdigit());
            let span = self.span_from(line, col);
            return self.make_token(TokenKind::Hexadecimal, digits, span);
        }

        let start = self.cursor.offset();
        let mut dot_count = 0u32;
        loop {
            match self.cursor.peek() {
                Some(c) if c.is_ascii_digit() || c == '_' => {
                    self.cursor.advance();
                }
                Some('.') if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    dot_count += 1;
                    self.cursor.advance();
                }
                _ => break,
            }
        }
        let digits = self.cursor.slice_from(start);

        if dot_count > 1 {
            let span = self.span_from(line, col);
            return self.make_error(LexError::MultipleDots { span }, span);
        }

        let has_fraction = dot_count == 1;
        let suffix = self.cursor.peek().filter(|c| "bBsSiIlLfFdD".contains(*c));
        let kind = match suffix {
            Some(c) => {
                self.cursor.advance();
                match c.to_ascii_uppercase() {
                    'B' => TokenKind::Byte,
                    'S' => TokenKind::Short,
                    'I' => TokenKind::Integer,
                    'L' => TokenKind::Long,
                    'F' => TokenKind::Float,
                    'D' => TokenKind::Double,
                    _ => unreachable!(),
                }
            }
            None => {
                if has_fraction {
                    TokenKind::Double
                } else {
                    TokenKind::Integer
                }
            }
        };

        let span = self.span_from(line, col);
        if has_fraction {
            if let Some((_, name)) = FRACTIONAL_TYPE_NAMES.iter().find(|(k, _)| *k == kind) {
                return self.make_error(
                    LexError::FractionalOnIntegerSuffix { span, type_name: name },
                    span,
                );
            }
        }

        self.make_token(kind, digits, span)
    }

    fn scan_literal(&mut self, line: u32, col: u32, is_string: bool) -> Token<'ast> {
        let quote = if is_string { '"' } else { '\'' };
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    let span = self.span_from(line, col);
                    return self.make_error(LexError::UnterminatedLiteral { span }, span);
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        Some('n') => {
                            value.push('\n');
                            self.cursor.advance();
                        }
                        Some('r') => {
                            value.push('\r');
                            self.cursor.advance();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.cursor.advance();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.cursor.advance();
                        }
                        Some(c) if c == '"' || c == '\'' => {
                            value.push(c);
                            self.cursor.advance();
                        }
                        _ => {
                            let span = self.span_from(line, col);
                            return self.make_error(LexError::InvalidEscape { span }, span);
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }
        let span = self.span_from(line, col);
        let kind = if is_string { TokenKind::String } else { TokenKind::Character };
        self.make_token(kind, self.arena.alloc_str(&value), span)
    }

    fn make_token(&mut self, kind: TokenKind, value: &str, span: Span) -> Token<'ast> {
        Token::new(kind, self.arena.alloc_str(value), span)
    }

    fn make_error(&mut self, err: LexError, span: Span) -> Token<'ast> {
        self.errors.push(err);
        Token::new(TokenKind::Unexpected, self.arena.alloc_str(""), span)
    }

    fn intern_char(&self, ch: char) -> &'ast str {
        self.arena.alloc_str(ch.encode_utf8(&mut [0u8; 4]))
    }
}

fn separator_kind(ch: char) -> Option<TokenKind> {
    Some(match ch {
        ';' => TokenKind::Semicolon,
        ':' => TokenKind::Colon,
        ',' => TokenKind::Comma,
        '{' => TokenKind::Begin,
        '}' => TokenKind::End,
        '(' => TokenKind::Open,
        ')' => TokenKind::Close,
        '[' => TokenKind::Start,
        ']' => TokenKind::Stop,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(src: &str) -> Vec<Token<'_>> {
        let arena = Box::leak(Box::new(Bump::new()));
        Lexer::new(src, arena).tokenize_all().0
    }

    #[test]
    fn number_suffixes() {
        let tokens = lex("12B 3.14F 0xFF 100L 1.5");
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| !t.is(TokenKind::Finish))
            .map(|t| (t.kind, t.value))
            .collect();
        assert_eq!(
            values,
            vec![
                (TokenKind::Byte, "12"),
                (TokenKind::Float, "3.14"),
                (TokenKind::Hexadecimal, "FF"),
                (TokenKind::Long, "100"),
                (TokenKind::Double, "1.5"),
            ]
        );
    }

    #[test]
    fn invalid_float_as_int_suffix() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("1.5I", &arena);
        let tok = lexer.next_token();
        assert!(tok.is(TokenKind::Unexpected));
        assert_eq!(lexer.errors.len(), 1);
        assert!(lexer.errors[0]
            .to_string()
            .contains("Integer cannot have a floating-point value"));
    }

    #[test]
    fn keyword_classification() {
        let tokens = lex("class public let x");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Expression,
                TokenKind::Modifier,
                TokenKind::Type,
                TokenKind::Identifier,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn string_escapes() {
        let tokens = lex(r#""a\nb\"c""#);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].value, "a\nb\"c");
    }

    #[test]
    fn unterminated_string_is_unexpected() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("\"abc", &arena);
        let tok = lexer.next_token();
        assert!(tok.is(TokenKind::Unexpected));
    }

    #[test]
    fn operators_are_single_character() {
        let tokens = lex("+-*/");
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| t.is(TokenKind::Operator))
            .map(|t| t.value)
            .collect();
        assert_eq!(values, vec!["+", "-", "*", "/"]);
    }

    #[test]
    fn newline_tokens_are_emitted() {
        let tokens = lex("a\nb");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::NewLine,
                TokenKind::Identifier,
                TokenKind::Finish
            ]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("a b", &arena);
        let peeked = lexer.peek_token();
        let next = lexer.next_token();
        assert_eq!(peeked, next);
    }
}
