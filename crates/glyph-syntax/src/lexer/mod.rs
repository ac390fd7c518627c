//! Tokenization: raw source text to a classified [`Token`] stream.

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::{classify_keyword, Token, TokenKind};
