//! Lexer, auto-semicolon pass, and recursive-descent parser for the
//! front-end of the toolchain.

pub mod ast;
pub mod auto_semi;
pub mod lexer;

pub use ast::{Item, Parser, Script};
pub use auto_semi::insert_auto_semicolons;
pub use lexer::{Lexer, Token, TokenKind};
