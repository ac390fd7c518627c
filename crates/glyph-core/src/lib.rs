//! Shared primitives used across the lexer, parser, package builder, and VM:
//! source spans, the phase error hierarchy, and common text helpers.

pub mod error;
pub mod span;
pub mod strings;

pub use error::{BuildError, CoreError, LexError, LoadError, ParseError, ParseErrorKind, RuntimeError};
pub use span::Span;
