//! Front end and execution core of the toolchain: lexer, parser, package
//! builder, bytecode instruction model, and VM runtime.

pub use glyph_bytecode as bytecode;
pub use glyph_core as core;
pub use glyph_package as package;
pub use glyph_syntax as syntax;
pub use glyph_vm as vm;

pub mod prelude {
    pub use glyph_bytecode::{Instruction, Program, TypeRef as BytecodeTypeRef};
    pub use glyph_core::{BuildError, CoreError, LexError, LoadError, ParseError, RuntimeError, Span};
    pub use glyph_package::Package;
    pub use glyph_syntax::{Lexer, Parser, Script, Token, TokenKind};
    pub use glyph_vm::{Class, Method, Stack, VirtualMachine};
}
