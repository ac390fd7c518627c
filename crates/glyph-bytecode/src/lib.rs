//! Textual bytecode instruction model and multi-file program loader.

pub mod instruction;
pub mod program;
pub mod type_ref;

pub use instruction::{DeferredRef, Instruction, InvokeStatic, RawInstruction};
pub use program::Program;
pub use type_ref::TypeRef;
