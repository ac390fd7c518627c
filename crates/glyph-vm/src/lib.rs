//! Bytecode VM runtime: classes, methods, fields, typed per-frame stacks,
//! and the `invokestatic`-driven instruction loop.

pub mod class;
pub mod context;
pub mod field;
pub mod instance;
pub mod method;
pub mod stack;
pub mod storage;
pub mod vm;

pub use class::Class;
pub use context::Context;
pub use field::Field;
pub use instance::{Instance, InstanceRef};
pub use method::Method;
pub use stack::{FrameInfo, Stack, StackValue};
pub use storage::Storage;
pub use vm::VirtualMachine;
