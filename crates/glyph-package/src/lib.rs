//! Package builder: folds a parsed file's top-level items into a symbol
//! table of methods, types, and imports, enforcing the uniqueness invariants
//! the rest of the toolchain relies on.

pub mod package;
pub mod types;

pub use package::Package;
pub use types::{FieldNode, MethodNode, ParameterSig, TypeKindTag, TypeNode};
