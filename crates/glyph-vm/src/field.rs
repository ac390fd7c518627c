//! A class field's static descriptor. The bytecode textual format has no
//! field-defining opcode (§4.5's mnemonic list is class/method only), so
//! fields are populated by the package builder rather than the VM loader.

use glyph_bytecode::TypeRef;

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub class_name: String,
    pub type_ref: TypeRef,
    pub modifiers: Vec<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>, type_ref: TypeRef, modifiers: Vec<String>) -> Self {
        Self { name: name.into(), class_name: class_name.into(), type_ref, modifiers }
    }
}
