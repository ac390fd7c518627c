//! Owned, package-private type/method/field nodes built from the parser's
//! arena-borrowed AST.
//!
//! The parser's `Item`/`TypeDeclItem` borrow from a `Bump`; a `Package`
//! outlives the arena it was parsed from (it is the thing the rest of the
//! toolchain holds onto), so the builder copies the fields it needs into
//! owned strings here rather than threading the arena lifetime through.

use glyph_syntax::ast::{FieldItem, MethodItem, TypeDeclItem};

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSig {
    pub type_name: String,
    pub varargs: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodNode {
    pub name: String,
    pub return_types: Vec<String>,
    pub parameters: Vec<ParameterSig>,
    pub modifiers: Vec<String>,
}

impl MethodNode {
    pub fn from_item(item: &MethodItem, modifiers: Vec<String>) -> Self {
        Self {
            name: item.name.to_string(),
            return_types: item.return_types.iter().map(|r| r.ty.name.to_string()).collect(),
            parameters: item
                .parameters
                .iter()
                .map(|p| ParameterSig { type_name: p.ty.name.to_string(), varargs: p.varargs })
                .collect(),
            modifiers,
        }
    }

    /// `(name, parameter-type-value sequence)` — the identity the package
    /// enforces uniqueness over.
    pub fn signature(&self) -> (String, Vec<String>) {
        (self.name.clone(), self.parameters.iter().map(|p| p.type_name.clone()).collect())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub type_name: String,
    pub modifiers: Vec<String>,
}

impl FieldNode {
    pub fn from_item(item: &FieldItem, modifiers: Vec<String>) -> Self {
        Self { name: item.name.to_string(), type_name: item.ty.name.to_string(), modifiers }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKindTag {
    Class,
    Struct,
    TupleStruct,
    Enum,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeNode {
    pub kind: TypeKindTag,
    pub name: String,
    pub parent: Option<String>,
    pub modifiers: Vec<String>,
    pub methods: Vec<MethodNode>,
    pub fields: Vec<FieldNode>,
}

impl TypeNode {
    pub fn new(kind: TypeKindTag, decl: &TypeDeclItem, modifiers: Vec<String>) -> Self {
        Self {
            kind,
            name: decl.name.to_string(),
            parent: decl.parent.map(|s| s.to_string()),
            modifiers,
            methods: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Emit the bytecode class section contract from §4.4/§6: `cdef` header,
    /// modifier/superclass/interface lines, then each member's own framing.
    ///
    /// Method bodies are not produced here — the source's own `build` paths
    /// for most node kinds are unimplemented stubs, and this spec confines
    /// required VM semantics to `invokestatic` alone — but every declared
    /// method still gets its `mdef`/`mmod`/`mparam`/`mreturn`/`mbegin`/`mend`
    /// framing so `VirtualMachine::load_bytecode` can see and resolve it.
    pub fn build(&self) -> String {
        let mut out = format!("cdef {}\n", self.name);
        if !self.modifiers.is_empty() {
            out.push_str(&format!("cmod {}\n", self.modifiers.join(" ")));
        }
        if let Some(parent) = &self.parent {
            out.push_str(&format!("cext {parent}\n"));
        }
        out.push_str("cbegin\n");
        for field in &self.fields {
            emit_field(field, &mut out);
        }
        for method in &self.methods {
            emit_method(method, &mut out);
        }
        out.push_str("cend\n");
        out
    }
}

/// Write one method's `mdef ... mend` framing to `out`, matching §6's class
/// section template. Parameter/return entries are the source-level type
/// names as parsed (e.g. `int`, `MyClass`) rather than VM type prefixes
/// (`I`, `LMyClass;`) — translating source types to VM type prefixes is
/// code generation, which is out of scope here.
pub(crate) fn emit_method(method: &MethodNode, out: &mut String) {
    out.push_str(&format!("  mdef {}\n", method.name));
    if !method.modifiers.is_empty() {
        out.push_str(&format!("  mmod {}\n", method.modifiers.join(" ")));
    }
    let params = method.parameters.iter().map(|p| p.type_name.as_str()).collect::<Vec<_>>().join(" ");
    out.push_str(&format!("  mparam {params}\n"));
    let return_type = method.return_types.first().map(String::as_str).unwrap_or("V");
    out.push_str(&format!("  mreturn {return_type}\n"));
    out.push_str("  mbegin\n");
    out.push_str("  mend\n");
}

/// Write one field as a `;`-comment line — the bytecode textual format
/// defines no field-emitting mnemonic, so this is documentation only,
/// kept for symmetry with §6 rather than silently dropping fields.
pub(crate) fn emit_field(field: &FieldNode, out: &mut String) {
    out.push_str(&format!("  ; field {} {}\n", field.name, field.type_name));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyph_core::Span;

    fn decl(name: &'static str) -> TypeDeclItem<'static> {
        TypeDeclItem { name, generics: &[], parent: None, body: &[], modifiers: Vec::new(), span: Span::point(1, 1) }
    }

    #[test]
    fn build_emits_method_and_field_framing() {
        let mut node = TypeNode::new(TypeKindTag::Class, &decl("Widget"), Vec::new());
        node.fields.push(FieldNode { name: "count".to_string(), type_name: "int".to_string(), modifiers: Vec::new() });
        node.methods.push(MethodNode {
            name: "tick".to_string(),
            return_types: vec!["int".to_string()],
            parameters: vec![ParameterSig { type_name: "int".to_string(), varargs: false }],
            modifiers: vec!["public".to_string()],
        });

        let built = node.build();
        assert!(built.contains("mdef tick"), "{built}");
        assert!(built.contains("mmod public"), "{built}");
        assert!(built.contains("mparam int"), "{built}");
        assert!(built.contains("mreturn int"), "{built}");
        assert!(built.contains("mbegin"), "{built}");
        assert!(built.contains("mend"), "{built}");
        assert!(built.contains("; field count int"), "{built}");
    }

    #[test]
    fn build_omits_empty_modifier_and_field_sections() {
        let mut node = TypeNode::new(TypeKindTag::Class, &decl("Bare"), Vec::new());
        node.methods.push(MethodNode { name: "run".to_string(), return_types: Vec::new(), parameters: Vec::new(), modifiers: Vec::new() });

        let built = node.build();
        assert!(built.contains("mdef run"));
        assert!(built.contains("mparam \n"));
        assert!(built.contains("mreturn V"));
        assert!(!built.contains("mmod"));
    }
}
