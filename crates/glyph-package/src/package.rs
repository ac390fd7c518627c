//! Per-file symbol table: the result of folding one parsed file's top-level
//! items into methods/types/imports, as `Package.compile` in the original
//! design would consume.

use rustc_hash::{FxHashMap, FxHashSet};

use glyph_core::{strings::import_short_name, BuildError, Span};
use glyph_syntax::ast::Item;

use crate::types::{FieldNode, MethodNode, TypeKindTag, TypeNode};

#[derive(Debug, Default)]
pub struct Package {
    pub name: Option<String>,
    pub imports: FxHashMap<String, String>,
    pub methods: Vec<MethodNode>,
    /// Top-level fields. Not enumerated among the package's symbol tables in
    /// the original design (only methods/classes/structs/tuple_structs are),
    /// but the grammar permits them at top level, so they are kept here as
    /// package-scoped globals rather than silently dropped.
    pub globals: Vec<FieldNode>,
    pub classes: FxHashMap<String, TypeNode>,
    pub structs: FxHashMap<String, TypeNode>,
    pub tuple_structs: FxHashMap<String, TypeNode>,
    pub enums: FxHashMap<String, TypeNode>,
    pub interfaces: FxHashMap<String, TypeNode>,
    type_names: FxHashSet<String>,
}

impl Package {
    pub fn from_items(items: &[Item]) -> Result<Self, BuildError> {
        let mut pkg = Package::default();
        fold_into(items, &mut pkg, &mut pkg_sink())?;
        Ok(pkg)
    }

    /// `get_type(name)`: at most one node across all five type maps.
    pub fn get_type(&self, name: &str) -> Option<&TypeNode> {
        self.classes
            .get(name)
            .or_else(|| self.structs.get(name))
            .or_else(|| self.tuple_structs.get(name))
            .or_else(|| self.enums.get(name))
            .or_else(|| self.interfaces.get(name))
    }

    /// `get_method(name, params)`: at most one node by (name, parameter types).
    pub fn get_method(&self, name: &str, params: &[&str]) -> Option<&MethodNode> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.parameters.iter().map(|p| p.type_name.as_str()).eq(params.iter().copied()))
    }

    /// Emit the bytecode contract from §4.4: each type's own class section,
    /// then — if free methods exist — an anonymous `<package><name>` class
    /// wrapping them.
    pub fn compile(&self) -> String {
        let mut out = String::new();
        for type_node in self
            .classes
            .values()
            .chain(self.structs.values())
            .chain(self.tuple_structs.values())
            .chain(self.enums.values())
            .chain(self.interfaces.values())
        {
            out.push_str(&type_node.build());
        }
        if !self.methods.is_empty() {
            let anon_name = format!("{}{}", self.name.as_deref().unwrap_or(""), "Package");
            out.push_str(&format!("cdef {anon_name}\ncbegin\n"));
            for method in &self.methods {
                crate::types::emit_method(method, &mut out);
            }
            out.push_str("cend\n");
        }
        out
    }

    fn register_type(&mut self, name: &str, span: Span) -> Result<(), BuildError> {
        if !self.type_names.insert(name.to_string()) {
            return Err(BuildError::DuplicateType { name: name.to_string() });
        }
        let _ = span;
        Ok(())
    }

    fn register_method(&mut self, node: &MethodNode) -> Result<(), BuildError> {
        let (name, params) = node.signature();
        if self.methods.iter().any(|m| m.signature() == (name.clone(), params.clone())) {
            return Err(BuildError::DuplicateMethod { name, params });
        }
        Ok(())
    }
}

/// Shared folding: modifier-list/modifier-block attachment (§3.2, §9), then
/// routing each item into the sink. Used for both a file's top-level items
/// and a type declaration's body, since both follow the same grammar shape.
fn fold_into(items: &[Item], pkg: &mut Package, sink: &mut dyn FnMut(&mut Package, &Item, Vec<String>) -> Result<(), BuildError>) -> Result<(), BuildError> {
    let mut pending_list: Option<Vec<String>> = None;
    let mut block: Vec<String> = Vec::new();

    for item in items {
        match item {
            Item::Finish(_) => break,
            Item::ModifierList(m) => {
                pending_list = Some(m.modifiers.iter().map(|s| s.to_string()).collect());
            }
            Item::ModifierBlock(m) => {
                block = m.modifiers.iter().map(|s| s.to_string()).collect();
                pending_list = None;
            }
            Item::Package(p) => {
                reject_dangling(&pending_list, item.span())?;
                pkg.name = Some(p.name.to_string());
            }
            Item::Import(i) => {
                reject_dangling(&pending_list, item.span())?;
                let short = import_short_name(i.target);
                pkg.imports.insert(short.to_string(), i.target.to_string());
            }
            Item::Annotation(_) => {
                reject_dangling(&pending_list, item.span())?;
            }
            Item::Error(e) => {
                return Err(BuildError::DanglingModifiers { span: e.span });
            }
            modifiable => {
                let mods = pending_list.take().unwrap_or_else(|| block.clone());
                sink(pkg, modifiable, mods)?;
            }
        }
    }
    Ok(())
}

fn pkg_sink() -> impl FnMut(&mut Package, &Item, Vec<String>) -> Result<(), BuildError> {
    move |pkg: &mut Package, item: &Item, mods: Vec<String>| match item {
        Item::Method(m) => {
            let node = MethodNode::from_item(m, mods);
            pkg.register_method(&node)?;
            pkg.methods.push(node);
            Ok(())
        }
        Item::Field(f) => {
            pkg.globals.push(FieldNode::from_item(f, mods));
            Ok(())
        }
        Item::MultiField(mf) => {
            for (name, _value) in mf.fields {
                pkg.globals.push(FieldNode { name: name.to_string(), type_name: mf.ty.name.to_string(), modifiers: mods.clone() });
            }
            Ok(())
        }
        Item::Class(decl) => insert_type(pkg, TypeKindTag::Class, decl, mods),
        Item::Struct(decl) => insert_type(pkg, TypeKindTag::Struct, decl, mods),
        Item::TupleStruct(decl) => insert_type(pkg, TypeKindTag::TupleStruct, decl, mods),
        Item::Enum(decl) => insert_type(pkg, TypeKindTag::Enum, decl, mods),
        Item::Interface(decl) => insert_type(pkg, TypeKindTag::Interface, decl, mods),
        _ => Ok(()),
    }
}

fn insert_type(pkg: &mut Package, kind: TypeKindTag, decl: &glyph_syntax::ast::TypeDeclItem, mods: Vec<String>) -> Result<(), BuildError> {
    pkg.register_type(decl.name, decl.span)?;
    let mut node = TypeNode::new(kind, decl, mods);
    fold_type_body(decl.body, &mut node)?;
    let map = match kind {
        TypeKindTag::Class => &mut pkg.classes,
        TypeKindTag::Struct => &mut pkg.structs,
        TypeKindTag::TupleStruct => &mut pkg.tuple_structs,
        TypeKindTag::Enum => &mut pkg.enums,
        TypeKindTag::Interface => &mut pkg.interfaces,
    };
    map.insert(node.name.clone(), node);
    Ok(())
}

/// Fold a type's body into its method/field lists, using the same
/// modifier-list/block attachment rule as the top level.
fn fold_type_body(items: &[Item], node: &mut TypeNode) -> Result<(), BuildError> {
    let mut pending_list: Option<Vec<String>> = None;
    let mut block: Vec<String> = Vec::new();

    for item in items {
        match item {
            Item::Finish(_) => break,
            Item::ModifierList(m) => pending_list = Some(m.modifiers.iter().map(|s| s.to_string()).collect()),
            Item::ModifierBlock(m) => {
                block = m.modifiers.iter().map(|s| s.to_string()).collect();
                pending_list = None;
            }
            Item::Annotation(_) => reject_dangling(&pending_list, item.span())?,
            Item::Method(m) => {
                let mods = pending_list.take().unwrap_or_else(|| block.clone());
                let method = MethodNode::from_item(m, mods);
                if node.methods.iter().any(|existing| existing.signature() == method.signature()) {
                    let (name, params) = method.signature();
                    return Err(BuildError::DuplicateMethod { name, params });
                }
                node.methods.push(method);
            }
            Item::Field(f) => {
                let mods = pending_list.take().unwrap_or_else(|| block.clone());
                node.fields.push(FieldNode::from_item(f, mods));
            }
            Item::MultiField(mf) => {
                let mods = pending_list.take().unwrap_or_else(|| block.clone());
                for (name, _value) in mf.fields {
                    node.fields.push(FieldNode { name: name.to_string(), type_name: mf.ty.name.to_string(), modifiers: mods.clone() });
                }
            }
            _ => {
                // Nested type declarations inside a type body are outside
                // this spec's type map contract; they are parsed but not
                // folded into the owning TypeNode.
            }
        }
    }
    Ok(())
}

fn reject_dangling(pending: &Option<Vec<String>>, span: Span) -> Result<(), BuildError> {
    if pending.is_some() {
        Err(BuildError::DanglingModifiers { span })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use glyph_syntax::ast::Parser;

    #[test]
    fn folds_field_and_class() {
        let arena = Bump::new();
        let items = Parser::parse_source("int x = 1\nclass Foo {\nint y\n}\n", &arena).unwrap();
        let pkg = Package::from_items(&items).unwrap();
        assert_eq!(pkg.globals.len(), 1);
        assert!(pkg.get_type("Foo").is_some());
    }

    #[test]
    fn detects_duplicate_method() {
        let arena = Bump::new();
        let items = Parser::parse_source("void foo(int a) { }\nvoid foo(int a) { }\n", &arena).unwrap();
        let result = Package::from_items(&items);
        assert!(matches!(result, Err(BuildError::DuplicateMethod { .. })));
    }

    #[test]
    fn import_keyed_by_short_name() {
        let arena = Bump::new();
        let items = Parser::parse_source("import \"game/Entity.glyph\"\n", &arena).unwrap();
        let pkg = Package::from_items(&items).unwrap();
        assert_eq!(pkg.imports.get("glyph").map(String::as_str), Some("game/Entity.glyph"));
    }

    #[test]
    fn modifier_block_attaches_to_following_members() {
        let arena = Bump::new();
        let items = Parser::parse_source("public:\nint a = 1\nint b = 2\n", &arena).unwrap();
        let pkg = Package::from_items(&items).unwrap();
        assert_eq!(pkg.globals.len(), 2);
        assert_eq!(pkg.globals[0].modifiers, vec!["public".to_string()]);
        assert_eq!(pkg.globals[1].modifiers, vec!["public".to_string()]);
    }
}
