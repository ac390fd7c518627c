//! A loaded class: header metadata plus its methods and fields, built from
//! the textual bytecode lines between a `cbegin`/`cend` pair.

use glyph_bytecode::{Instruction, TypeRef};
use glyph_core::LoadError;

use crate::field::Field;
use crate::method::Method;

#[derive(Debug, Clone)]
pub struct Class {
    pub name: String,
    pub superclass: String,
    pub modifiers: Vec<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<Method>,
    pub fields: Vec<Field>,
}

impl Class {
    pub fn get_method(&self, name: &str, params: &[TypeRef]) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name && m.parameters == params)
    }

    pub fn get_method_index(&self, name: &str, params: &[TypeRef]) -> Option<usize> {
        self.methods.iter().position(|m| m.name == name && m.parameters == params)
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Parse the content between a class's `cbegin` and its matching
    /// `cend` into methods. Nested `cdef ... cbegin ... cend` blocks are
    /// skipped rather than instantiated as separate classes — this spec
    /// confines required VM semantics to `invokestatic` plus top-level
    /// class/method framing.
    pub fn build(
        name: String,
        superclass: String,
        modifiers: Vec<String>,
        interfaces: Vec<String>,
        content: &[String],
    ) -> Result<Class, LoadError> {
        let mut methods = Vec::new();
        let mut nested_depth = 0usize;
        let mut pending_nested_header = false;

        let mut current: Option<MethodBuilder> = None;
        let mut in_method_body = false;

        for line in content {
            let args: Vec<&str> = line.split_whitespace().collect();
            let Some(opcode) = args.first().copied() else { continue };

            if pending_nested_header || nested_depth > 0 {
                match opcode {
                    "cbegin" if pending_nested_header => {
                        pending_nested_header = false;
                        nested_depth = 1;
                    }
                    "cbegin" => nested_depth += 1,
                    "cend" => nested_depth = nested_depth.saturating_sub(1),
                    _ => {}
                }
                continue;
            }

            match opcode {
                "cdef" => pending_nested_header = true,
                "mdef" => {
                    current = Some(MethodBuilder::new(args.get(1).copied().unwrap_or_default(), name.clone()));
                }
                "mmod" => {
                    if let Some(m) = current.as_mut() {
                        m.modifiers = args[1..].iter().map(|s| s.to_string()).collect();
                    }
                }
                "mparam" => {
                    if let Some(m) = current.as_mut() {
                        m.parameters = args[1..].iter().map(|s| TypeRef::parse(s)).collect();
                    }
                }
                "mreturn" => {
                    if let Some(m) = current.as_mut() {
                        m.return_type = TypeRef::parse(args.get(1).copied().unwrap_or("V"));
                    }
                }
                "mbegin" => in_method_body = true,
                "mend" => {
                    in_method_body = false;
                    if let Some(m) = current.take() {
                        methods.push(m.finish());
                    }
                }
                _ if in_method_body => {
                    if let Some(m) = current.as_mut() {
                        m.bytecode.push(Instruction::parse(opcode, &args[1..]));
                    }
                }
                _ => {}
            }
        }

        Ok(Class { name, superclass, modifiers, interfaces, methods, fields: Vec::new() })
    }
}

struct MethodBuilder {
    name: String,
    class_name: String,
    return_type: TypeRef,
    modifiers: Vec<String>,
    parameters: Vec<TypeRef>,
    bytecode: Vec<Instruction>,
}

impl MethodBuilder {
    fn new(name: &str, class_name: String) -> Self {
        Self {
            name: name.to_string(),
            class_name,
            return_type: TypeRef::Void,
            modifiers: Vec::new(),
            parameters: Vec::new(),
            bytecode: Vec::new(),
        }
    }

    fn finish(self) -> Method {
        Method {
            name: self.name,
            class_name: self.class_name,
            return_type: self.return_type,
            modifiers: self.modifiers,
            parameters: self.parameters,
            bytecode: self.bytecode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_static_void_method_with_empty_body() {
        let content = ["mdef entry", "mmod static", "mparam", "mreturn V", "mbegin", "mend"]
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();
        let class = Class::build("Main".to_string(), "Object".to_string(), vec![], vec![], &content).unwrap();
        assert_eq!(class.methods.len(), 1);
        let method = &class.methods[0];
        assert_eq!(method.name, "entry");
        assert_eq!(method.return_type, TypeRef::Void);
        assert!(method.bytecode.is_empty());
    }

    #[test]
    fn skips_nested_class_blocks() {
        let content = [
            "cdef Inner", "cbegin", "mdef skipped", "mbegin", "mend", "cend",
            "mdef real", "mbegin", "mend",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
        let class = Class::build("Outer".to_string(), "Object".to_string(), vec![], vec![], &content).unwrap();
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, "real");
    }
}
