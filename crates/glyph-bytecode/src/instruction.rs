//! Method-body instructions: the opcodes that appear between `mbegin` and
//! `mend`. Section-structure opcodes (`cdef`, `cbegin`, `mdef`, …) are
//! handled directly by the class/method builder rather than modeled here —
//! they never reach a method's own instruction list.

use std::cell::Cell;

use crate::type_ref::TypeRef;

/// A resolved-or-not reference, written once at `initialize` and at most
/// once more at first `execute`, then memoized (§4.5, §5).
#[derive(Debug, Default)]
pub struct DeferredRef(Cell<Option<usize>>);

impl DeferredRef {
    pub fn get(&self) -> Option<usize> {
        self.0.get()
    }

    pub fn set(&self, value: usize) {
        self.0.set(Some(value));
    }
}

impl Clone for DeferredRef {
    fn clone(&self) -> Self {
        DeferredRef(Cell::new(self.0.get()))
    }
}

impl PartialEq for DeferredRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.get() == other.0.get()
    }
}

/// `invokestatic <className> <methodName> <paramType>*`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeStatic {
    pub class_name: String,
    pub method_name: String,
    pub param_types: Vec<TypeRef>,
    /// Index into the owning `VirtualMachine`'s class table, once resolved.
    pub class_ref: DeferredRef,
    /// Index into the resolved class's method table, once resolved.
    pub method_ref: DeferredRef,
}

impl InvokeStatic {
    pub fn parse(args: &[&str]) -> Self {
        let class_name = args.first().copied().unwrap_or_default().to_string();
        let method_name = args.get(1).copied().unwrap_or_default().to_string();
        let param_types = args[2.min(args.len())..].iter().map(|a| TypeRef::parse(a)).collect();
        Self {
            class_name,
            method_name,
            param_types,
            class_ref: DeferredRef::default(),
            method_ref: DeferredRef::default(),
        }
    }

    pub fn debug_line(&self) -> String {
        let mut out = format!("invokestatic {} {}", self.class_name, self.method_name);
        for p in &self.param_types {
            out.push(' ');
            out.push_str(&p.to_string());
        }
        out
    }
}

/// An opcode with no semantics defined in this spec — kept so method bodies
/// round-trip and can be printed, but never executed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInstruction {
    pub opcode: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    InvokeStatic(InvokeStatic),
    Raw(RawInstruction),
}

impl Instruction {
    /// Parse one already-whitespace-split method-body line.
    pub fn parse(opcode: &str, args: &[&str]) -> Self {
        match opcode {
            "invokestatic" => Instruction::InvokeStatic(InvokeStatic::parse(args)),
            _ => Instruction::Raw(RawInstruction {
                opcode: opcode.to_string(),
                args: args.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }

    pub fn debug_line(&self) -> String {
        match self {
            Instruction::InvokeStatic(i) => i.debug_line(),
            Instruction::Raw(r) => {
                if r.args.is_empty() {
                    r.opcode.clone()
                } else {
                    format!("{} {}", r.opcode, r.args.join(" "))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_invokestatic_with_params() {
        let instr = Instruction::parse("invokestatic", &["Main", "entry", "I", "LFoo;"]);
        match instr {
            Instruction::InvokeStatic(i) => {
                assert_eq!(i.class_name, "Main");
                assert_eq!(i.method_name, "entry");
                assert_eq!(i.param_types, vec![TypeRef::Int, TypeRef::Class("Foo".to_string())]);
                assert!(i.class_ref.get().is_none());
            }
            _ => panic!("expected InvokeStatic"),
        }
    }

    #[test]
    fn unknown_opcode_becomes_raw() {
        let instr = Instruction::parse("iadd", &[]);
        assert!(matches!(instr, Instruction::Raw(_)));
    }

    #[test]
    fn deferred_ref_is_write_once_observable() {
        let r = DeferredRef::default();
        assert_eq!(r.get(), None);
        r.set(3);
        assert_eq!(r.get(), Some(3));
    }
}
