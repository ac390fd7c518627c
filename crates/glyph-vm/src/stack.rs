//! Per-invocation operand stack: nine separately-typed sub-stacks plus the
//! frame-chain bookkeeping needed for a child-first stack trace.

use glyph_bytecode::TypeRef;
use glyph_core::RuntimeError;

use crate::instance::InstanceRef;

/// One value popped from or pushed to a typed sub-stack.
#[derive(Debug, Clone)]
pub enum StackValue {
    Byte(i8),
    Char(char),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Instance(Option<InstanceRef>),
}

impl StackValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StackValue::Byte(_) => "byte",
            StackValue::Char(_) => "char",
            StackValue::Short(_) => "short",
            StackValue::Int(_) => "int",
            StackValue::Long(_) => "long",
            StackValue::Float(_) => "float",
            StackValue::Double(_) => "double",
            StackValue::Bool(_) => "bool",
            StackValue::Instance(_) => "instance",
        }
    }
}

/// One ancestor frame's identity, as exposed by `stack_trace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub name: String,
    pub offset: usize,
}

/// A per-invocation operand stack. Rather than holding a borrowed pointer to
/// its parent (which `fix_operation_tree`-style self-referential lifetimes
/// make awkward for a strictly sequential caller/callee relationship), a
/// `Stack` copies its parent's trace once at construction time; since the
/// whole toolchain is single-threaded and a child never outlives its caller,
/// this is observably identical to walking live parent pointers.
#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    offset: usize,
    ancestors: Vec<FrameInfo>,
    pub bytes: Vec<i8>,
    pub chars: Vec<char>,
    pub shorts: Vec<i16>,
    pub ints: Vec<i32>,
    pub longs: Vec<i64>,
    pub floats: Vec<f32>,
    pub doubles: Vec<f64>,
    pub booleans: Vec<bool>,
    pub instances: Vec<Option<InstanceRef>>,
}

impl Stack {
    pub fn new(parent: Option<&Stack>, name: impl Into<String>) -> Self {
        let offset = parent.map_or(0, |p| p.offset + 1);
        let ancestors = parent.map(|p| p.stack_trace()).unwrap_or_default();
        Self {
            name: name.into(),
            offset,
            ancestors,
            bytes: Vec::new(),
            chars: Vec::new(),
            shorts: Vec::new(),
            ints: Vec::new(),
            longs: Vec::new(),
            floats: Vec::new(),
            doubles: Vec::new(),
            booleans: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Child-first frames, no cycles, monotonically decreasing depth offsets.
    pub fn stack_trace(&self) -> Vec<FrameInfo> {
        let mut trace = Vec::with_capacity(self.ancestors.len() + 1);
        trace.push(FrameInfo { name: self.name.clone(), offset: self.offset });
        trace.extend(self.ancestors.iter().cloned());
        trace
    }

    pub fn push(&mut self, value: StackValue) {
        match value {
            StackValue::Byte(v) => self.bytes.push(v),
            StackValue::Char(v) => self.chars.push(v),
            StackValue::Short(v) => self.shorts.push(v),
            StackValue::Int(v) => self.ints.push(v),
            StackValue::Long(v) => self.longs.push(v),
            StackValue::Float(v) => self.floats.push(v),
            StackValue::Double(v) => self.doubles.push(v),
            StackValue::Bool(v) => self.booleans.push(v),
            StackValue::Instance(v) => self.instances.push(v),
        }
    }

    /// Pop the value matching `ty`'s stack-prefix family (`B C S I J F D Z L`,
    /// arrays route through the instance sub-stack like class references).
    pub fn pop_for(&mut self, ty: &TypeRef) -> Result<StackValue, RuntimeError> {
        let mismatch = |expected: &'static str| RuntimeError::StackTypeMismatch { expected, found: "empty" };
        Ok(match ty.stack_prefix() {
            'B' => StackValue::Byte(self.bytes.pop().ok_or_else(|| mismatch("byte"))?),
            'C' => StackValue::Char(self.chars.pop().ok_or_else(|| mismatch("char"))?),
            'S' => StackValue::Short(self.shorts.pop().ok_or_else(|| mismatch("short"))?),
            'I' => StackValue::Int(self.ints.pop().ok_or_else(|| mismatch("int"))?),
            'J' => StackValue::Long(self.longs.pop().ok_or_else(|| mismatch("long"))?),
            'F' => StackValue::Float(self.floats.pop().ok_or_else(|| mismatch("float"))?),
            'D' => StackValue::Double(self.doubles.pop().ok_or_else(|| mismatch("double"))?),
            'Z' => StackValue::Bool(self.booleans.pop().ok_or_else(|| mismatch("bool"))?),
            _ => StackValue::Instance(self.instances.pop().ok_or_else(|| mismatch("instance"))?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_trace_is_child_first_with_decreasing_offsets() {
        let root = Stack::new(None, "root");
        let child = Stack::new(Some(&root), "child");
        let grandchild = Stack::new(Some(&child), "grandchild");

        let trace = grandchild.stack_trace();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace[0].name, "grandchild");
        assert_eq!(trace[1].name, "child");
        assert_eq!(trace[2].name, "root");
        assert!(trace[0].offset > trace[1].offset);
        assert!(trace[1].offset > trace[2].offset);
    }

    #[test]
    fn pop_for_matches_type_prefix() {
        let mut stack = Stack::new(None, "s");
        stack.ints.push(42);
        let value = stack.pop_for(&TypeRef::Int).unwrap();
        assert!(matches!(value, StackValue::Int(42)));
    }

    #[test]
    fn pop_for_empty_stack_is_a_runtime_error() {
        let mut stack = Stack::new(None, "s");
        assert!(stack.pop_for(&TypeRef::Int).is_err());
    }
}
