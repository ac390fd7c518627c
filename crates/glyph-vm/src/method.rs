//! A class method: its signature plus an ordered bytecode body.

use glyph_bytecode::{Instruction, TypeRef};
use glyph_core::RuntimeError;

use crate::context::Context;
use crate::instance::InstanceRef;
use crate::stack::{Stack, StackValue};
use crate::storage::Storage;
use crate::vm::VirtualMachine;

#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub class_name: String,
    pub return_type: TypeRef,
    pub modifiers: Vec<String>,
    pub parameters: Vec<TypeRef>,
    pub bytecode: Vec<Instruction>,
}

impl Method {
    /// `(name, parameters)` — the identity `Class::get_method` looks up by.
    pub fn signature(&self) -> (&str, &[TypeRef]) {
        (&self.name, &self.parameters)
    }

    /// Run one call: fresh `Stack` + `Storage`, copy arguments from the
    /// caller's stack, drive the instruction loop, then coerce and push the
    /// return value (§4.5 `Method.invoke`).
    pub fn invoke(
        &self,
        vm: &VirtualMachine,
        caller_stack: &mut Stack,
        instance: Option<InstanceRef>,
    ) -> Result<(), RuntimeError> {
        let stack_name = format!(
            "{}.{}({}){}",
            self.class_name,
            self.name,
            self.parameters.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
            self.return_type
        );
        let mut stack = Stack::new(Some(caller_stack), stack_name);
        let mut storage = Storage::new();
        self.copy_arguments(caller_stack, &mut storage, instance)?;

        let mut context = Context::new(&mut stack, storage, self);
        while context.cursor < context.length {
            let instr = &self.bytecode[context.cursor];
            vm.execute_instruction(instr, &mut context)?;
            context.cursor += 1;
        }

        self.handle_return(&context, caller_stack);
        Ok(())
    }

    fn copy_arguments(&self, caller_stack: &mut Stack, storage: &mut Storage, instance: Option<InstanceRef>) -> Result<(), RuntimeError> {
        let mut instance_offset = 0usize;
        if let Some(receiver) = instance {
            storage.set_instance(instance_offset, Some(receiver));
            instance_offset += 1;
        }

        let mut byte_offset = 0usize;
        let mut char_offset = 0usize;
        let mut short_offset = 0usize;
        let mut int_offset = 0usize;
        let mut long_offset = 0usize;
        let mut float_offset = 0usize;
        let mut double_offset = 0usize;
        let mut bool_offset = 0usize;

        for param in &self.parameters {
            let value = caller_stack.pop_for(param)?;
            match (param.stack_prefix(), value) {
                ('B', v) => storage.set(byte_offset, replace_offset(&mut byte_offset, v)),
                ('C', v) => storage.set(char_offset, replace_offset(&mut char_offset, v)),
                ('S', v) => storage.set(short_offset, replace_offset(&mut short_offset, v)),
                ('I', v) => storage.set(int_offset, replace_offset(&mut int_offset, v)),
                ('J', v) => storage.set(long_offset, replace_offset(&mut long_offset, v)),
                ('F', v) => storage.set(float_offset, replace_offset(&mut float_offset, v)),
                ('D', v) => storage.set(double_offset, replace_offset(&mut double_offset, v)),
                ('Z', v) => storage.set(bool_offset, replace_offset(&mut bool_offset, v)),
                (_, v) => storage.set(instance_offset, replace_offset(&mut instance_offset, v)),
            }
        }
        Ok(())
    }

    fn handle_return(&self, context: &Context, caller_stack: &mut Stack) {
        if matches!(self.return_type, TypeRef::Void) {
            return;
        }
        if let Some(result) = context.result.clone() {
            caller_stack.push(result);
        }
    }
}

/// Returns `value`, bumping the per-type offset counter as a side effect —
/// lets `copy_arguments` update the right independent counter inline.
fn replace_offset(offset: &mut usize, value: StackValue) -> StackValue {
    *offset += 1;
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_pairs_name_and_parameters() {
        let method = Method {
            name: "entry".to_string(),
            class_name: "Main".to_string(),
            return_type: TypeRef::Void,
            modifiers: Vec::new(),
            parameters: vec![TypeRef::Int],
            bytecode: Vec::new(),
        };
        assert_eq!(method.signature(), ("entry", &[TypeRef::Int][..]));
    }
}
