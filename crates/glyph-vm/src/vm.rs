//! Loads textual bytecode into a class table and drives instruction
//! execution. The class table is append-only once execution begins.

use glyph_bytecode::Instruction;
use glyph_core::{LoadError, RuntimeError};

use crate::class::Class;
use crate::context::Context;

#[derive(Debug, Default)]
pub struct VirtualMachine {
    classes: Vec<Class>,
    executing: bool,
}

impl VirtualMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn get_class_index(&self, name: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.name == name)
    }

    pub fn class_at(&self, index: usize) -> Option<&Class> {
        self.classes.get(index)
    }

    /// Scan concatenated bytecode lines, building a `Class` per top-level
    /// `cdef ... cbegin ... cend` block (§4.5 step 2).
    pub fn load_bytecode(&mut self, lines: &[String]) -> Result<(), LoadError> {
        if self.executing {
            return Err(LoadError::MalformedSection { detail: "define_class after execution has begun".to_string() });
        }

        let mut name: Option<String> = None;
        let mut superclass = "Object".to_string();
        let mut modifiers = Vec::new();
        let mut interfaces = Vec::new();
        let mut content: Vec<String> = Vec::new();
        let mut content_begun = false;
        let mut class_offset = 0usize;

        for line in lines {
            let args: Vec<&str> = line.split_whitespace().collect();
            let Some(opcode) = args.first().copied() else { continue };

            if content_begun {
                if opcode == "cend" {
                    class_offset -= 1;
                    if class_offset == 0 {
                        content_begun = false;
                        let class_name = name.take().unwrap_or_else(|| "<unk>".to_string());
                        if self.get_class(&class_name).is_some() {
                            return Err(LoadError::ClassRedefinition { name: class_name });
                        }
                        let class = Class::build(class_name, superclass.clone(), modifiers.clone(), interfaces.clone(), &content)?;
                        self.classes.push(class);

                        superclass = "Object".to_string();
                        modifiers.clear();
                        interfaces.clear();
                        content.clear();
                        continue;
                    }
                }
                if opcode == "cbegin" {
                    class_offset += 1;
                }
                content.push(line.clone());
                continue;
            }

            match opcode {
                "cdef" => name = args.get(1).map(|s| s.to_string()),
                "cmod" => modifiers = args[1..].iter().map(|s| s.to_string()).collect(),
                "cext" => superclass = args.get(1).copied().unwrap_or("Object").to_string(),
                "cimpl" => interfaces = args[1..].iter().map(|s| s.to_string()).collect(),
                "cbegin" => {
                    class_offset += 1;
                    if class_offset == 1 {
                        content_begun = true;
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Attempt early binding of deferred instruction references, once all
    /// classes have been loaded (§4.5 step 4).
    pub fn initialize_instructions(&self) {
        for class in &self.classes {
            for method in &class.methods {
                for instr in &method.bytecode {
                    self.try_resolve(instr);
                }
            }
        }
    }

    pub fn begin_execution(&mut self) {
        self.executing = true;
    }

    fn try_resolve(&self, instr: &Instruction) {
        if let Instruction::InvokeStatic(invoke) = instr {
            if invoke.class_ref.get().is_none() {
                if let Some(class_idx) = self.get_class_index(&invoke.class_name) {
                    invoke.class_ref.set(class_idx);
                    if invoke.method_ref.get().is_none() {
                        if let Some(method_idx) = self.classes[class_idx].get_method_index(&invoke.method_name, &invoke.param_types) {
                            invoke.method_ref.set(method_idx);
                        }
                    }
                }
            }
        }
    }

    /// Execute one bytecode instruction against `context`. `invokestatic` is
    /// the only opcode this spec assigns semantics to; everything else is
    /// recognized but left a no-op (§4.5, §9 open question).
    pub fn execute_instruction(&self, instr: &Instruction, context: &mut Context<'_>) -> Result<(), RuntimeError> {
        match instr {
            Instruction::InvokeStatic(invoke) => {
                if invoke.class_ref.get().is_none() {
                    self.try_resolve(instr);
                }
                let class_idx = invoke
                    .class_ref
                    .get()
                    .ok_or_else(|| RuntimeError::NoSuchClass { name: invoke.class_name.clone() })?;
                let class = &self.classes[class_idx];

                if invoke.method_ref.get().is_none() {
                    if let Some(method_idx) = class.get_method_index(&invoke.method_name, &invoke.param_types) {
                        invoke.method_ref.set(method_idx);
                    }
                }
                let method_idx = invoke.method_ref.get().ok_or_else(|| RuntimeError::NoSuchMethod {
                    class: invoke.class_name.clone(),
                    method: invoke.method_name.clone(),
                    params: invoke.param_types.iter().map(ToString::to_string).collect(),
                })?;

                log::trace!("invokestatic {}.{}", invoke.class_name, invoke.method_name);
                class.methods[method_idx].invoke(self, context.stack, None)
            }
            Instruction::Raw(raw) => {
                log::trace!("skipping unimplemented opcode `{}`", raw.opcode);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivial_program() -> Vec<String> {
        ["cdef Main", "cbegin", "mdef entry", "mmod static", "mparam", "mreturn V", "mbegin", "mend", "cend"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn loads_a_single_class() {
        let mut vm = VirtualMachine::new();
        vm.load_bytecode(&trivial_program()).unwrap();
        assert!(vm.get_class("Main").is_some());
        assert_eq!(vm.get_class("Main").unwrap().methods.len(), 1);
    }

    #[test]
    fn redefining_a_class_is_a_load_error() {
        let mut vm = VirtualMachine::new();
        let program = trivial_program();
        vm.load_bytecode(&program).unwrap();
        let err = vm.load_bytecode(&program).unwrap_err();
        assert!(matches!(err, LoadError::ClassRedefinition { .. }));
    }

    #[test]
    fn static_invoke_with_void_return_leaves_caller_stack_unchanged() {
        let mut vm = VirtualMachine::new();
        vm.load_bytecode(&trivial_program()).unwrap();
        vm.initialize_instructions();

        let mut caller_stack = crate::stack::Stack::new(None, "caller");
        let class = vm.get_class("Main").unwrap();
        let method = class.get_method("entry", &[]).unwrap();
        method.invoke(&vm, &mut caller_stack, None).unwrap();

        assert_eq!(caller_stack.ints.len(), 0);
        assert_eq!(caller_stack.instances.len(), 0);
    }

    #[test]
    fn invokestatic_resolves_a_class_defined_later_in_source() {
        let mut vm = VirtualMachine::new();
        let caller_program: Vec<String> = [
            "cdef Caller", "cbegin", "mdef run", "mparam", "mreturn V", "mbegin", "invokestatic Late greet", "mend", "cend",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        vm.load_bytecode(&caller_program).unwrap();
        // `Late` doesn't exist yet: initialize leaves the reference unresolved.
        vm.initialize_instructions();

        let late_program: Vec<String> =
            ["cdef Late", "cbegin", "mdef greet", "mparam", "mreturn V", "mbegin", "mend", "cend"]
                .iter()
                .map(|s| s.to_string())
                .collect();
        vm.load_bytecode(&late_program).unwrap();

        let mut caller_stack = crate::stack::Stack::new(None, "root");
        let caller_class = vm.get_class("Caller").unwrap();
        let run = caller_class.get_method("run", &[]).unwrap();
        run.invoke(&vm, &mut caller_stack, None).unwrap();
    }

    #[test]
    fn invokestatic_missing_class_is_a_runtime_error() {
        let mut vm = VirtualMachine::new();
        let program: Vec<String> = [
            "cdef Caller", "cbegin", "mdef run", "mparam", "mreturn V", "mbegin", "invokestatic Ghost greet", "mend", "cend",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        vm.load_bytecode(&program).unwrap();
        vm.initialize_instructions();

        let mut caller_stack = crate::stack::Stack::new(None, "root");
        let caller_class = vm.get_class("Caller").unwrap();
        let run = caller_class.get_method("run", &[]).unwrap();
        let err = run.invoke(&vm, &mut caller_stack, None).unwrap_err();
        assert!(matches!(err, RuntimeError::NoSuchClass { .. }));
    }
}
