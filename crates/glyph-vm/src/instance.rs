//! Opaque object references. Lifecycle is external to the VM — kept alive
//! by the reference wrapper for as long as it is reachable from any live
//! `Stack`/`Storage`; the VM never frees one directly.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct Instance {
    pub class_name: String,
    fields: RefCell<rustc_hash::FxHashMap<String, crate::stack::StackValue>>,
}

impl Instance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            fields: RefCell::new(rustc_hash::FxHashMap::default()),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<crate::stack::StackValue> {
        self.fields.borrow().get(name).cloned()
    }

    pub fn set_field(&self, name: &str, value: crate::stack::StackValue) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }
}

/// A shared, reference-counted handle to an [`Instance`]. Cloning shares
/// ownership rather than copying the underlying object, matching the
/// "externally managed reference-counted handle" contract.
pub type InstanceRef = Rc<Instance>;
