//! Drives one method invocation's instruction loop.

use crate::method::Method;
use crate::stack::{Stack, StackValue};
use crate::storage::Storage;

pub struct Context<'a> {
    pub stack: &'a mut Stack,
    pub storage: Storage,
    pub cursor: usize,
    pub length: usize,
    pub method: &'a Method,
    pub result: Option<StackValue>,
}

impl<'a> Context<'a> {
    pub fn new(stack: &'a mut Stack, storage: Storage, method: &'a Method) -> Self {
        Self {
            stack,
            storage,
            cursor: 0,
            length: method.bytecode.len(),
            method,
            result: None,
        }
    }
}
