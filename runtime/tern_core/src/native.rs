//! Native calling convention.
//!
//! A native function sees its arguments as a 1-based window on the fiber
//! stack. Slot 0 of the window is the return slot; it starts out as `null`
//! and is read back by the caller once the function returns `Ok`.
//!
//! Typed getters report a positional error that the native function
//! propagates with `?`, so nothing runs after a failed extraction.

use crate::errors::{not_callable, not_native, wrong_arg_count, wrong_arg_type, EvalResult};
use crate::heap::Heap;
use crate::value::{Arity, Value, ValueType};
use crate::vm::Vm;

/// Entry point of a host-implemented function.
pub type NativeFn = fn(&mut NativeCall<'_>) -> EvalResult<()>;

/// Execution context handed to a [`NativeFn`].
pub struct NativeCall<'vm> {
    vm: &'vm mut Vm,
    /// Index of the return slot on the fiber stack.
    base: usize,
    argc: usize,
}

impl NativeCall<'_> {
    #[inline]
    pub fn argc(&self) -> usize {
        self.argc
    }

    /// Argument `index`, counted from 1.
    ///
    /// Indices outside `1..=argc` are a bug in the native function.
    pub fn arg(&self, index: usize) -> Value {
        assert!(
            (1..=self.argc).contains(&index),
            "argument index {index} out of bounds (argc = {})",
            self.argc
        );
        self.stack()[self.base + index]
    }

    /// All arguments in order.
    pub fn args(&self) -> &[Value] {
        &self.stack()[self.base + 1..=self.base + self.argc]
    }

    /// Numeric argument; bools coerce to 0 and 1.
    pub fn get_number(&self, index: usize) -> EvalResult<f64> {
        self.arg(index)
            .as_numeric()
            .ok_or_else(|| wrong_arg_type("number", index))
    }

    /// Boolean view of an argument under the truthiness rule. Never fails.
    pub fn get_bool(&self, index: usize) -> bool {
        self.arg(index).is_truthy()
    }

    /// Argument that must be of exactly `kind`.
    pub fn get_value_of_kind(&self, index: usize, kind: ValueType) -> EvalResult<Value> {
        let value = self.arg(index);
        if self.vm.heap.value_type(value) == kind {
            Ok(value)
        } else {
            Err(wrong_arg_type(kind.name(), index))
        }
    }

    // Return slot

    pub fn return_null(&mut self) {
        self.return_value(Value::Null);
    }

    pub fn return_bool(&mut self, value: bool) {
        self.return_value(Value::Bool(value));
    }

    pub fn return_number(&mut self, value: f64) {
        self.return_value(Value::Number(value));
    }

    pub fn return_value(&mut self, value: Value) {
        let base = self.base;
        self.stack_mut()[base] = value;
    }

    // VM access

    #[inline]
    pub fn vm(&self) -> &Vm {
        &*self.vm
    }

    #[inline]
    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut *self.vm
    }

    #[inline]
    pub fn heap(&self) -> &Heap {
        &self.vm.heap
    }

    /// Mutable heap access. Arguments stay rooted by the fiber stack, so
    /// allocating here never frees them.
    #[inline]
    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.vm.heap
    }

    fn stack(&self) -> &[Value] {
        &self.vm.fiber_ref().stack
    }

    fn stack_mut(&mut self) -> &mut Vec<Value> {
        &mut self.vm.fiber_mut().stack
    }
}

impl Vm {
    /// Invoke the native function behind `function` with `args`.
    ///
    /// Functions with a compiled body belong to the interpreter loop and are
    /// rejected here.
    ///
    /// The argument window is pushed onto the fiber stack (which keeps the
    /// arguments rooted during the call) and popped again afterwards, on
    /// success and on error.
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn call_native(&mut self, function: Value, args: &[Value]) -> EvalResult {
        let Some(f) = self.heap.as_function(function) else {
            return Err(not_callable(self.heap.type_name(function)));
        };
        let Some(native) = f.body.as_native() else {
            return Err(not_native(&f.name));
        };
        if let Arity::Fixed(expected) = f.arity {
            if expected != args.len() {
                return Err(wrong_arg_count(expected, args.len()));
            }
        }
        tracing::trace!(name = %f.name, argc = args.len(), "native call");

        let base = {
            let stack = &mut self.fiber_mut().stack;
            let base = stack.len();
            stack.push(Value::Null);
            stack.extend_from_slice(args);
            base
        };
        let fiber = self.fiber();
        self.heap.refresh_size(fiber);

        let mut call = NativeCall {
            vm: self,
            base,
            argc: args.len(),
        };
        let outcome = native(&mut call);

        let stack = &mut self.fiber_mut().stack;
        let returned = stack[base];
        stack.truncate(base);
        outcome.map(|()| returned)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
