//! Builtin function table and module registry.
//!
//! Name collisions are host bugs and are reported as [`RegistrationError`]
//! at construction time, never as script errors. Every registered function
//! and module is a permanent GC root.

use super::Vm;
use crate::errors::RegistrationError;
use crate::native::NativeFn;
use crate::value::{Arity, FunctionBody, FunctionObj, Global, ObjRef, Object, ScriptObj, Value};

/// Entry of the global builtin table.
#[derive(Clone, Debug)]
pub struct BuiltinFn {
    pub name: String,
    pub arity: Arity,
    /// The function object scripts call.
    pub function: ObjRef,
}

impl Vm {
    /// Add a global, unqualified native function. Returns its table index.
    pub fn register_builtin(
        &mut self,
        name: &str,
        native: NativeFn,
        arity: Arity,
    ) -> Result<usize, RegistrationError> {
        if self.find_builtin(name).is_some() {
            return Err(RegistrationError::DuplicateBuiltin(name.to_string()));
        }
        if self.builtins.len() >= self.builtin_capacity {
            return Err(RegistrationError::BuiltinTableFull {
                capacity: self.builtin_capacity,
            });
        }

        let function = self.heap.alloc(Object::Function(FunctionObj {
            name: name.to_string(),
            owner: None,
            arity,
            body: FunctionBody::Native(native),
        }));
        self.heap.add_root(function);
        self.builtins.push(BuiltinFn {
            name: name.to_string(),
            arity,
            function,
        });
        tracing::debug!(name, arity = arity.raw(), "registered builtin");
        Ok(self.builtins.len() - 1)
    }

    /// Table index of the builtin called `name`.
    pub fn find_builtin(&self, name: &str) -> Option<usize> {
        self.builtins.iter().position(|builtin| builtin.name == name)
    }

    pub fn builtin(&self, index: usize) -> Option<&BuiltinFn> {
        self.builtins.get(index)
    }

    pub fn builtins(&self) -> &[BuiltinFn] {
        &self.builtins
    }

    /// Create an empty module and add it to the registry.
    pub fn create_module(&mut self, name: &str) -> Result<ObjRef, RegistrationError> {
        if self.modules.contains_key(name) {
            return Err(RegistrationError::DuplicateModule(name.to_string()));
        }
        let module = self.heap.alloc(Object::Script(ScriptObj::new(name)));
        self.heap.add_root(module);
        self.modules.insert(name.to_string(), module);
        tracing::debug!(name, "created module");
        Ok(module)
    }

    pub fn find_module(&self, name: &str) -> Option<ObjRef> {
        self.modules.get(name).copied()
    }

    /// Declare a native function on `module`.
    ///
    /// The name must not collide with a function or a global already on the
    /// module.
    pub fn add_function(
        &mut self,
        module: ObjRef,
        name: &str,
        native: NativeFn,
        arity: Arity,
    ) -> Result<ObjRef, RegistrationError> {
        self.declare_function(module, name, FunctionBody::Native(native), arity)
    }

    /// Declare a function whose body is compiled code on `module`.
    ///
    /// The interpreter loop runs such functions; the native bridge refuses
    /// them.
    pub fn add_code_function(
        &mut self,
        module: ObjRef,
        name: &str,
        code: impl Into<Box<[u8]>>,
        arity: Arity,
    ) -> Result<ObjRef, RegistrationError> {
        self.declare_function(module, name, FunctionBody::Code(code.into()), arity)
    }

    fn declare_function(
        &mut self,
        module: ObjRef,
        name: &str,
        body: FunctionBody,
        arity: Arity,
    ) -> Result<ObjRef, RegistrationError> {
        self.check_module_name(module, name)?;

        // The module is a permanent root, so it survives this allocation.
        let function = self.heap.alloc(Object::Function(FunctionObj {
            name: name.to_string(),
            owner: Some(module),
            arity,
            body,
        }));
        let script = self
            .heap
            .as_script_mut(Value::Object(module))
            .ok_or(RegistrationError::NotAModule)?;
        script.functions.push(function);
        tracing::debug!(module = %script.name, name, arity = arity.raw(), "added module function");
        self.heap.refresh_size(module);
        Ok(function)
    }

    /// Declare a global variable on `module`.
    pub fn add_global(
        &mut self,
        module: ObjRef,
        name: &str,
        value: Value,
    ) -> Result<(), RegistrationError> {
        self.check_module_name(module, name)?;
        let script = self
            .heap
            .as_script_mut(Value::Object(module))
            .ok_or(RegistrationError::NotAModule)?;
        script.globals.push(Global {
            name: name.to_string(),
            value,
        });
        tracing::debug!(module = %script.name, name, "added module global");
        self.heap.refresh_size(module);
        Ok(())
    }

    fn check_module_name(&self, module: ObjRef, name: &str) -> Result<(), RegistrationError> {
        let script = self
            .heap
            .try_get(module)
            .and_then(|object| match object {
                Object::Script(script) => Some(script),
                _ => None,
            })
            .ok_or(RegistrationError::NotAModule)?;

        if self.heap.script_function(script, name).is_some() {
            return Err(RegistrationError::DuplicateFunction {
                name: name.to_string(),
                module: script.name.clone(),
            });
        }
        if script.global_index(name).is_some() {
            return Err(RegistrationError::DuplicateGlobal {
                name: name.to_string(),
                module: script.name.clone(),
            });
        }
        Ok(())
    }
}
