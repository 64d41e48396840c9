//! Core initialization: the global builtins and the `lang` module.

use tern_core::{RegistrationError, Vm, VmConfig};

use crate::builtins::{register_builtins, register_lang};

/// Register the builtin table and core modules on a fresh VM.
///
/// Fails only if the host already registered a colliding name, or the
/// configured builtin capacity is too small.
pub fn initialize_core(vm: &mut Vm) -> Result<(), RegistrationError> {
    register_builtins(vm)?;
    register_lang(vm)?;
    tracing::debug!(builtins = vm.builtins().len(), "core initialized");
    Ok(())
}

/// Create a VM with the core library installed.
pub fn create_vm(config: VmConfig) -> Result<Vm, RegistrationError> {
    let mut vm = Vm::new(config);
    initialize_core(&mut vm)?;
    Ok(vm)
}
