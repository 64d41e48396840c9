//! The core `lang` module.

use tern_core::{Arity, EvalResult, NativeCall, RegistrationError, Vm};

use super::join_args;

/// `lang.clock()`: seconds since the VM was created.
pub fn clock(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let seconds = call.vm().elapsed_seconds();
    call.return_number(seconds);
    Ok(())
}

/// `lang.gc()`: run a collection and return the number of bytes freed.
pub fn gc(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let freed = call.heap_mut().collect();
    #[allow(clippy::cast_precision_loss, reason = "heap sizes are far below 2^53")]
    let freed = freed as f64;
    call.return_number(freed);
    Ok(())
}

/// `lang.write(...)`: like `print` without separators or a newline.
pub fn write(call: &mut NativeCall<'_>) -> EvalResult<()> {
    if !call.vm().has_print_sink() {
        return Ok(());
    }
    let text = join_args(call, "");
    call.vm().write(&text);
    Ok(())
}

/// Create the `lang` module and its functions.
pub fn register_lang(vm: &mut Vm) -> Result<(), RegistrationError> {
    let lang = vm.create_module("lang")?;
    vm.add_function(lang, "clock", clock, Arity::Fixed(0))?;
    vm.add_function(lang, "gc", gc, Arity::Fixed(0))?;
    vm.add_function(lang, "write", write, Arity::Variadic)?;
    Ok(())
}
