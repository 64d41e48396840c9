//! Global builtin functions.
//!
//! Each builtin is a plain [`NativeFn`](tern_core::NativeFn) that reads its
//! arguments through [`NativeCall`] and writes the return slot. Errors are
//! returned before any side effect.

pub mod lang;
mod strings;

use tern_core::{
    assertion_failed, invalid_arg_count, Arity, EvalResult, NativeCall, NativeFn,
    RegistrationError, ValueType, Vm,
};

use crate::operators;

pub use lang::register_lang;
pub use strings::{str_lower, str_strip, str_upper};

/// Define `is_<kind>` predicates that test the kind of argument 1.
macro_rules! kind_predicates {
    ($($name:ident => $kind:ident),* $(,)?) => {
        $(
            pub fn $name(call: &mut NativeCall<'_>) -> EvalResult<()> {
                let is_kind = call.heap().value_type(call.arg(1)) == ValueType::$kind;
                call.return_bool(is_kind);
                Ok(())
            }
        )*
    };
}

kind_predicates! {
    is_null => Null,
    is_bool => Bool,
    is_num => Number,
    is_string => String,
    is_list => List,
    is_map => Map,
    is_range => Range,
    is_function => Function,
    is_script => Script,
    is_userobj => UserObj,
}

/// `assert(condition, message?)`.
pub fn assert(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let argc = call.argc();
    if argc != 1 && argc != 2 {
        return Err(invalid_arg_count(argc));
    }
    if call.get_bool(1) {
        return Ok(());
    }
    let message = (argc == 2).then(|| call.heap().to_display(call.arg(2), false));
    Err(assertion_failed(message))
}

/// `hash(value)`: a number for hashable values, `null` otherwise.
pub fn hash(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let hashed = operators::hash(call.heap(), call.arg(1));
    call.return_value(hashed);
    Ok(())
}

/// `to_string(value)`: the plain string form of any value.
pub fn to_string(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let value = call.arg(1);
    if call.heap().as_string(value).is_some() {
        call.return_value(value);
        return Ok(());
    }
    let text = call.heap().to_display(value, false);
    let result = call.heap_mut().new_str(&text);
    call.return_value(result);
    Ok(())
}

/// `print(...)`: arguments separated by spaces, then a newline.
pub fn print(call: &mut NativeCall<'_>) -> EvalResult<()> {
    if !call.vm().has_print_sink() {
        return Ok(());
    }
    let mut line = join_args(call, " ");
    line.push('\n');
    call.vm().write(&line);
    Ok(())
}

/// Plain string forms of every argument joined by `separator`.
pub(crate) fn join_args(call: &NativeCall<'_>, separator: &str) -> String {
    let heap = call.heap();
    call.args()
        .iter()
        .map(|&arg| heap.to_display(arg, false))
        .collect::<Vec<_>>()
        .join(separator)
}

/// The global builtin table, in registration order.
pub const BUILTINS: &[(&str, NativeFn, Arity)] = &[
    ("is_null", is_null, Arity::Fixed(1)),
    ("is_bool", is_bool, Arity::Fixed(1)),
    ("is_num", is_num, Arity::Fixed(1)),
    ("is_string", is_string, Arity::Fixed(1)),
    ("is_list", is_list, Arity::Fixed(1)),
    ("is_map", is_map, Arity::Fixed(1)),
    ("is_range", is_range, Arity::Fixed(1)),
    ("is_function", is_function, Arity::Fixed(1)),
    ("is_script", is_script, Arity::Fixed(1)),
    ("is_userobj", is_userobj, Arity::Fixed(1)),
    ("assert", assert, Arity::Variadic),
    ("hash", hash, Arity::Fixed(1)),
    ("to_string", to_string, Arity::Fixed(1)),
    ("print", print, Arity::Variadic),
    ("str_lower", str_lower, Arity::Fixed(1)),
    ("str_upper", str_upper, Arity::Fixed(1)),
    ("str_strip", str_strip, Arity::Fixed(1)),
];

/// Register every entry of [`BUILTINS`] on `vm`.
pub fn register_builtins(vm: &mut Vm) -> Result<(), RegistrationError> {
    for &(name, native, arity) in BUILTINS {
        vm.register_builtin(name, native, arity)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
