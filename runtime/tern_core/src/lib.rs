//! Core runtime types for the Tern scripting language.
//!
//! This crate holds everything the semantics layer is built on:
//!
//! - [`Value`] and the heap object kinds
//! - [`Heap`]: arena allocation, mark/sweep collection and scoped pinning
//! - [`Vm`]: fiber, builtin table and module registry
//! - [`NativeCall`]: the native function calling convention
//! - [`EvalError`] and [`RegistrationError`]
//!
//! Operators, access protocols and the builtin library live in `tern_eval`.

mod config;
mod errors;
mod heap;
mod native;
mod print_handler;
pub mod value;
mod vm;

pub use config::{HeapConfig, VmConfig};
pub use errors::{
    assertion_failed, attribute_immutable, immutable_object, index_out_of_range, invalid_arg_count,
    invalid_key, key_not_exists, no_attribute, not_an_integer, not_callable, not_hashable,
    not_implemented, not_iterable, not_native, not_numeric, not_subscriptable,
    unexpected_kind, unsupported_operands, wrong_arg_count, wrong_arg_type, ErrorCategory, EvalError,
    EvalErrorKind, EvalResult, RegistrationError,
};
pub use heap::{format_number, Heap, Pinned};
pub use native::{NativeCall, NativeFn};
pub use print_handler::{BufferPrintHandler, PrintHandler};
pub use value::{
    Arity, FiberObj, FunctionBody, FunctionObj, Global, ListObj, MapObj, ObjRef, Object, RangeObj, ScriptObj,
    StringObj, UserObj, Value, ValueType,
};
pub use vm::{BuiltinFn, Vm};
