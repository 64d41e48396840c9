//! End-to-end tests of the script-facing builtins and the `lang` module,
//! calling through the native bridge the way the interpreter does.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use tern_core::{
    Arity, EvalResult, HeapConfig, NativeCall, PrintHandler, RegistrationError, Value, Vm,
    VmConfig,
};
use tern_eval::{
    create_vm, get_attribute, get_subscript, init_tracing, iterate, set_subscript, IterStep,
};

fn builtin(vm: &Vm, name: &str) -> Value {
    let index = vm.find_builtin(name).unwrap();
    Value::Object(vm.builtin(index).unwrap().function)
}

fn lang_function(vm: &Vm, name: &str) -> Value {
    let lang = Value::Object(vm.find_module("lang").unwrap());
    get_attribute(&vm.heap, lang, name).unwrap()
}

fn buffered_vm(heap: HeapConfig) -> (Vm, std::sync::Arc<tern_core::BufferPrintHandler>) {
    init_tracing();
    let (handler, buffer) = PrintHandler::buffer();
    let vm = create_vm(VmConfig::default().with_print(handler).with_heap(heap)).unwrap();
    (vm, buffer)
}

#[test]
fn print_separates_with_spaces_and_ends_the_line() {
    let (mut vm, buffer) = buffered_vm(HeapConfig::default());
    let print = builtin(&vm, "print");
    let s = vm.heap.new_str("hello");
    let list = vm.heap.new_list(vec![Value::Number(1.0), s]);

    vm.call_native(print, &[s, Value::Number(2.5), Value::Bool(true), list])
        .unwrap();
    assert_eq!(buffer.output(), "hello 2.5 true [1, \"hello\"]\n");
}

#[test]
fn print_with_no_arguments_writes_a_newline() {
    let (mut vm, buffer) = buffered_vm(HeapConfig::default());
    let print = builtin(&vm, "print");
    vm.call_native(print, &[]).unwrap();
    assert_eq!(buffer.output(), "\n");
}

#[test]
fn lang_write_has_no_separators() {
    let (mut vm, buffer) = buffered_vm(HeapConfig::default());
    let write = lang_function(&vm, "write");
    let s = vm.heap.new_str("a");
    vm.call_native(write, &[s, Value::Number(1.0), Value::Null]).unwrap();
    assert_eq!(buffer.output(), "a1null");
}

#[test]
fn lang_gc_reports_reclaimed_bytes() {
    let (mut vm, _buffer) = buffered_vm(HeapConfig::default());
    let gc = lang_function(&vm, "gc");
    for i in 0..32 {
        vm.heap.new_str(&format!("garbage {i}"));
    }
    let freed = vm.call_native(gc, &[]).unwrap();
    assert!(matches!(freed, Value::Number(n) if n > 0.0));

    let again = vm.call_native(gc, &[]).unwrap();
    assert_eq!(again, Value::Number(0.0));
}

#[test]
fn lang_clock_is_monotonic() {
    let (mut vm, _buffer) = buffered_vm(HeapConfig::default());
    let clock = lang_function(&vm, "clock");
    let Ok(Value::Number(first)) = vm.call_native(clock, &[]) else {
        panic!("clock returns a number");
    };
    let Ok(Value::Number(second)) = vm.call_native(clock, &[]) else {
        panic!("clock returns a number");
    };
    assert!(first >= 0.0);
    assert!(second >= first);
}

#[test]
fn lang_functions_reject_arguments() {
    let (mut vm, _buffer) = buffered_vm(HeapConfig::default());
    let clock = lang_function(&vm, "clock");
    let err = vm.call_native(clock, &[Value::Null]).unwrap_err();
    assert_eq!(err.message, "Expected exactly 0 argument(s).");
}

#[test]
fn builtins_survive_stress_collection() {
    let (mut vm, buffer) = buffered_vm(HeapConfig::stress());
    let upper = builtin(&vm, "str_upper");
    let print = builtin(&vm, "print");

    let arg = vm.heap.new_str("loud");
    let shouted = vm.call_native(upper, &[arg]).unwrap();
    vm.call_native(print, &[shouted]).unwrap();
    assert_eq!(buffer.output(), "LOUD\n");
}

#[test]
fn containers_through_protocols() {
    let (mut vm, _buffer) = buffered_vm(HeapConfig::default());
    let map = vm.heap.new_map();
    let key = vm.heap.new_str("k");
    vm.heap.add_root(map.as_object().unwrap());

    set_subscript(&mut vm.heap, map, key, Value::Number(1.0)).unwrap();
    assert_eq!(get_subscript(&mut vm.heap, map, key), Ok(Value::Number(1.0)));

    let step = iterate(&mut vm.heap, map, Value::Null).unwrap();
    let IterStep::Next { value, .. } = step else {
        panic!("map has one key");
    };
    assert_eq!(vm.heap.to_display(value, false), "k");
}

fn host_double(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let n = call.get_number(1)?;
    call.return_number(n * 2.0);
    Ok(())
}

#[test]
fn host_modules_extend_the_core() {
    let (mut vm, _buffer) = buffered_vm(HeapConfig::default());
    let module = vm.create_module("host").unwrap();
    vm.add_function(module, "double", host_double, Arity::Fixed(1)).unwrap();

    let double = get_attribute(&vm.heap, Value::Object(module), "double").unwrap();
    assert_eq!(vm.call_native(double, &[Value::Bool(true)]), Ok(Value::Number(2.0)));

    assert_eq!(
        vm.add_function(module, "double", host_double, Arity::Fixed(1)),
        Err(RegistrationError::DuplicateFunction {
            name: "double".to_string(),
            module: "host".to_string(),
        })
    );
    assert_eq!(
        vm.create_module("lang"),
        Err(RegistrationError::DuplicateModule("lang".to_string()))
    );
}
