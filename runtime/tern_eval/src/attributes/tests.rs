use pretty_assertions::assert_eq;
use tern_core::{Arity, ErrorCategory, EvalResult, HeapConfig, NativeCall, Vm, VmConfig};

use super::*;

fn heap() -> Heap {
    Heap::new(HeapConfig::default())
}

fn noop(_call: &mut NativeCall<'_>) -> EvalResult<()> {
    Ok(())
}

/// A module `m` with a function `f` and a global `g = 1`.
fn vm_with_module() -> (Vm, Value) {
    let mut vm = Vm::new(VmConfig::default());
    let module = vm.create_module("m").unwrap();
    vm.add_function(module, "f", noop, Arity::Fixed(0)).unwrap();
    vm.add_global(module, "g", Value::Number(1.0)).unwrap();
    (vm, Value::Object(module))
}

#[test]
fn length_of_strings_and_lists() {
    let mut heap = heap();
    let s = heap.new_str("hello");
    let list = heap.new_list(vec![Value::Null; 3]);
    assert_eq!(get_attribute(&heap, s, "length"), Ok(Value::Number(5.0)));
    assert_eq!(get_attribute(&heap, list, "length"), Ok(Value::Number(3.0)));
}

#[test]
fn unknown_attribute_names_the_type() {
    let mut heap = heap();
    let s = heap.new_str("x");
    let err = get_attribute(&heap, s, "size").unwrap_err();
    assert_eq!(err.message, "'String' object has no attribute named 'size'.");
    assert_eq!(err.category(), ErrorCategory::AttributeNotFound);
}

#[test]
fn length_is_immutable() {
    let mut heap = heap();
    let list = heap.new_list(vec![Value::Null]);
    let err = set_attribute(&mut heap, list, "length", Value::Number(0.0)).unwrap_err();
    assert_eq!(err.message, "'length' attribute is immutable.");
    assert_eq!(err.category(), ErrorCategory::AttributeImmutable);
    assert_eq!(heap.as_list(list).map(|l| l.elements.len()), Some(1));

    let s = heap.new_str("x");
    let err = set_attribute(&mut heap, s, "other", Value::Null).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::AttributeNotFound);
}

#[test]
fn map_attributes_are_key_lookups() {
    let mut heap = heap();
    let map = heap.new_map();
    let key = heap.new_str("answer");
    let m = map.as_object().unwrap();
    heap.map_set(m, key, Value::Number(42.0)).unwrap();

    assert_eq!(get_attribute(&heap, map, "answer"), Ok(Value::Number(42.0)));
    let err = get_attribute(&heap, map, "missing").unwrap_err();
    assert_eq!(err.message, "Key (\"missing\") not exists.");
    assert_eq!(err.category(), ErrorCategory::KeyNotExists);
}

#[test]
fn map_attribute_writes_are_rejected() {
    let mut heap = heap();
    let map = heap.new_map();
    let err = set_attribute(&mut heap, map, "k", Value::Null).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotImplemented);
    assert_eq!(heap.as_map(map).map(tern_core::MapObj::len), Some(0));
}

#[test]
fn script_functions_shadow_globals() {
    let (vm, module) = vm_with_module();
    let f = get_attribute(&vm.heap, module, "f").unwrap();
    assert_eq!(vm.heap.as_function(f).map(|f| f.name.as_str()), Some("f"));
    assert_eq!(get_attribute(&vm.heap, module, "g"), Ok(Value::Number(1.0)));

    let err = get_attribute(&vm.heap, module, "h").unwrap_err();
    assert_eq!(err.message, "'Script' object has no attribute named 'h'.");
}

#[test]
fn script_globals_are_assignable() {
    let (mut vm, module) = vm_with_module();
    set_attribute(&mut vm.heap, module, "g", Value::Bool(true)).unwrap();
    assert_eq!(get_attribute(&vm.heap, module, "g"), Ok(Value::Bool(true)));
}

#[test]
fn script_functions_are_immutable() {
    let (mut vm, module) = vm_with_module();
    let err = set_attribute(&mut vm.heap, module, "f", Value::Null).unwrap_err();
    assert_eq!(err.message, "'f' attribute is immutable.");

    let err = set_attribute(&mut vm.heap, module, "nope", Value::Null).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::AttributeNotFound);
}

#[test]
fn other_objects_have_no_attributes() {
    let mut heap = heap();
    let range = heap.new_range(0.0, 3.0);
    let user = heap.new_user_object("Handle", 9);
    for value in [range, user] {
        assert_eq!(
            get_attribute(&heap, value, "length").unwrap_err().category(),
            ErrorCategory::AttributeNotFound
        );
        assert_eq!(
            set_attribute(&mut heap, value, "length", Value::Null).unwrap_err().category(),
            ErrorCategory::AttributeNotFound
        );
    }
}

#[test]
fn primitives_are_not_subscriptable() {
    let mut heap = heap();
    let err = get_attribute(&heap, Value::Number(1.0), "length").unwrap_err();
    assert_eq!(err.message, "Number type is not subscriptable.");
    let err = set_attribute(&mut heap, Value::Null, "x", Value::Null).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotSubscriptable);
}
