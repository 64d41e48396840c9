use pretty_assertions::assert_eq;

use super::*;
use crate::config::HeapConfig;
use crate::errors::{EvalResult, RegistrationError};
use crate::native::NativeCall;
use crate::value::Arity;

fn noop(_call: &mut NativeCall<'_>) -> EvalResult<()> {
    Ok(())
}

fn vm() -> Vm {
    Vm::new(VmConfig::default())
}

#[test]
fn builtins_are_found_by_exact_name() {
    let mut vm = vm();
    let index = vm.register_builtin("noop", noop, Arity::Fixed(0)).unwrap();
    assert_eq!(vm.find_builtin("noop"), Some(index));
    assert_eq!(vm.find_builtin("noo"), None);
    let entry = vm.builtin(index).unwrap();
    assert_eq!(entry.arity, Arity::Fixed(0));
    assert_eq!(
        vm.heap.as_function(Value::Object(entry.function)).map(|f| f.name.as_str()),
        Some("noop")
    );
}

#[test]
fn duplicate_builtin_is_rejected() {
    let mut vm = vm();
    vm.register_builtin("noop", noop, Arity::Fixed(0)).unwrap();
    assert_eq!(
        vm.register_builtin("noop", noop, Arity::Variadic),
        Err(RegistrationError::DuplicateBuiltin("noop".to_string()))
    );
    assert_eq!(vm.builtins().len(), 1);
}

#[test]
fn full_builtin_table_is_rejected() {
    let mut vm = Vm::new(VmConfig::default().with_builtin_capacity(1));
    vm.register_builtin("a", noop, Arity::Fixed(0)).unwrap();
    assert_eq!(
        vm.register_builtin("b", noop, Arity::Fixed(0)),
        Err(RegistrationError::BuiltinTableFull { capacity: 1 })
    );
}

#[test]
fn duplicate_module_is_rejected() {
    let mut vm = vm();
    let module = vm.create_module("path").unwrap();
    assert_eq!(vm.find_module("path"), Some(module));
    assert_eq!(
        vm.create_module("path"),
        Err(RegistrationError::DuplicateModule("path".to_string()))
    );
}

#[test]
fn module_names_collide_across_functions_and_globals() {
    let mut vm = vm();
    let module = vm.create_module("m").unwrap();
    vm.add_function(module, "f", noop, Arity::Fixed(0)).unwrap();
    vm.add_global(module, "g", Value::Number(1.0)).unwrap();

    assert_eq!(
        vm.add_function(module, "f", noop, Arity::Fixed(0)),
        Err(RegistrationError::DuplicateFunction {
            name: "f".to_string(),
            module: "m".to_string(),
        })
    );
    assert_eq!(
        vm.add_function(module, "g", noop, Arity::Fixed(0)),
        Err(RegistrationError::DuplicateGlobal {
            name: "g".to_string(),
            module: "m".to_string(),
        })
    );
    assert!(matches!(
        vm.add_global(module, "f", Value::Null),
        Err(RegistrationError::DuplicateFunction { .. })
    ));
}

#[test]
fn compiled_functions_share_the_module_namespace() {
    let mut vm = vm();
    let module = vm.create_module("m").unwrap();
    let main = vm
        .add_code_function(module, "main", vec![0x01_u8, 0x02], Arity::Fixed(0))
        .unwrap();
    let f = vm.heap.as_function(Value::Object(main)).unwrap();
    assert!(f.body.as_native().is_none());
    assert_eq!(format!("{:?}", f.body), "Code(2 bytes)");

    assert!(matches!(
        vm.add_function(module, "main", noop, Arity::Fixed(0)),
        Err(RegistrationError::DuplicateFunction { .. })
    ));
}

#[test]
fn adding_to_a_non_module_is_rejected() {
    let mut vm = vm();
    let fiber = vm.fiber();
    assert_eq!(
        vm.add_function(fiber, "f", noop, Arity::Fixed(0)),
        Err(RegistrationError::NotAModule)
    );
}

#[test]
fn registered_objects_survive_collection() {
    let mut vm = Vm::new(VmConfig::default().with_heap(HeapConfig::stress()));
    let module = vm.create_module("m").unwrap();
    let function = vm.add_function(module, "f", noop, Arity::Variadic).unwrap();
    let index = vm.register_builtin("b", noop, Arity::Fixed(0)).unwrap();
    vm.heap.collect();

    assert!(vm.heap.is_live(module));
    assert!(vm.heap.is_live(function));
    assert!(vm.heap.is_live(vm.builtin(index).unwrap().function));
    assert!(vm.heap.is_live(vm.fiber()));
}

#[test]
fn string_list_survives_stress_allocation() {
    let mut vm = Vm::new(VmConfig::default().with_heap(HeapConfig::stress()));
    let list = vm.new_string_list(&["a", "b", "c"]);
    assert_eq!(vm.heap.to_display(list, false), "[\"a\", \"b\", \"c\"]");
}

#[test]
fn write_without_sink_is_a_no_op() {
    let vm = vm();
    assert!(!vm.has_print_sink());
    vm.write("ignored");
}

#[test]
fn write_reaches_the_buffer() {
    let (handler, buffer) = PrintHandler::buffer();
    let vm = Vm::new(VmConfig::default().with_print(handler));
    vm.write("a");
    vm.write("b\n");
    assert_eq!(buffer.output(), "ab\n");
}
