//! Attribute protocol: `value.name` reads and `value.name = x` writes.
//!
//! | Kind | get | set |
//! |---|---|---|
//! | String, List | `length` | `length` is immutable |
//! | Map | string-key lookup | not supported yet |
//! | Script | functions, then globals | globals only |
//! | other objects | none | none |
//!
//! Primitives have no attributes at all and report NotSubscriptable.

use tern_core::{
    attribute_immutable, key_not_exists, no_attribute, not_implemented, not_subscriptable,
    EvalResult, Heap, Object, Value,
};

const LENGTH: &str = "length";

/// Read attribute `name` of `on`.
pub fn get_attribute(heap: &Heap, on: Value, name: &str) -> EvalResult {
    let Value::Object(r) = on else {
        return Err(not_subscriptable(heap.type_name(on)));
    };
    let object = heap.get(r);
    match object {
        Object::String(s) if name == LENGTH => Ok(length(s.len())),
        Object::List(l) if name == LENGTH => Ok(length(l.elements.len())),
        Object::Map(map) => heap
            .map_get_bytes(map, name.as_bytes())
            .ok_or_else(|| key_not_exists(format!("(\"{name}\")"))),
        Object::Script(script) => heap
            .script_function(script, name)
            .map(Value::Object)
            .or_else(|| script.global(name))
            .ok_or_else(|| no_attribute(object.value_type().name(), name)),
        _ => Err(no_attribute(object.value_type().name(), name)),
    }
}

/// Write attribute `name` of `on`. Only script globals are assignable.
pub fn set_attribute(heap: &mut Heap, on: Value, name: &str, value: Value) -> EvalResult<()> {
    let Value::Object(r) = on else {
        return Err(not_subscriptable(heap.type_name(on)));
    };
    let index = match heap.get(r) {
        Object::String(_) | Object::List(_) if name == LENGTH => {
            return Err(attribute_immutable(name));
        }
        Object::Map(_) => return Err(not_implemented("Setting attributes on a Map")),
        Object::Script(script) => {
            if let Some(function) = heap
                .script_function(script, name)
                .and_then(|f| heap.as_function(Value::Object(f)))
            {
                return Err(attribute_immutable(&function.name));
            }
            script
                .global_index(name)
                .ok_or_else(|| no_attribute("Script", name))?
        }
        object => return Err(no_attribute(object.value_type().name(), name)),
    };
    if let Some(script) = heap.as_script_mut(on) {
        script.globals[index].value = value;
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss, reason = "container lengths are far below 2^53")]
fn length(len: usize) -> Value {
    Value::Number(len as f64)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
