//! Subscript protocol: `value[key]` reads and `value[key] = x` writes.
//!
//! Strings and lists take integer keys (a number or bool with no
//! fractional part) in `[0, len)`. Maps take any hashable key. Writes
//! mutate in place and never replace the container.

use tern_core::{
    immutable_object, invalid_key, key_not_exists, not_subscriptable, EvalResult, Heap, Object,
    Value,
};

use crate::validate::{validate_index, validate_integer};

/// Read `on[key]`.
///
/// Indexing a string allocates a one-byte string.
pub fn get_subscript(heap: &mut Heap, on: Value, key: Value) -> EvalResult {
    let Value::Object(r) = on else {
        return Err(not_subscriptable(heap.type_name(on)));
    };
    match heap.get(r) {
        Object::String(s) => {
            let index = validate_integer(key, "String index")?;
            let index = validate_index(index, s.len(), "String")?;
            let byte = s.as_bytes()[index];
            Ok(heap.new_string(&[byte]))
        }
        Object::List(list) => {
            let index = validate_integer(key, "List index")?;
            let index = validate_index(index, list.elements.len(), "List")?;
            Ok(list.elements[index])
        }
        Object::Map(map) => heap
            .map_get(map, key)
            .ok_or_else(|| missing_key(heap, key)),
        object => Err(not_subscriptable(object.value_type().name())),
    }
}

/// Write `on[key] = value`. Nothing is modified when an error is returned.
pub fn set_subscript(heap: &mut Heap, on: Value, key: Value, value: Value) -> EvalResult<()> {
    let Value::Object(r) = on else {
        return Err(not_subscriptable(heap.type_name(on)));
    };
    match heap.get(r) {
        Object::String(_) => Err(immutable_object("String")),
        Object::List(list) => {
            let index = validate_integer(key, "List index")?;
            let index = validate_index(index, list.elements.len(), "List")?;
            if let Some(list) = heap.as_list_mut(on) {
                list.elements[index] = value;
            }
            Ok(())
        }
        Object::Map(_) => heap.map_set(r, key, value),
        object => Err(not_subscriptable(object.value_type().name())),
    }
}

/// Lookup failure on a map. Unhashable keys can never be present, which is
/// reported differently from a hashable key that is simply absent.
#[cold]
fn missing_key(heap: &Heap, key: Value) -> tern_core::EvalError {
    let repr = format!("'{}'", heap.to_display(key, true));
    if heap.hash_value(key).is_some() {
        key_not_exists(repr)
    } else {
        invalid_key(repr)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
