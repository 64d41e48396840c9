use pretty_assertions::assert_eq;

use super::*;

fn heap() -> Heap {
    Heap::new(HeapConfig::default())
}

fn stress_heap() -> Heap {
    Heap::new(HeapConfig::stress())
}

// Allocation and Collection

#[test]
fn unrooted_objects_are_reclaimed() {
    let mut heap = heap();
    let s = heap.new_str("garbage");
    let r = s.as_object().unwrap();
    assert!(heap.is_live(r));

    let freed = heap.collect();
    assert!(freed > 0);
    assert!(!heap.is_live(r));
    assert_eq!(heap.live_objects(), 0);
    assert_eq!(heap.bytes_allocated(), 0);
}

#[test]
fn permanent_roots_survive_until_removed() {
    let mut heap = heap();
    let list = heap.new_list(Vec::new());
    let r = list.as_object().unwrap();
    heap.add_root(r);

    heap.collect();
    assert!(heap.is_live(r));

    heap.remove_root(r);
    heap.collect();
    assert!(!heap.is_live(r));
}

#[test]
fn reachable_children_are_kept() {
    let mut heap = heap();
    let inner = heap.new_str("inner");
    let outer = heap.new_list(vec![inner]);
    heap.add_root(outer.as_object().unwrap());

    heap.collect();
    assert_eq!(heap.as_string(inner).map(|s| s.to_str_lossy().into_owned()), Some("inner".to_string()));
}

#[test]
fn pinned_values_survive_stress_collection() {
    let mut heap = stress_heap();
    let first = heap.new_str("kept");
    {
        let mut pinned = heap.pin(&[first]);
        // Every allocation collects in stress mode.
        let second = pinned.new_str("other");
        assert!(pinned.as_string(first).is_some());
        assert!(pinned.as_string(second).is_some());
    }
    heap.collect();
    let r = first.as_object().unwrap();
    assert!(!heap.is_live(r));
}

#[test]
fn nested_pins_release_in_order() {
    let mut heap = stress_heap();
    let a = heap.new_str("a");
    let mut outer = heap.pin(&[a]);
    let b = outer.new_str("b");
    {
        let mut inner = outer.pin(&[b]);
        inner.collect();
        assert!(inner.as_string(b).is_some());
    }
    outer.collect();
    assert!(outer.as_string(a).is_some());
    let b_ref = b.as_object().unwrap();
    assert!(!outer.is_live(b_ref));
}

#[test]
fn cycles_are_collected() {
    let mut heap = heap();
    let list = heap.new_list(Vec::new());
    if let Some(l) = heap.as_list_mut(list) {
        l.elements.push(list);
    }
    heap.collect();
    assert_eq!(heap.live_objects(), 0);
}

#[test]
fn threshold_is_recomputed_after_collection() {
    let config = HeapConfig {
        initial_threshold: 16,
        min_threshold: 64,
        growth_percent: 100,
        stress: false,
    };
    let mut heap = Heap::new(config);
    assert_eq!(heap.next_gc(), 16);
    heap.collect();
    assert_eq!(heap.next_gc(), 64);
    assert_eq!(heap.collections(), 1);
}

#[test]
fn slots_are_reused_with_a_new_generation() {
    let mut heap = heap();
    let old = heap.new_str("old").as_object().unwrap();
    heap.collect();
    let new = heap.new_str("new").as_object().unwrap();
    assert_ne!(old, new);
    assert!(heap.try_get(old).is_none());
}

#[test]
#[should_panic(expected = "use of collected object")]
fn stale_handle_panics() {
    let mut heap = heap();
    let s = heap.new_str("gone");
    heap.collect();
    let _ = heap.type_name(s);
}

// Hashing and Maps

#[test]
fn equal_strings_hash_alike() {
    let mut heap = heap();
    let a = heap.new_str("key");
    let b = heap.new_str("key");
    assert_ne!(a, b);
    assert_eq!(heap.hash_value(a), heap.hash_value(b));
    assert!(heap.values_equal(a, b));
}

#[test]
fn signed_zeros_hash_alike() {
    let heap = heap();
    assert_eq!(
        heap.hash_value(Value::Number(0.0)),
        heap.hash_value(Value::Number(-0.0))
    );
}

#[test]
fn nan_keys_equal_and_hash_alike() {
    let heap = heap();
    let a = Value::Number(f64::NAN);
    let b = Value::Number(f64::from_bits(f64::NAN.to_bits() | 1));
    assert_eq!(heap.hash_value(a), heap.hash_value(b));
    assert!(heap.values_equal(a, b));
    assert!(!heap.values_equal(a, Value::Number(0.0)));
}

#[test]
fn containers_are_not_hashable() {
    let mut heap = heap();
    let list = heap.new_list(Vec::new());
    let map = heap.new_map();
    assert_eq!(heap.hash_value(list), None);
    assert_eq!(heap.hash_value(map), None);
    assert!(heap.hash_value(Value::Null).is_some());
}

#[test]
fn map_set_get_and_remove() {
    let mut heap = heap();
    let map = heap.new_map();
    let m = map.as_object().unwrap();
    let mut pinned = heap.pin(&[map]);
    let key = pinned.new_str("a");
    let lookup = pinned.new_str("a");

    pinned.map_set(m, key, Value::Number(1.0)).unwrap();
    pinned.map_set(m, lookup, Value::Number(2.0)).unwrap();

    let found = pinned.as_map(map).and_then(|mo| pinned.map_get(mo, lookup));
    assert_eq!(found, Some(Value::Number(2.0)));
    assert_eq!(pinned.as_map(map).map(MapObj::len), Some(1));
    let by_bytes = pinned.as_map(map).and_then(|mo| pinned.map_get_bytes(mo, b"a"));
    assert_eq!(by_bytes, Some(Value::Number(2.0)));

    assert_eq!(pinned.map_remove(m, key), Some(Value::Number(2.0)));
    assert_eq!(pinned.as_map(map).map(MapObj::len), Some(0));
}

#[test]
fn map_set_rejects_unhashable_key_without_mutation() {
    let mut heap = heap();
    let map = heap.new_map();
    let m = map.as_object().unwrap();
    let key = heap.new_list(Vec::new());

    let err = heap.map_set(m, key, Value::Null).unwrap_err();
    assert_eq!(err.message, "List type is not hashable.");
    assert_eq!(heap.as_map(map).map(MapObj::len), Some(0));
}

#[test]
fn map_set_on_a_non_map_is_an_error() {
    let mut heap = heap();
    let list = heap.new_list(Vec::new());
    let err = heap
        .map_set(list.as_object().unwrap(), Value::Null, Value::Null)
        .unwrap_err();
    assert_eq!(err.message, "Expected a Map but got List.");
    assert_eq!(heap.as_list(list).map(|l| l.elements.len()), Some(0));
}

// Size Accounting

#[test]
fn map_growth_is_accounted_on_insert() {
    let mut heap = heap();
    let map = heap.new_map();
    let m = map.as_object().unwrap();
    let before = heap.bytes_allocated();
    for i in 0..100 {
        heap.map_set(m, Value::Number(f64::from(i)), Value::Null).unwrap();
    }
    let grown = heap.bytes_allocated();
    assert!(grown >= before + 100 * std::mem::size_of::<crate::value::MapSlot>());

    heap.add_root(m);
    assert_eq!(heap.collect(), 0);
    assert_eq!(heap.bytes_allocated(), grown);
}

#[test]
fn in_place_list_growth_is_accounted_at_collection() {
    let mut heap = heap();
    let list = heap.new_list(Vec::new());
    heap.add_root(list.as_object().unwrap());
    let before = heap.bytes_allocated();

    if let Some(l) = heap.as_list_mut(list) {
        l.elements.extend(std::iter::repeat(Value::Null).take(64));
    }
    assert_eq!(heap.collect(), 0);
    assert!(heap.bytes_allocated() >= before + 64 * std::mem::size_of::<Value>());

    heap.remove_root(list.as_object().unwrap());
    let live = heap.bytes_allocated();
    assert_eq!(heap.collect(), live);
    assert_eq!(heap.bytes_allocated(), 0);
}

// Display

#[test]
fn number_forms() {
    assert_eq!(format_number(3.0), "3");
    assert_eq!(format_number(-0.0), "0");
    assert_eq!(format_number(2.5), "2.5");
    assert_eq!(format_number(f64::NAN), "nan");
    assert_eq!(format_number(f64::INFINITY), "inf");
    assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
}

#[test]
fn primitive_forms() {
    let heap = heap();
    assert_eq!(heap.to_display(Value::Null, false), "null");
    assert_eq!(heap.to_display(Value::Bool(true), false), "true");
    assert_eq!(heap.to_display(Value::Number(42.0), true), "42");
}

#[test]
fn strings_quote_only_in_repr() {
    let mut heap = heap();
    let s = heap.new_str("a\"b\n");
    assert_eq!(heap.to_display(s, false), "a\"b\n");
    assert_eq!(heap.to_display(s, true), "\"a\\\"b\\n\"");
}

#[test]
fn container_forms() {
    let mut heap = heap();
    let s = heap.new_str("x");
    let list = heap.new_list(vec![Value::Number(1.0), s]);
    assert_eq!(heap.to_display(list, false), "[1, \"x\"]");

    let map = heap.new_map();
    let m = map.as_object().unwrap();
    heap.map_set(m, s, Value::Bool(false)).unwrap();
    assert_eq!(heap.to_display(map, false), "{\"x\": false}");

    let range = heap.new_range(1.0, 5.0);
    assert_eq!(heap.to_display(range, false), "[Range:1..5]");

    let user = heap.new_user_object("Socket", 7);
    assert_eq!(heap.to_display(user, false), "[UserObj:Socket]");
}

#[test]
fn self_referencing_list_is_elided() {
    let mut heap = heap();
    let list = heap.new_list(vec![Value::Number(1.0)]);
    if let Some(l) = heap.as_list_mut(list) {
        l.elements.push(list);
    }
    assert_eq!(heap.to_display(list, false), "[1, [...]]");
}
