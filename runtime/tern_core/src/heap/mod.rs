//! Object arena with mark/sweep collection.
//!
//! Every object lives in a slot of the arena and is addressed by an
//! [`ObjRef`]. Allocation may run a collection, so any object reachable only
//! from a Rust local must be rooted across an allocating call, either by
//! being on the fiber stack or by a [`Pinned`] guard.
//!
//! Besides allocation and collection, the heap owns the operations that need
//! to look through handles: type names, hashing, content equality, map
//! access and string forms.

mod display;
mod gc;

use smallvec::SmallVec;

use crate::config::HeapConfig;
use crate::errors::{not_hashable, unexpected_kind, EvalResult};
use crate::value::{
    hash_bits, FiberObj, FunctionObj, ListObj, MapObj, ObjRef, Object, RangeObj, ScriptObj,
    StringObj, UserObj, Value, ValueType,
};

pub use display::format_number;
pub use gc::Pinned;

struct Entry {
    object: Object,
    size: usize,
    marked: bool,
}

#[derive(Default)]
struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

pub struct Heap {
    slots: Vec<Slot>,
    free: Vec<u32>,
    bytes_allocated: usize,
    next_gc: usize,
    config: HeapConfig,
    /// Roots that live as long as the VM: builtins, modules, the fiber.
    roots: Vec<ObjRef>,
    /// Scoped roots pushed by [`Pinned`] guards.
    temp_roots: SmallVec<[ObjRef; 8]>,
    collections: usize,
}

impl Heap {
    pub fn new(config: HeapConfig) -> Self {
        Heap {
            slots: Vec::new(),
            free: Vec::new(),
            bytes_allocated: 0,
            next_gc: config.initial_threshold,
            config,
            roots: Vec::new(),
            temp_roots: SmallVec::new(),
            collections: 0,
        }
    }

    /// Move `object` onto the heap. May collect first.
    ///
    /// Objects referenced by `object` itself are kept alive across that
    /// collection; nothing else unrooted is.
    pub fn alloc(&mut self, object: Object) -> ObjRef {
        let size = object.heap_size();
        if self.config.stress || self.bytes_allocated + size > self.next_gc {
            let depth = self.temp_roots.len();
            let mut children = Vec::new();
            object.trace(&mut children);
            self.temp_roots.extend(children);
            self.collect();
            self.temp_roots.truncate(depth);
        }
        self.bytes_allocated += size;
        let entry = Entry {
            object,
            size,
            marked: false,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return ObjRef::new(index, slot.generation);
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("object arena exhausted");
        };
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        ObjRef::new(index, 0)
    }

    // Factory Methods

    pub fn new_string(&mut self, bytes: &[u8]) -> Value {
        Value::Object(self.alloc(Object::String(StringObj::new(bytes))))
    }

    pub fn new_str(&mut self, text: &str) -> Value {
        self.new_string(text.as_bytes())
    }

    pub fn new_list(&mut self, elements: Vec<Value>) -> Value {
        Value::Object(self.alloc(Object::List(ListObj { elements })))
    }

    pub fn new_map(&mut self) -> Value {
        Value::Object(self.alloc(Object::Map(MapObj::new())))
    }

    pub fn new_range(&mut self, from: f64, to: f64) -> Value {
        Value::Object(self.alloc(Object::Range(RangeObj { from, to })))
    }

    pub fn new_user_object(&mut self, type_name: &str, tag: u64) -> Value {
        Value::Object(self.alloc(Object::User(UserObj {
            type_name: type_name.to_string(),
            tag,
        })))
    }

    // Access

    pub fn try_get(&self, r: ObjRef) -> Option<&Object> {
        let slot = self.slots.get(r.index())?;
        if slot.generation != r.generation() {
            return None;
        }
        slot.entry.as_ref().map(|entry| &entry.object)
    }

    /// Object behind `r`.
    ///
    /// A handle to a collected object is a rooting bug in the host or in
    /// this crate; it panics rather than reading a reused slot.
    pub fn get(&self, r: ObjRef) -> &Object {
        match self.try_get(r) {
            Some(object) => object,
            None => panic!("use of collected object {r:?}"),
        }
    }

    pub fn get_mut(&mut self, r: ObjRef) -> &mut Object {
        let live = self
            .slots
            .get_mut(r.index())
            .filter(|slot| slot.generation == r.generation())
            .and_then(|slot| slot.entry.as_mut());
        match live {
            Some(entry) => &mut entry.object,
            None => panic!("use of collected object {r:?}"),
        }
    }

    #[inline]
    pub fn is_live(&self, r: ObjRef) -> bool {
        self.try_get(r).is_some()
    }

    pub fn value_type(&self, value: Value) -> ValueType {
        match value {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Number(_) => ValueType::Number,
            Value::Object(r) => self.get(r).value_type(),
        }
    }

    #[inline]
    pub fn type_name(&self, value: Value) -> &'static str {
        self.value_type(value).name()
    }

    pub fn as_string(&self, value: Value) -> Option<&StringObj> {
        match self.get(value.as_object()?) {
            Object::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self, value: Value) -> Option<&ListObj> {
        match self.get(value.as_object()?) {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self, value: Value) -> Option<&mut ListObj> {
        match self.get_mut(value.as_object()?) {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self, value: Value) -> Option<&MapObj> {
        match self.get(value.as_object()?) {
            Object::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_function(&self, value: Value) -> Option<&FunctionObj> {
        match self.get(value.as_object()?) {
            Object::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_script(&self, value: Value) -> Option<&ScriptObj> {
        match self.get(value.as_object()?) {
            Object::Script(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_script_mut(&mut self, value: Value) -> Option<&mut ScriptObj> {
        match self.get_mut(value.as_object()?) {
            Object::Script(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_fiber(&self, value: Value) -> Option<&FiberObj> {
        match self.get(value.as_object()?) {
            Object::Fiber(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_fiber_mut(&mut self, value: Value) -> Option<&mut FiberObj> {
        match self.get_mut(value.as_object()?) {
            Object::Fiber(f) => Some(f),
            _ => None,
        }
    }

    /// Function declared on `script` under `name`.
    pub fn script_function(&self, script: &ScriptObj, name: &str) -> Option<ObjRef> {
        script.functions.iter().copied().find(|&function| {
            self.as_function(Value::Object(function))
                .is_some_and(|f| f.name == name)
        })
    }

    // Hashing and Equality

    /// Content hash of a hashable value; `None` for unhashable objects.
    pub fn hash_value(&self, value: Value) -> Option<u32> {
        match value {
            Value::Null => Some(hash_bits(1)),
            Value::Bool(b) => Some(hash_bits(if b { 3 } else { 2 })),
            Value::Number(n) => Some(hash_bits(canonical_bits(n))),
            Value::Object(_) => self.as_string(value).map(StringObj::hash),
        }
    }

    /// Key equality: primitives by value, strings by content, other objects
    /// by identity. NaN equals itself so it can be found again as a key.
    #[expect(clippy::float_cmp, reason = "key equality is exact")]
    pub fn values_equal(&self, a: Value, b: Value) -> bool {
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
            (Value::Object(x), Value::Object(y)) if x != y => {
                match (self.as_string(a), self.as_string(b)) {
                    (Some(s), Some(t)) => s.hash() == t.hash() && s.as_bytes() == t.as_bytes(),
                    _ => false,
                }
            }
            _ => a == b,
        }
    }

    // Map Access

    /// Value stored under `key`. Unhashable keys are never present.
    pub fn map_get(&self, map: &MapObj, key: Value) -> Option<Value> {
        let hash = self.hash_value(key)?;
        map.find(hash, |candidate| self.values_equal(candidate, key))
            .and_then(|slot| map.value_at(slot))
    }

    /// Value stored under a string key given as raw bytes.
    pub fn map_get_bytes(&self, map: &MapObj, key: &[u8]) -> Option<Value> {
        let hash = crate::value::hash_bytes(key);
        map.find(hash, |candidate| {
            self.as_string(candidate)
                .is_some_and(|s| s.as_bytes() == key)
        })
        .and_then(|slot| map.value_at(slot))
    }

    /// Insert or replace `key` in the map behind `map`.
    ///
    /// The key's hashability and the receiver's kind are checked before
    /// anything is written.
    pub fn map_set(&mut self, map: ObjRef, key: Value, value: Value) -> EvalResult<()> {
        let existing = match self.get(map) {
            Object::Map(m) => {
                let Some(hash) = self.hash_value(key) else {
                    return Err(not_hashable(self.type_name(key)));
                };
                (hash, m.find(hash, |candidate| self.values_equal(candidate, key)))
            }
            other => return Err(unexpected_kind("Map", other.value_type().name())),
        };
        if let Object::Map(m) = self.get_mut(map) {
            match existing {
                (_, Some(slot)) => m.set_value_at(slot, value),
                (hash, None) => m.insert_new(key, hash, value),
            }
        }
        self.refresh_size(map);
        Ok(())
    }

    /// Remove `key` from the map behind `map`, returning its value.
    pub fn map_remove(&mut self, map: ObjRef, key: Value) -> Option<Value> {
        let hash = self.hash_value(key)?;
        let slot = match self.get(map) {
            Object::Map(m) => m.find(hash, |candidate| self.values_equal(candidate, key))?,
            _ => return None,
        };
        match self.get_mut(map) {
            Object::Map(m) => m.remove_at(slot),
            _ => None,
        }
    }

    // Statistics

    /// Re-measure `r` after it grew or shrank in place.
    ///
    /// Containers mutated through `as_*_mut` are re-measured at the next
    /// collection; paths that know they grew an object call this directly.
    pub fn refresh_size(&mut self, r: ObjRef) {
        let Some(entry) = self
            .slots
            .get_mut(r.index())
            .filter(|slot| slot.generation == r.generation())
            .and_then(|slot| slot.entry.as_mut())
        else {
            return;
        };
        let size = entry.object.heap_size();
        self.bytes_allocated = self.bytes_allocated - entry.size + size;
        entry.size = size;
    }

    #[inline]
    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    #[inline]
    pub fn next_gc(&self) -> usize {
        self.next_gc
    }

    /// Number of collections run so far.
    #[inline]
    pub fn collections(&self) -> usize {
        self.collections
    }

    pub fn live_objects(&self) -> usize {
        self.slots.iter().filter(|slot| slot.entry.is_some()).count()
    }
}

/// Bit pattern a number hashes by. Values that compare equal as keys share
/// one pattern: both zeros, and every NaN.
fn canonical_bits(n: f64) -> u64 {
    if n == 0.0 {
        0
    } else if n.is_nan() {
        f64::NAN.to_bits()
    } else {
        n.to_bits()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
