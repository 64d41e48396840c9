//! Open-addressing hash table backing the Map object.
//!
//! The table only stores precomputed hashes and raw values; key equality
//! for object keys needs the heap, so lookups take an equality callback
//! and mutation is split into "find" and "write at slot" steps. The heap
//! layer wires the two together.
//!
//! Removed entries leave tombstones so probe chains stay intact; lookups
//! and iteration skip them, and growth rehashes them away.

use super::Value;

const MIN_CAPACITY: usize = 8;
const MAX_LOAD_PERCENT: usize = 75;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MapSlot {
    #[default]
    Empty,
    Tombstone,
    Occupied {
        key: Value,
        value: Value,
        hash: u32,
    },
}

#[derive(Debug, Default)]
pub struct MapObj {
    slots: Vec<MapSlot>,
    count: usize,
    tombstones: usize,
}

impl MapObj {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of slots, occupied or not.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&MapSlot> {
        self.slots.get(index)
    }

    /// First occupied slot at or after `from`, with its key.
    pub fn next_occupied(&self, from: usize) -> Option<(usize, Value)> {
        self.slots
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(index, slot)| match slot {
                MapSlot::Occupied { key, .. } => Some((index, *key)),
                MapSlot::Empty | MapSlot::Tombstone => None,
            })
    }

    /// Live `(key, value)` pairs in slot order.
    pub fn entries(&self) -> impl Iterator<Item = (Value, Value)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            MapSlot::Occupied { key, value, .. } => Some((*key, *value)),
            MapSlot::Empty | MapSlot::Tombstone => None,
        })
    }

    /// Slot index holding a key with `hash` for which `eq` returns true.
    pub fn find(&self, hash: u32, mut eq: impl FnMut(Value) -> bool) -> Option<usize> {
        let capacity = self.slots.len();
        if capacity == 0 {
            return None;
        }
        let mask = capacity - 1;
        let mut index = hash as usize & mask;
        for _ in 0..capacity {
            match self.slots[index] {
                MapSlot::Empty => return None,
                MapSlot::Occupied { key, hash: h, .. } if h == hash && eq(key) => {
                    return Some(index)
                }
                MapSlot::Occupied { .. } | MapSlot::Tombstone => {}
            }
            index = (index + 1) & mask;
        }
        None
    }

    pub fn value_at(&self, index: usize) -> Option<Value> {
        match self.slots.get(index) {
            Some(MapSlot::Occupied { value, .. }) => Some(*value),
            _ => None,
        }
    }

    /// Overwrite the value of an occupied slot returned by [`find`](Self::find).
    pub fn set_value_at(&mut self, index: usize, new_value: Value) {
        if let Some(MapSlot::Occupied { value, .. }) = self.slots.get_mut(index) {
            *value = new_value;
        }
    }

    /// Insert a key known to be absent.
    pub fn insert_new(&mut self, key: Value, hash: u32, value: Value) {
        self.reserve_one();
        let mask = self.slots.len() - 1;
        let mut index = hash as usize & mask;
        loop {
            match self.slots[index] {
                MapSlot::Empty => break,
                MapSlot::Tombstone => {
                    self.tombstones -= 1;
                    break;
                }
                MapSlot::Occupied { .. } => index = (index + 1) & mask,
            }
        }
        self.slots[index] = MapSlot::Occupied { key, value, hash };
        self.count += 1;
    }

    /// Remove the entry at an occupied slot, leaving a tombstone.
    pub fn remove_at(&mut self, index: usize) -> Option<Value> {
        let removed = self.value_at(index)?;
        self.slots[index] = MapSlot::Tombstone;
        self.count -= 1;
        self.tombstones += 1;
        Some(removed)
    }

    fn reserve_one(&mut self) {
        let used = self.count + self.tombstones + 1;
        if used * 100 <= self.slots.len() * MAX_LOAD_PERCENT {
            return;
        }
        let wanted = (self.count + 1) * 100 / MAX_LOAD_PERCENT + 1;
        let capacity = wanted.next_power_of_two().max(MIN_CAPACITY);
        self.rehash(capacity);
    }

    fn rehash(&mut self, capacity: usize) {
        let old = std::mem::replace(&mut self.slots, vec![MapSlot::Empty; capacity]);
        self.tombstones = 0;
        let mask = capacity - 1;
        for slot in old {
            if let MapSlot::Occupied { hash, .. } = slot {
                let mut index = hash as usize & mask;
                while !matches!(self.slots[index], MapSlot::Empty) {
                    index = (index + 1) & mask;
                }
                self.slots[index] = slot;
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
