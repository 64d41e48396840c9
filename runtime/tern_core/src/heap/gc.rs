//! Rooting and mark/sweep collection.
//!
//! # Roots
//!
//! - Permanent roots: registered once, live until removed (builtin
//!   functions, modules, the fiber).
//! - Pinned values: pushed by [`Heap::pin`] and released when the returned
//!   [`Pinned`] guard drops, even during unwinding.
//!
//! Everything else is garbage at the next collection.

use std::ops::{Deref, DerefMut};

use super::Heap;
use crate::value::{ObjRef, Value};

/// RAII guard keeping a set of values alive across allocations.
///
/// The guard holds `&mut Heap` and implements `Deref`/`DerefMut`, so the
/// heap is used through it while the pins are in place. Dropping the guard
/// releases exactly the pins it pushed; guards nest.
pub struct Pinned<'heap> {
    heap: &'heap mut Heap,
    depth: usize,
}

impl Drop for Pinned<'_> {
    fn drop(&mut self) {
        self.heap.temp_roots.truncate(self.depth);
    }
}

impl Deref for Pinned<'_> {
    type Target = Heap;

    fn deref(&self) -> &Self::Target {
        self.heap
    }
}

impl DerefMut for Pinned<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.heap
    }
}

impl Heap {
    /// Pin the object values among `values` until the guard drops.
    ///
    /// ```text
    /// let mut heap = heap.pin(&[list]);
    /// let item = heap.new_str("x"); // may collect; `list` survives
    /// ```
    pub fn pin(&mut self, values: &[Value]) -> Pinned<'_> {
        let depth = self.temp_roots.len();
        self.temp_roots
            .extend(values.iter().filter_map(|value| value.as_object()));
        Pinned { heap: self, depth }
    }

    /// Keep `r` alive until [`remove_root`](Self::remove_root).
    pub fn add_root(&mut self, r: ObjRef) {
        self.roots.push(r);
    }

    /// Drop one registration of `r` as a permanent root.
    pub fn remove_root(&mut self, r: ObjRef) {
        if let Some(position) = self.roots.iter().rposition(|&root| root == r) {
            self.roots.swap_remove(position);
        }
    }

    /// Run a full collection. Returns the number of bytes freed.
    pub fn collect(&mut self) -> usize {
        self.mark();
        let (freed_objects, freed) = self.sweep();

        let live = self.bytes_allocated;
        let grown = live.saturating_mul(100 + self.config.growth_percent) / 100;
        self.next_gc = grown.max(self.config.min_threshold);
        self.collections += 1;

        tracing::debug!(
            freed_bytes = freed,
            freed_objects,
            live_bytes = live,
            next_gc = self.next_gc,
            "garbage collection"
        );
        freed
    }

    fn mark(&mut self) {
        let mut gray: Vec<ObjRef> = self
            .roots
            .iter()
            .chain(self.temp_roots.iter())
            .copied()
            .collect();

        while let Some(r) = gray.pop() {
            let Some(slot) = self.slots.get_mut(r.index()) else {
                continue;
            };
            if slot.generation != r.generation() {
                continue;
            }
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            if entry.marked {
                continue;
            }
            entry.marked = true;
            entry.object.trace(&mut gray);
        }
    }

    /// Free unmarked objects and re-measure the survivors, whose containers
    /// may have grown since they were allocated. Returns the number of
    /// objects and bytes freed.
    fn sweep(&mut self) -> (usize, usize) {
        let mut freed = 0;
        let mut freed_bytes = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(entry) = slot.entry.as_mut() else {
                continue;
            };
            if entry.marked {
                entry.marked = false;
                let size = entry.object.heap_size();
                self.bytes_allocated = self.bytes_allocated - entry.size + size;
                entry.size = size;
                continue;
            }
            self.bytes_allocated -= entry.size;
            freed_bytes += entry.size;
            slot.entry = None;
            slot.generation = slot.generation.wrapping_add(1);
            // Slot indices always fit: `alloc` refuses to grow past u32.
            if let Ok(index) = u32::try_from(index) {
                self.free.push(index);
            }
            freed += 1;
        }
        (freed, freed_bytes)
    }
}
