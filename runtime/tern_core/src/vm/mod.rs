//! Virtual machine state visible to the semantics layer.
//!
//! The VM owns the heap, the active fiber (whose stack carries native
//! argument windows), the builtin function table and the module registry.
//! Registries are per instance; after core initialization they are only
//! read by convention.

mod registry;

use std::time::Instant;

use rustc_hash::FxHashMap;

use crate::config::VmConfig;
use crate::heap::Heap;
use crate::print_handler::PrintHandler;
use crate::value::{FiberObj, ObjRef, Object, Value};

pub use registry::BuiltinFn;

pub struct Vm {
    pub heap: Heap,
    fiber: ObjRef,
    builtins: Vec<BuiltinFn>,
    builtin_capacity: usize,
    modules: FxHashMap<String, ObjRef>,
    print: Option<PrintHandler>,
    started: Instant,
}

impl Vm {
    /// Create a VM with an empty builtin table and module registry.
    pub fn new(config: VmConfig) -> Self {
        let mut heap = Heap::new(config.heap);
        let fiber = heap.alloc(Object::Fiber(FiberObj::default()));
        heap.add_root(fiber);
        Vm {
            heap,
            fiber,
            builtins: Vec::with_capacity(config.builtin_capacity),
            builtin_capacity: config.builtin_capacity,
            modules: FxHashMap::default(),
            print: config.print,
            started: Instant::now(),
        }
    }

    /// The active fiber.
    #[inline]
    pub fn fiber(&self) -> ObjRef {
        self.fiber
    }

    pub(crate) fn fiber_ref(&self) -> &FiberObj {
        match self.heap.get(self.fiber) {
            Object::Fiber(fiber) => fiber,
            _ => unreachable!("VM fiber handle points at a non-fiber object"),
        }
    }

    pub(crate) fn fiber_mut(&mut self) -> &mut FiberObj {
        match self.heap.get_mut(self.fiber) {
            Object::Fiber(fiber) => fiber,
            _ => unreachable!("VM fiber handle points at a non-fiber object"),
        }
    }

    /// Seconds since the VM was created.
    pub fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    #[inline]
    pub fn has_print_sink(&self) -> bool {
        self.print.is_some()
    }

    /// Send `text` to the print sink, if one is configured.
    pub fn write(&self, text: &str) {
        if let Some(print) = &self.print {
            print.write(text);
        }
    }

    /// Allocate a list of fresh strings.
    ///
    /// The list is pinned while its elements are allocated, and each
    /// element is reachable from the list as soon as it exists.
    pub fn new_string_list(&mut self, items: &[&str]) -> Value {
        let list = self.heap.new_list(Vec::with_capacity(items.len()));
        let mut heap = self.heap.pin(&[list]);
        for item in items {
            let s = heap.new_str(item);
            if let Some(l) = heap.as_list_mut(list) {
                l.elements.push(s);
            }
        }
        list
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
