//! VM configuration supplied by the embedding host.

use crate::print_handler::PrintHandler;

/// Collector tuning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeapConfig {
    /// Allocated bytes that trigger the first collection.
    pub initial_threshold: usize,
    /// Lower bound for the threshold recomputed after each collection.
    pub min_threshold: usize,
    /// After a collection the next threshold is the live size grown by
    /// this percentage.
    pub growth_percent: usize,
    /// Collect before every allocation. Surfaces missing roots in tests.
    pub stress: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            initial_threshold: 1 << 20,
            min_threshold: 1 << 20,
            growth_percent: 75,
            stress: false,
        }
    }
}

impl HeapConfig {
    /// Default tuning with stress collection enabled.
    pub fn stress() -> Self {
        HeapConfig {
            stress: true,
            ..Self::default()
        }
    }
}

/// Configuration for a new [`Vm`](crate::Vm).
#[derive(Clone, Debug)]
pub struct VmConfig {
    /// Output sink for `print` and `lang.write`. `None` discards output.
    pub print: Option<PrintHandler>,
    pub heap: HeapConfig,
    /// Maximum number of global builtin functions.
    pub builtin_capacity: usize,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            print: None,
            heap: HeapConfig::default(),
            builtin_capacity: 64,
        }
    }
}

impl VmConfig {
    #[must_use]
    pub fn with_print(mut self, handler: PrintHandler) -> Self {
        self.print = Some(handler);
        self
    }

    #[must_use]
    pub fn with_heap(mut self, heap: HeapConfig) -> Self {
        self.heap = heap;
        self
    }

    #[must_use]
    pub fn with_builtin_capacity(mut self, capacity: usize) -> Self {
        self.builtin_capacity = capacity;
        self
    }
}
