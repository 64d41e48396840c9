//! Print handler for configurable output.
//!
//! `print` and `lang.write` send their text here:
//! - Stdout: the process's standard output
//! - Buffer: captured for tests and embedders that display output themselves
//!
//! A VM configured without a handler discards output.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Print handler that captures output to a buffer.
#[derive(Debug, Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }

    /// Get all captured output.
    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Print handler implementation using enum dispatch.
#[derive(Clone, Debug)]
pub enum PrintHandler {
    /// Writes to stdout.
    Stdout,
    /// Captures to a shared buffer.
    Buffer(Arc<BufferPrintHandler>),
}

impl PrintHandler {
    /// New buffer handler plus the shared buffer to read it back from.
    pub fn buffer() -> (Self, Arc<BufferPrintHandler>) {
        let buffer = Arc::new(BufferPrintHandler::new());
        (PrintHandler::Buffer(Arc::clone(&buffer)), buffer)
    }

    /// Write text verbatim; callers add separators and newlines.
    pub fn write(&self, text: &str) {
        match self {
            PrintHandler::Stdout => {
                let mut out = std::io::stdout().lock();
                // Output errors are not script errors.
                let _ = out.write_all(text.as_bytes());
                let _ = out.flush();
            }
            PrintHandler::Buffer(buffer) => buffer.write(text),
        }
    }
}
