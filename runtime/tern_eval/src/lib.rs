//! Semantics layer of the Tern runtime.
//!
//! Builds on the value model in `tern_core`:
//!
//! - [`operators`]: arithmetic and comparison dispatch
//! - [`attributes`] and [`subscript`]: access protocols
//! - [`iteration`]: the external iteration protocol and [`ValueIter`]
//! - [`builtins`]: global builtin functions and the `lang` module
//!
//! Every operation validates its operands and returns an
//! [`EvalError`](tern_core::EvalError) instead of producing a value for
//! unsupported input.

pub mod attributes;
pub mod builtins;
mod init;
pub mod iteration;
pub mod operators;
pub mod subscript;
mod validate;

pub use attributes::{get_attribute, set_attribute};
pub use init::{create_vm, initialize_core};
pub use iteration::{iterate, IterStep, ValueIter};
pub use operators::{evaluate_binary, BinaryOp};
pub use subscript::{get_subscript, set_subscript};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=tern_core=debug` or `RUST_LOG=tern_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
