//! Error types for the runtime semantics layer.
//!
//! Two channels are kept apart:
//!
//! - [`EvalError`]: recoverable, script-facing errors produced by operators,
//!   access protocols, iteration and native functions. Returned through
//!   [`EvalResult`] and checked by the caller right after each call.
//! - [`RegistrationError`]: host contract violations detected while building
//!   the builtin table and module registry. These are never visible to
//!   scripts.
//!
//! Factory functions (e.g. [`index_out_of_range`]) are the public API for
//! building script errors; they populate both `kind` and `message`.

use std::fmt;

use crate::value::Value;

/// Result of a protocol operation or native call.
pub type EvalResult<T = Value> = Result<T, EvalError>;

/// Coarse error taxonomy surfaced to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    TypeMismatch,
    NotSubscriptable,
    NotIterable,
    AttributeNotFound,
    AttributeImmutable,
    KeyNotExists,
    IndexOutOfRange,
    ArgumentCount,
    AssertionFailed,
    NotImplemented,
}

/// Typed error category with the data needed to render its message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Operands and arguments
    UnsupportedOperands {
        operator: &'static str,
        left: &'static str,
        right: &'static str,
    },
    NotNumeric {
        what: &'static str,
    },
    NotInteger {
        what: &'static str,
    },
    WrongArgumentType {
        expected: &'static str,
        position: usize,
    },
    NotHashable {
        type_name: &'static str,
    },
    NotCallable {
        type_name: &'static str,
    },
    UnexpectedKind {
        expected: &'static str,
        found: &'static str,
    },
    /// A function whose body is compiled code reached the native bridge.
    NotNative {
        name: String,
    },

    // Access
    NotSubscriptable {
        type_name: &'static str,
    },
    NotIterable {
        type_name: &'static str,
    },
    AttributeNotFound {
        type_name: &'static str,
        attribute: String,
    },
    AttributeImmutable {
        attribute: String,
    },
    ImmutableObject {
        type_name: &'static str,
    },
    KeyNotExists {
        key: String,
    },
    InvalidKey {
        key: String,
    },
    IndexOutOfRange {
        container: &'static str,
    },

    // Calls
    ArgumentCount {
        expected: Option<usize>,
        got: usize,
    },
    AssertionFailed {
        message: Option<String>,
    },

    NotImplemented {
        feature: String,
    },
}

impl EvalErrorKind {
    /// The taxonomy bucket this kind belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnsupportedOperands { .. }
            | Self::NotNumeric { .. }
            | Self::NotInteger { .. }
            | Self::WrongArgumentType { .. }
            | Self::NotHashable { .. }
            | Self::NotCallable { .. }
            | Self::UnexpectedKind { .. }
            | Self::NotNative { .. } => ErrorCategory::TypeMismatch,
            Self::NotSubscriptable { .. } => ErrorCategory::NotSubscriptable,
            Self::NotIterable { .. } => ErrorCategory::NotIterable,
            Self::AttributeNotFound { .. } => ErrorCategory::AttributeNotFound,
            Self::AttributeImmutable { .. } | Self::ImmutableObject { .. } => {
                ErrorCategory::AttributeImmutable
            }
            Self::KeyNotExists { .. } | Self::InvalidKey { .. } => ErrorCategory::KeyNotExists,
            Self::IndexOutOfRange { .. } => ErrorCategory::IndexOutOfRange,
            Self::ArgumentCount { .. } => ErrorCategory::ArgumentCount,
            Self::AssertionFailed { .. } => ErrorCategory::AssertionFailed,
            Self::NotImplemented { .. } => ErrorCategory::NotImplemented,
        }
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperands {
                operator,
                left,
                right,
            } => write!(
                f,
                "Unsupported operand types for operator '{operator}' {left} and {right}"
            ),
            Self::NotNumeric { what } => write!(f, "{what} must be a numeric value."),
            Self::NotInteger { what } => write!(f, "{what} must be an integer."),
            Self::WrongArgumentType { expected, position } => {
                write!(f, "Expected a {expected} at argument {position}.")
            }
            Self::NotHashable { type_name } => write!(f, "{type_name} type is not hashable."),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable."),
            Self::UnexpectedKind { expected, found } => {
                write!(f, "Expected a {expected} but got {found}.")
            }
            Self::NotNative { name } => write!(f, "Function '{name}' is not natively callable."),

            Self::NotSubscriptable { type_name } => {
                write!(f, "{type_name} type is not subscriptable.")
            }
            Self::NotIterable { type_name } => write!(f, "{type_name} is not iterable."),
            Self::AttributeNotFound {
                type_name,
                attribute,
            } => write!(f, "'{type_name}' object has no attribute named '{attribute}'."),
            Self::AttributeImmutable { attribute } => {
                write!(f, "'{attribute}' attribute is immutable.")
            }
            Self::ImmutableObject { type_name } => write!(f, "{type_name} objects are immutable."),
            Self::KeyNotExists { key } => write!(f, "Key {key} not exists."),
            Self::InvalidKey { key } => write!(f, "Invalid key {key}."),
            Self::IndexOutOfRange { container } => write!(f, "{container} index out of range."),

            Self::ArgumentCount {
                expected: Some(expected),
                ..
            } => write!(f, "Expected exactly {expected} argument(s)."),
            Self::ArgumentCount { expected: None, .. } => write!(f, "Invalid argument count."),
            Self::AssertionFailed { message: None } => write!(f, "Assertion failed."),
            Self::AssertionFailed {
                message: Some(message),
            } => write!(f, "Assertion failed: '{message}'."),

            Self::NotImplemented { feature } => write!(f, "{feature} is not supported yet."),
        }
    }
}

/// Script-facing runtime error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message, equal to `kind.to_string()`.
    pub message: String,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self { kind, message }
    }

    /// Shorthand for `self.kind.category()`.
    #[inline]
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Operand and Argument Errors

/// Operator applied to a pair of operand kinds it does not support.
#[cold]
pub fn unsupported_operands(operator: &'static str, left: &'static str, right: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperands {
        operator,
        left,
        right,
    })
}

/// A value that had to be a number (or bool) was not.
#[cold]
pub fn not_numeric(what: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotNumeric { what })
}

/// A numeric value had a fractional part where an integer was required.
#[cold]
pub fn not_an_integer(what: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotInteger { what })
}

/// Native argument at `position` (1-based) had the wrong kind.
#[cold]
pub fn wrong_arg_type(expected: &'static str, position: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::WrongArgumentType { expected, position })
}

/// Value cannot be used as a map key.
#[cold]
pub fn not_hashable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotHashable { type_name })
}

/// Value passed to the native bridge is not a function.
#[cold]
pub fn not_callable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable { type_name })
}

/// Host passed an object of the wrong kind to a typed heap operation.
#[cold]
pub fn unexpected_kind(expected: &'static str, found: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnexpectedKind { expected, found })
}

/// Compiled function passed to the native bridge.
#[cold]
pub fn not_native(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotNative {
        name: name.to_string(),
    })
}

// Access Errors

#[cold]
pub fn not_subscriptable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotSubscriptable { type_name })
}

#[cold]
pub fn not_iterable(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotIterable { type_name })
}

#[cold]
pub fn no_attribute(type_name: &'static str, attribute: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AttributeNotFound {
        type_name,
        attribute: attribute.to_string(),
    })
}

#[cold]
pub fn attribute_immutable(attribute: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AttributeImmutable {
        attribute: attribute.to_string(),
    })
}

/// Write through a subscript on an immutable object kind.
#[cold]
pub fn immutable_object(type_name: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ImmutableObject { type_name })
}

/// Hashable key that is absent from a map. `key` is the repr of the key.
#[cold]
pub fn key_not_exists(key: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::KeyNotExists { key: key.into() })
}

/// Map lookup with a key that can never be present (not hashable).
#[cold]
pub fn invalid_key(key: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidKey { key: key.into() })
}

#[cold]
pub fn index_out_of_range(container: &'static str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { container })
}

// Call Errors

/// Fixed-arity function called with the wrong number of arguments.
#[cold]
pub fn wrong_arg_count(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArgumentCount {
        expected: Some(expected),
        got,
    })
}

/// Variadic function called with an argument count it rejects.
#[cold]
pub fn invalid_arg_count(got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArgumentCount {
        expected: None,
        got,
    })
}

#[cold]
pub fn assertion_failed(message: Option<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AssertionFailed { message })
}

/// Operation with a reserved meaning that has no implementation.
#[cold]
pub fn not_implemented(feature: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotImplemented {
        feature: feature.into(),
    })
}

/// Host contract violation while registering builtins or modules.
///
/// These indicate a bug in the embedding application and are reported at
/// construction time; scripts never observe them.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("a module named '{0}' already exists")]
    DuplicateModule(String),
    #[error("a function named '{name}' already exists on module '{module}'")]
    DuplicateFunction { name: String, module: String },
    #[error("a global variable named '{name}' already exists on module '{module}'")]
    DuplicateGlobal { name: String, module: String },
    #[error("a builtin function named '{0}' already exists")]
    DuplicateBuiltin(String),
    #[error("builtin function table is full (capacity {capacity})")]
    BuiltinTableFull { capacity: usize },
    #[error("handle does not refer to a module")]
    NotAModule,
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
