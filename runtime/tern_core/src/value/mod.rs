//! Runtime values for the Tern interpreter.
//!
//! A [`Value`] is a small `Copy` tagged union. Primitives live inline;
//! everything else is an [`ObjRef`] handle into the [`Heap`](crate::Heap)
//! arena, where the object's lifetime is managed by the collector.
//!
//! Handles carry a generation, so a handle that outlives its object is
//! detected on access instead of aliasing whatever reuses the slot.

mod hash;
mod map;
mod object;

use std::fmt;

pub use hash::{hash_bits, hash_bytes};
pub use map::{MapObj, MapSlot};
pub use object::{
    FiberObj, FunctionBody, FunctionObj, Global, ListObj, Object, RangeObj, ScriptObj, StringObj,
    UserObj,
};

/// Handle to an object owned by the heap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjRef {
    index: u32,
    generation: u32,
}

impl ObjRef {
    #[inline]
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        ObjRef { index, generation }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub(crate) fn generation(self) -> u32 {
        self.generation
    }
}

/// Runtime value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Object(ObjRef),
}

impl Value {
    /// Numeric view of the value; bools coerce to 0 and 1.
    #[inline]
    pub fn as_numeric(self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(n),
            Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Value::Null | Value::Object(_) => None,
        }
    }

    /// Truthiness shared by `assert`, boolean argument extraction and the
    /// interpreter's conditionals: only `null` and `false` are falsy.
    #[inline]
    pub fn is_truthy(self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    #[inline]
    pub fn as_object(self) -> Option<ObjRef> {
        match self {
            Value::Object(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<ObjRef> for Value {
    fn from(r: ObjRef) -> Self {
        Value::Object(r)
    }
}

/// The concrete kind of a value, as seen by scripts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    List,
    Map,
    Range,
    Function,
    Script,
    Fiber,
    UserObj,
}

impl ValueType {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "Null",
            ValueType::Bool => "Bool",
            ValueType::Number => "Number",
            ValueType::String => "String",
            ValueType::List => "List",
            ValueType::Map => "Map",
            ValueType::Range => "Range",
            ValueType::Function => "Function",
            ValueType::Script => "Script",
            ValueType::Fiber => "Fiber",
            ValueType::UserObj => "UserObj",
        }
    }

    /// Whether values of this kind have a stable content hash and may be
    /// used as map keys.
    pub fn is_hashable(self) -> bool {
        matches!(
            self,
            ValueType::Null | ValueType::Bool | ValueType::Number | ValueType::String
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared parameter count of a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Fixed(usize),
    Variadic,
}

impl Arity {
    /// Decode the embedding ABI form, where `-1` (any negative) is variadic.
    pub fn from_raw(raw: i32) -> Self {
        match usize::try_from(raw) {
            Ok(n) => Arity::Fixed(n),
            Err(_) => Arity::Variadic,
        }
    }

    /// Encode to the embedding ABI form.
    pub fn raw(self) -> i32 {
        match self {
            Arity::Fixed(n) => i32::try_from(n).unwrap_or(i32::MAX),
            Arity::Variadic => -1,
        }
    }

    #[inline]
    pub fn accepts(self, argc: usize) -> bool {
        match self {
            Arity::Fixed(n) => n == argc,
            Arity::Variadic => true,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
