//! External iteration protocol.
//!
//! Iteration state is a plain [`Value`] owned by the caller: `null` before
//! the first step, then a non-negative integer counting completed steps
//! (for maps, one past the slot of the last yielded key). Nothing is stored
//! on the container, so independent iterations never interfere.
//!
//! [`ValueIter`] wraps the protocol as a Rust [`Iterator`].

use tern_core::{not_iterable, EvalResult, Heap, Object, Pinned, Value};

use crate::validate::validate_integer;

/// Outcome of one iteration step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IterStep {
    Next { state: Value, value: Value },
    Done,
}

/// Advance the iteration of `seq` from `state`.
///
/// - String: each byte as a one-byte string
/// - List: elements in order
/// - Map: keys in ascending slot order
/// - Range: `from`, stepping by one toward `to`, never reaching it
pub fn iterate(heap: &mut Heap, seq: Value, state: Value) -> EvalResult<IterStep> {
    let r = match seq {
        Value::Null => return Err(not_iterable("Null")),
        Value::Bool(_) => return Err(not_iterable("Boolean")),
        Value::Number(_) => return Err(not_iterable("Number")),
        Value::Object(r) => r,
    };
    let step = match state {
        Value::Null => 0,
        state => usize::try_from(validate_integer(state, "Iterator state")?).unwrap_or(0),
    };

    let next = |value: Value, consumed: usize| -> EvalResult<IterStep> {
        Ok(IterStep::Next {
            state: Value::Number(as_f64(consumed)),
            value,
        })
    };

    match heap.get(r) {
        Object::String(s) => match s.as_bytes().get(step) {
            Some(&byte) => next(heap.new_string(&[byte]), step + 1),
            None => Ok(IterStep::Done),
        },
        Object::List(list) => match list.elements.get(step) {
            Some(&element) => next(element, step + 1),
            None => Ok(IterStep::Done),
        },
        Object::Map(map) => match map.next_occupied(step) {
            Some((slot, key)) => next(key, slot + 1),
            None => Ok(IterStep::Done),
        },
        Object::Range(range) => {
            let offset = as_f64(step);
            let (current, finished) = if range.from <= range.to {
                let current = range.from + offset;
                (current, current >= range.to)
            } else {
                let current = range.from - offset;
                (current, current <= range.to)
            };
            if finished || current.is_nan() {
                Ok(IterStep::Done)
            } else {
                next(Value::Number(current), step + 1)
            }
        }
        object => Err(not_iterable(object.value_type().name())),
    }
}

#[allow(clippy::cast_precision_loss, reason = "step counts are far below 2^53")]
fn as_f64(steps: usize) -> f64 {
    steps as f64
}

/// Lazy, restartable iteration over a container.
///
/// The container stays pinned for the lifetime of the iterator. Values
/// yielded for strings are fresh objects that are not pinned; read them
/// through [`heap`](Self::heap) before advancing again, or root them.
pub struct ValueIter<'heap> {
    heap: Pinned<'heap>,
    seq: Value,
    state: Value,
    done: bool,
}

impl<'heap> ValueIter<'heap> {
    pub fn new(heap: &'heap mut Heap, seq: Value) -> Self {
        ValueIter {
            heap: heap.pin(&[seq]),
            seq,
            state: Value::Null,
            done: false,
        }
    }

    /// Start over from the first element.
    pub fn restart(&mut self) {
        self.state = Value::Null;
        self.done = false;
    }

    /// Current protocol state.
    pub fn state(&self) -> Value {
        self.state
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        &mut self.heap
    }
}

impl Iterator for ValueIter<'_> {
    type Item = EvalResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match iterate(&mut self.heap, self.seq, self.state) {
            Ok(IterStep::Next { state, value }) => {
                self.state = state;
                Some(Ok(value))
            }
            Ok(IterStep::Done) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
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
