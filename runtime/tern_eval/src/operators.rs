//! Binary operator implementations.
//!
//! Direct enum-based dispatch: the operand kinds are a closed set, so
//! pattern matching is used instead of per-type traits. Every operator
//! validates its operands and returns a TypeMismatch-class error instead of
//! producing a value for unsupported combinations.

use std::fmt;

use tern_core::{not_implemented, unsupported_operands, EvalError, EvalResult, Heap, Object, Value};

use crate::validate::validate_numeric;

/// Binary operators handled by this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Gt => ">",
            BinaryOp::Lt => "<",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

// Direct Dispatch Function

/// Evaluate a binary operation.
///
/// `heap` is needed for type names in diagnostics and for allocating the
/// result of string concatenation.
pub fn evaluate_binary(heap: &mut Heap, left: Value, right: Value, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => add(heap, left, right),
        BinaryOp::Sub => subtract(heap, left, right),
        BinaryOp::Mul => multiply(heap, left, right),
        BinaryOp::Div => divide(heap, left, right),
        BinaryOp::Mod => modulo(heap, left, right),
        BinaryOp::Gt => greater(heap, left, right).map(Value::Bool),
        BinaryOp::Lt => less(heap, left, right).map(Value::Bool),
    }
}

/// Arithmetic shared by every numeric operator. `None` when the left operand
/// is not numeric; a numeric left operand requires a numeric right one.
#[inline]
fn numeric_arith(left: Value, right: Value, apply: fn(f64, f64) -> f64) -> Option<EvalResult> {
    let a = left.as_numeric()?;
    Some(validate_numeric(right, "Right operand").map(|b| Value::Number(apply(a, b))))
}

#[cold]
fn unsupported(heap: &Heap, left: Value, right: Value, op: BinaryOp) -> EvalError {
    unsupported_operands(op.as_symbol(), heap.type_name(left), heap.type_name(right))
}

pub fn add(heap: &mut Heap, left: Value, right: Value) -> EvalResult {
    if let Some(result) = numeric_arith(left, right, |a, b| a + b) {
        return result;
    }

    if let (Value::Object(a), Value::Object(b)) = (left, right) {
        let joined = match (heap.get(a), heap.get(b)) {
            (Object::String(s), Object::String(t)) => [s.as_bytes(), t.as_bytes()].concat(),
            (Object::List(_), Object::List(_)) => {
                return Err(not_implemented("List concatenation"));
            }
            _ => return Err(unsupported(heap, left, right, BinaryOp::Add)),
        };
        // The operands are not read again, so a collection here is harmless.
        return Ok(heap.new_string(&joined));
    }

    Err(unsupported(heap, left, right, BinaryOp::Add))
}

pub fn subtract(heap: &Heap, left: Value, right: Value) -> EvalResult {
    numeric_arith(left, right, |a, b| a - b)
        .unwrap_or_else(|| Err(unsupported(heap, left, right, BinaryOp::Sub)))
}

pub fn multiply(heap: &Heap, left: Value, right: Value) -> EvalResult {
    numeric_arith(left, right, |a, b| a * b)
        .unwrap_or_else(|| Err(unsupported(heap, left, right, BinaryOp::Mul)))
}

/// IEEE-754 division: `x / 0` is an infinity and `0 / 0` is NaN.
pub fn divide(heap: &Heap, left: Value, right: Value) -> EvalResult {
    numeric_arith(left, right, |a, b| a / b)
        .unwrap_or_else(|| Err(unsupported(heap, left, right, BinaryOp::Div)))
}

/// Floating remainder; the sign follows the dividend.
pub fn modulo(heap: &Heap, left: Value, right: Value) -> EvalResult {
    if let Some(result) = numeric_arith(left, right, |a, b| a % b) {
        return result;
    }
    if heap.as_string(left).is_some() {
        return Err(not_implemented("String formatting with '%'"));
    }
    Err(unsupported(heap, left, right, BinaryOp::Mod))
}

pub fn greater(heap: &Heap, left: Value, right: Value) -> EvalResult<bool> {
    match (left.as_numeric(), right.as_numeric()) {
        (Some(a), Some(b)) => Ok(a > b),
        _ => Err(unsupported(heap, left, right, BinaryOp::Gt)),
    }
}

pub fn less(heap: &Heap, left: Value, right: Value) -> EvalResult<bool> {
    match (left.as_numeric(), right.as_numeric()) {
        (Some(a), Some(b)) => Ok(a < b),
        _ => Err(unsupported(heap, left, right, BinaryOp::Lt)),
    }
}

/// Hash of `value` as a script number, or `null` if it is not hashable.
pub fn hash(heap: &Heap, value: Value) -> Value {
    heap.hash_value(value)
        .map_or(Value::Null, |h| Value::Number(f64::from(h)))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
