//! Shared operand validation for operators and access protocols.

use tern_core::{index_out_of_range, not_an_integer, not_numeric, EvalResult, Value};

/// Numeric view of `value` (bools coerce), or a TypeMismatch naming `what`.
#[inline]
pub fn validate_numeric(value: Value, what: &'static str) -> EvalResult<f64> {
    value.as_numeric().ok_or_else(|| not_numeric(what))
}

/// Integer view of `value`: a number or bool whose truncation is exact.
pub fn validate_integer(value: Value, what: &'static str) -> EvalResult<i64> {
    match value.as_numeric() {
        Some(n) if n.is_finite() && n.trunc() == n => Ok(integral_to_i64(n)),
        _ => Err(not_an_integer(what)),
    }
}

/// Checked conversion of `index` into a position within `len` elements.
pub fn validate_index(index: i64, len: usize, container: &'static str) -> EvalResult<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| index_out_of_range(container))
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "callers pass finite integral values; huge magnitudes saturate and fail the bounds check"
)]
fn integral_to_i64(n: f64) -> i64 {
    n as i64
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
