//! String builtins. Each returns a new string; the argument is never
//! modified.

use tern_core::{EvalResult, NativeCall, ValueType};

/// Bytes of argument 1, which must be a string.
fn string_bytes(call: &NativeCall<'_>) -> EvalResult<Vec<u8>> {
    let value = call.get_value_of_kind(1, ValueType::String)?;
    Ok(call
        .heap()
        .as_string(value)
        .map(|s| s.as_bytes().to_vec())
        .unwrap_or_default())
}

/// Same set as C `isspace`: space, `\t`, `\n`, `\v`, `\f` and `\r`.
fn is_space(byte: u8) -> bool {
    byte == 0x0b || byte.is_ascii_whitespace()
}

/// `str_lower(s)`: ASCII lowercase copy of `s`.
pub fn str_lower(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let mut bytes = string_bytes(call)?;
    bytes.make_ascii_lowercase();
    let result = call.heap_mut().new_string(&bytes);
    call.return_value(result);
    Ok(())
}

/// `str_upper(s)`: ASCII uppercase copy of `s`.
pub fn str_upper(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let mut bytes = string_bytes(call)?;
    bytes.make_ascii_uppercase();
    let result = call.heap_mut().new_string(&bytes);
    call.return_value(result);
    Ok(())
}

/// `str_strip(s)`: `s` without leading and trailing ASCII whitespace.
pub fn str_strip(call: &mut NativeCall<'_>) -> EvalResult<()> {
    let bytes = string_bytes(call)?;
    let start = bytes.iter().position(|&b| !is_space(b)).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    let result = call.heap_mut().new_string(&bytes[start..end]);
    call.return_value(result);
    Ok(())
}
