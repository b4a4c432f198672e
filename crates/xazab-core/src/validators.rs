//! Shape predicates over caller-supplied values. Every predicate is total.

use crate::types::InputValue;

const HASH256_BYTES: usize = 32;

pub fn is_integer(value: &InputValue) -> bool {
    matches!(value, InputValue::Int(_))
}

pub fn is_non_negative_integer(value: &InputValue) -> bool {
    matches!(value, InputValue::Int(n) if *n >= 0)
}

pub fn is_int_or_float(value: &InputValue) -> bool {
    matches!(value, InputValue::Int(_) | InputValue::Float(_))
}

pub fn is_non_negative_int_or_float(value: &InputValue) -> bool {
    match value {
        InputValue::Int(n) => *n >= 0,
        InputValue::Float(f) => *f >= 0.0,
        _ => false,
    }
}

/// True for text made only of hex digit pairs. Raw bytes never qualify.
pub fn is_hex_str(value: &InputValue) -> bool {
    matches!(value, InputValue::Text(text) if is_hex_text(text))
}

pub fn is_hash256_str(value: &InputValue) -> bool {
    matches!(value, InputValue::Text(text) if is_hash256_text(text))
}

/// Non-empty, even length, `0-9a-fA-F` only. No `0x` prefix, no whitespace.
pub fn is_hex_text(text: &str) -> bool {
    !text.is_empty() && hex::decode(text).is_ok()
}

pub fn is_hash256_text(text: &str) -> bool {
    !text.is_empty()
        && hex::decode(text)
            .map(|bytes| bytes.len() == HASH256_BYTES)
            .unwrap_or(false)
}
