use std::fmt::{self, Display};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::render_plain;

pub const SATOSHIS_PER_COIN: i64 = 100_000_000;
pub const COIN_DECIMAL_POINT: u32 = 8;

/// Signed count of minor units. The sign carries the debit/credit direction
/// when amounts are shown as balance deltas.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Satoshis(i64);

impl Satoshis {
    pub const ZERO: Satoshis = Satoshis(0);

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for Satoshis {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Satoshis> for i64 {
    fn from(value: Satoshis) -> Self {
        value.0
    }
}

impl Display for Satoshis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_plain(self.0, COIN_DECIMAL_POINT))
    }
}

/// A loosely typed value as it arrives from a caller, tagged once so the
/// shape predicates and formatters can match on it.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Bytes(Vec<u8>),
}

impl InputValue {
    /// Short name of the tag, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            InputValue::Null => "null",
            InputValue::Int(_) => "integer",
            InputValue::Float(_) => "float",
            InputValue::Decimal(_) => "decimal",
            InputValue::Text(_) => "text",
            InputValue::Bytes(_) => "bytes",
        }
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for InputValue {
                fn from(value: $ty) -> Self {
                    InputValue::Int(i128::from(value))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<isize> for InputValue {
    fn from(value: isize) -> Self {
        // isize is at most 64 bits on every supported target.
        InputValue::Int(value as i128)
    }
}

impl From<usize> for InputValue {
    fn from(value: usize) -> Self {
        InputValue::Int(value as i128)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        InputValue::Float(value)
    }
}

impl From<f32> for InputValue {
    fn from(value: f32) -> Self {
        InputValue::Float(f64::from(value))
    }
}

impl From<Decimal> for InputValue {
    fn from(value: Decimal) -> Self {
        InputValue::Decimal(value)
    }
}

impl From<Satoshis> for InputValue {
    fn from(value: Satoshis) -> Self {
        InputValue::Int(i128::from(value.0))
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

impl From<&[u8]> for InputValue {
    fn from(value: &[u8]) -> Self {
        InputValue::Bytes(value.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for InputValue {
    fn from(value: &[u8; N]) -> Self {
        InputValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for InputValue {
    fn from(value: Vec<u8>) -> Self {
        InputValue::Bytes(value)
    }
}

impl<T: Into<InputValue>> From<Option<T>> for InputValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(InputValue::Null, Into::into)
    }
}
