//! Conversion between integer minor units and display strings.
//!
//! All arithmetic is exact: minor units are split with integer division and
//! fee rates are rounded as `rust_decimal::Decimal`, never through binary
//! floating point.

use std::str::FromStr;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{AmountError, CoreError, Result};
use crate::types::{InputValue, Satoshis, COIN_DECIMAL_POINT};

/// Column width of a whitespace-padded amount, sign and separator included.
pub const PADDED_AMOUNT_WIDTH: usize = 15;

/// Largest decimal point whose scale factor fits in 64-bit minor units.
pub const MAX_DECIMAL_POINT: u32 = 18;

/// Largest rounding precision a fee rate may request.
pub const MAX_FEE_PRECISION: u32 = 28;

pub const DEFAULT_FEE_PRECISION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFormat {
    pub decimal_point: u32,
    pub whitespaces: bool,
    pub show_diff_sign: bool,
}

impl Default for AmountFormat {
    fn default() -> Self {
        Self {
            decimal_point: COIN_DECIMAL_POINT,
            whitespaces: false,
            show_diff_sign: false,
        }
    }
}

impl AmountFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decimal_point(mut self, decimal_point: u32) -> Self {
        self.decimal_point = decimal_point;
        self
    }

    /// Pad both sides with spaces so a column of amounts lines up on the
    /// decimal separator.
    pub fn whitespaces(mut self, whitespaces: bool) -> Self {
        self.whitespaces = whitespaces;
        self
    }

    /// Prefix non-negative amounts with `+`, for balance deltas.
    pub fn show_diff_sign(mut self, show_diff_sign: bool) -> Self {
        self.show_diff_sign = show_diff_sign;
        self
    }
}

/// Renders minor units as a major-unit string according to `format`.
///
/// Only integral values are accepted: an `Int`, or a `Decimal` with no
/// fractional part. Anything else is a contract violation.
pub fn format_amount(value: impl Into<InputValue>, format: &AmountFormat) -> Result<String> {
    let minor = integral_minor_units(&value.into())?;
    check_decimal_point(format.decimal_point)?;

    let (integer, fraction) = split_magnitude(minor.unsigned_abs(), format.decimal_point);
    let sign = if minor < 0 {
        "-"
    } else if format.show_diff_sign {
        "+"
    } else {
        ""
    };

    let mut rendered = format!("{sign}{integer}");
    if !fraction.is_empty() {
        rendered.push('.');
        rendered.push_str(&fraction);
    }

    if format.whitespaces {
        let decimal_point = format.decimal_point as usize;
        let trailing = match (decimal_point, fraction.len()) {
            (0, _) => 0,
            // the separator column stays blank as well
            (places, 0) => places + 1,
            (places, used) => places - used,
        };
        rendered.extend(std::iter::repeat(' ').take(trailing));
        rendered = format!("{rendered:>width$}", width = PADDED_AMOUNT_WIDTH);
    }

    Ok(rendered)
}

/// Minimal canonical rendering: no padding, no `+` sign.
pub fn format_amount_plain(value: impl Into<InputValue>, decimal_point: u32) -> Result<String> {
    let minor = integral_minor_units(&value.into())?;
    check_decimal_point(decimal_point)?;
    Ok(render_plain(minor, decimal_point))
}

/// Rounds a fee rate half away from zero to `precision` fractional digits
/// and drops trailing zeros.
pub fn format_fee_rate(value: impl Into<InputValue>, precision: u32) -> Result<String> {
    if precision > MAX_FEE_PRECISION {
        return Err(CoreError::contract(format!(
            "fee precision {precision} exceeds {MAX_FEE_PRECISION}"
        )));
    }

    let decimal = match value.into() {
        // past the 96-bit Decimal range there is no fraction left to round
        InputValue::Int(n) => match Decimal::try_from_i128_with_scale(n, 0) {
            Ok(decimal) => decimal,
            Err(_) => return Ok(n.to_string()),
        },
        InputValue::Float(f) => match decimal_from_float(f)? {
            Some(decimal) => decimal,
            None => return Ok(format!("{f}")),
        },
        InputValue::Decimal(d) => d,
        other => {
            return Err(CoreError::contract(format!(
                "fee rate must be numeric, got {}",
                other.kind()
            )))
        }
    };

    let rounded = decimal
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    if rounded.is_zero() {
        return Ok(Decimal::ZERO.to_string());
    }
    Ok(rounded.to_string())
}

/// Parses a major-unit decimal string into minor units, rounding half away
/// from zero below the smallest unit.
pub fn parse_amount(
    text: &str,
    decimal_point: u32,
) -> std::result::Result<Satoshis, AmountError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if !trimmed
        .bytes()
        .all(|byte| byte.is_ascii_digit() || matches!(byte, b'.' | b'-' | b'+'))
    {
        return Err(AmountError::InvalidNumeric);
    }

    let decimal = Decimal::from_str(trimmed).map_err(|_| {
        // a well-formed literal only fails to parse when it has too many digits
        if is_decimal_literal(trimmed) {
            AmountError::Overflow
        } else {
            AmountError::InvalidNumeric
        }
    })?;
    let factor = 10_i64
        .checked_pow(decimal_point)
        .ok_or(AmountError::Overflow)?;

    decimal
        .checked_mul(Decimal::from(factor))
        .ok_or(AmountError::Overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .map(Satoshis::new)
        .ok_or(AmountError::Overflow)
}

/// Optional sign, digits, and an optional `.` followed by more digits.
fn is_decimal_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(integer) && fraction.map_or(true, all_digits)
}

/// `decimal_point` must not exceed [`MAX_DECIMAL_POINT`].
pub(crate) fn render_plain(minor: i64, decimal_point: u32) -> String {
    let (integer, fraction) = split_magnitude(minor.unsigned_abs(), decimal_point);
    let sign = if minor < 0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}

/// Integer part and trimmed fractional digits of `magnitude / 10^decimal_point`.
fn split_magnitude(magnitude: u64, decimal_point: u32) -> (u128, String) {
    let divisor = 10_u128.pow(decimal_point);
    let magnitude = u128::from(magnitude);
    let integer = magnitude / divisor;
    let remainder = magnitude % divisor;
    if remainder == 0 {
        return (integer, String::new());
    }

    let mut fraction = format!("{remainder:0width$}", width = decimal_point as usize);
    while fraction.ends_with('0') {
        fraction.pop();
    }
    (integer, fraction)
}

fn integral_minor_units(value: &InputValue) -> Result<i64> {
    match value {
        InputValue::Int(n) => i64::try_from(*n)
            .map_err(|_| CoreError::contract(format!("amount {n} does not fit in 64 bits"))),
        InputValue::Decimal(d) if d.fract().is_zero() => d
            .to_i64()
            .ok_or_else(|| CoreError::contract(format!("amount {d} does not fit in 64 bits"))),
        InputValue::Decimal(d) => Err(CoreError::contract(format!(
            "amount {d} is not a whole number of minor units"
        ))),
        other => Err(CoreError::contract(format!(
            "amount must be an integer number of minor units, got {}",
            other.kind()
        ))),
    }
}

fn check_decimal_point(decimal_point: u32) -> Result<()> {
    if decimal_point > MAX_DECIMAL_POINT {
        return Err(CoreError::contract(format!(
            "decimal point {decimal_point} exceeds {MAX_DECIMAL_POINT}"
        )));
    }
    Ok(())
}

/// `None` when `value` is finite but beyond `Decimal::MAX`; such floats are
/// already whole numbers.
fn decimal_from_float(value: f64) -> Result<Option<Decimal>> {
    if !value.is_finite() {
        return Err(CoreError::contract(format!("fee rate {value} is not finite")));
    }
    // Going through the shortest round-trip text keeps 1.7 as 1.7 rather
    // than the nearest binary fraction.
    let decimal = Decimal::from_str(&value.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(value));
    match decimal {
        Some(decimal) => Ok(Some(decimal)),
        None if value.abs() >= 1.0 => Ok(None),
        None => Err(CoreError::contract(format!("fee rate {value} is out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    use crate::error::{AmountError, CoreError};
    use crate::types::{InputValue, Satoshis};

    use super::*;

    fn plain(value: i64) -> String {
        format_amount(value, &AmountFormat::new()).unwrap()
    }

    #[test]
    fn formats_minor_units_as_coins() {
        assert_eq!(plain(1234), "0.00001234");
        assert_eq!(plain(-1234), "-0.00001234");
        assert_eq!(plain(100_000_000), "1");
        assert_eq!(plain(150_000_000), "1.5");
        assert_eq!(plain(0), "0");
        assert_eq!(
            format_amount(1234, &AmountFormat::new().decimal_point(5)).unwrap(),
            "0.01234"
        );
        assert_eq!(
            format_amount(Decimal::new(1234, 0), &AmountFormat::new()).unwrap(),
            "0.00001234"
        );
    }

    #[test]
    fn diff_sign_marks_credits() {
        let diff = AmountFormat::new().show_diff_sign(true);
        assert_eq!(format_amount(1234, &diff).unwrap(), "+0.00001234");
        assert_eq!(format_amount(-1234, &diff).unwrap(), "-0.00001234");
        assert_eq!(format_amount(0, &diff).unwrap(), "+0");
    }

    #[test]
    fn whitespaces_align_decimal_points() {
        let padded = AmountFormat::new().whitespaces(true);
        assert_eq!(format_amount(12340, &padded).unwrap(), "     0.0001234 ");
        assert_eq!(format_amount(1234, &padded).unwrap(), "     0.00001234");
        assert_eq!(format_amount(-12340, &padded).unwrap(), "    -0.0001234 ");
        assert_eq!(format_amount(-1234, &padded).unwrap(), "    -0.00001234");
        assert_eq!(format_amount(100_000_000, &padded).unwrap(), "     1         ");

        let rows: [i64; 3] = [1, 12_345_678_900, -50_000_000];
        let separator_columns: Vec<usize> = rows
            .iter()
            .map(|value| {
                let rendered = format_amount(*value, &padded).unwrap();
                assert_eq!(rendered.len(), PADDED_AMOUNT_WIDTH);
                rendered.find('.').unwrap()
            })
            .collect();
        assert!(separator_columns.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn rejects_non_integral_amounts() {
        let fractional = format_amount(Decimal::new(15, 1), &AmountFormat::new());
        assert!(matches!(fractional, Err(CoreError::ContractViolation(_))));
        assert!(format_amount(1.5, &AmountFormat::new()).is_err());
        assert!(format_amount("1234", &AmountFormat::new()).is_err());
        assert!(format_amount(InputValue::Null, &AmountFormat::new()).is_err());
        assert!(format_amount(u64::MAX, &AmountFormat::new()).is_err());
        assert!(format_amount(1, &AmountFormat::new().decimal_point(19)).is_err());
    }

    #[test]
    fn plain_format_matches_unpadded_format() {
        assert_eq!(format_amount_plain(1234, 8).unwrap(), "0.00001234");
        assert_eq!(format_amount_plain(Decimal::new(1234, 0), 8).unwrap(), "0.00001234");
        assert_eq!(format_amount_plain(1234, 5).unwrap(), "0.01234");
        assert_eq!(format_amount_plain(1234, 0).unwrap(), "1234");
        assert_eq!(format_amount_plain(i64::MIN, 8).unwrap(), "-92233720368.54775808");
    }

    #[test]
    fn fee_rate_rounds_half_away_from_zero() {
        assert_eq!(format_fee_rate(1700.0 / 1000.0, DEFAULT_FEE_PRECISION).unwrap(), "1.7");
        assert_eq!(format_fee_rate(Decimal::new(17, 1), DEFAULT_FEE_PRECISION).unwrap(), "1.7");
        assert_eq!(format_fee_rate(1666.0 / 1000.0, 6).unwrap(), "1.666");
        assert_eq!(format_fee_rate(1666.0 / 1000.0, 1).unwrap(), "1.7");
        assert_eq!(format_fee_rate(Decimal::new(125, 2), 1).unwrap(), "1.3");
        assert_eq!(format_fee_rate(Decimal::new(-125, 2), 1).unwrap(), "-1.3");
        assert_eq!(format_fee_rate(2, DEFAULT_FEE_PRECISION).unwrap(), "2");
        assert_eq!(format_fee_rate(Decimal::new(200, 2), DEFAULT_FEE_PRECISION).unwrap(), "2");
        assert_eq!(format_fee_rate(-0.001, DEFAULT_FEE_PRECISION).unwrap(), "0");
    }

    #[test]
    fn fee_rate_rejects_non_numeric_input() {
        assert!(matches!(
            format_fee_rate("1.7", 2),
            Err(CoreError::ContractViolation(_))
        ));
        assert!(format_fee_rate(f64::NAN, 2).is_err());
        assert!(format_fee_rate(f64::INFINITY, 2).is_err());
        assert!(format_fee_rate(1.0, MAX_FEE_PRECISION + 1).is_err());
    }

    #[test]
    fn fee_rate_beyond_decimal_range_is_rendered_whole() {
        assert_eq!(
            format_fee_rate(1e30, DEFAULT_FEE_PRECISION).unwrap(),
            "1000000000000000000000000000000"
        );
        assert_eq!(
            format_fee_rate(-1e30, DEFAULT_FEE_PRECISION).unwrap(),
            "-1000000000000000000000000000000"
        );
        assert_eq!(
            format_fee_rate(InputValue::Int(i128::MAX), DEFAULT_FEE_PRECISION).unwrap(),
            i128::MAX.to_string()
        );
    }

    #[test]
    fn parses_coin_strings_into_minor_units() {
        assert_eq!(parse_amount("0.0003", 8), Ok(Satoshis::new(30_000)));
        assert_eq!(parse_amount("0.00004", 8), Ok(Satoshis::new(4_000)));
        assert_eq!(parse_amount("1", 8), Ok(Satoshis::new(100_000_000)));
        assert_eq!(parse_amount(" 1.5 ", 8), Ok(Satoshis::new(150_000_000)));
        assert_eq!(parse_amount("0.000000005", 8), Ok(Satoshis::new(1)));
        assert_eq!(parse_amount("0.000000004", 8), Ok(Satoshis::new(0)));
        assert_eq!(parse_amount("-0.00001234", 8), Ok(Satoshis::new(-1234)));
    }

    #[test]
    fn rejects_malformed_amount_strings() {
        assert_eq!(parse_amount("", 8), Err(AmountError::Empty));
        assert_eq!(parse_amount("   ", 8), Err(AmountError::Empty));
        assert_eq!(parse_amount("abc", 8), Err(AmountError::InvalidNumeric));
        assert_eq!(parse_amount("1,5", 8), Err(AmountError::InvalidNumeric));
        assert_eq!(parse_amount("1e5", 8), Err(AmountError::InvalidNumeric));
        assert_eq!(parse_amount("1_000", 8), Err(AmountError::InvalidNumeric));
        assert_eq!(parse_amount("1.2.3", 8), Err(AmountError::InvalidNumeric));
        assert_eq!(parse_amount("100000000000000", 8), Err(AmountError::Overflow));
        assert_eq!(parse_amount("1", 19), Err(AmountError::Overflow));
        assert_eq!(
            parse_amount("999999999999999999999999999999", 8),
            Err(AmountError::Overflow)
        );
        assert_eq!(
            parse_amount("-999999999999999999999999999999", 8),
            Err(AmountError::Overflow)
        );
    }

    proptest! {
        #[test]
        fn plain_format_roundtrips_through_parse(
            value in 0_i64..=i64::MAX,
            decimal_point in 0_u32..=MAX_DECIMAL_POINT,
        ) {
            let rendered = format_amount_plain(value, decimal_point).unwrap();
            prop_assert_eq!(parse_amount(&rendered, decimal_point), Ok(Satoshis::new(value)));
        }
    }
}
