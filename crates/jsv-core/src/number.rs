//! # Lexical Decimal Numbers
//!
//! JSON numbers are read from their literal text into an arbitrary-precision
//! decimal. The workspace enables `serde_json`'s `arbitrary_precision`
//! feature, so `Number::to_string()` returns the text exactly as written and
//! no binary floating point is involved anywhere in a comparison.
//!
//! ## Two kinds of equality
//!
//! - **Numeric** (`PartialEq`, `PartialOrd`): `1.0 == 1.00`. Used by
//!   `minimum`, `maximum` and `multipleOf`.
//! - **Lexical** ([`JsonNumber::lexically_eq`], [`lexically_equal`]): the
//!   unscaled value and the scale must both match, so `1.0` and `1.00`
//!   differ while `1.0` and `10e-1` do not. Used by `enum`, `const` and
//!   `uniqueItems`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::{Number, Value};

use crate::error::NumberError;

/// An arbitrary-precision decimal that remembers its written scale.
#[derive(Debug, Clone)]
pub struct JsonNumber(BigDecimal);

impl JsonNumber {
    /// Parse a decimal literal (`12`, `-1.50`, `2e-3`).
    pub fn parse(text: &str) -> Result<Self, NumberError> {
        BigDecimal::from_str(text.trim())
            .map(Self)
            .map_err(|_| NumberError::InvalidLiteral(text.to_string()))
    }

    /// Read a `serde_json::Number` from its literal text.
    pub fn from_number(number: &Number) -> Result<Self, NumberError> {
        Self::parse(&number.to_string())
    }

    /// Read a JSON value that must be a number.
    pub fn from_value(value: &Value) -> Result<Self, NumberError> {
        match value {
            Value::Number(n) => Self::from_number(n),
            other => Err(NumberError::NotANumber(crate::JsonType::of(other).to_string())),
        }
    }

    /// The underlying decimal.
    pub fn as_decimal(&self) -> &BigDecimal {
        &self.0
    }

    /// Digits after the decimal point as written (negative for exponents
    /// that shift left, e.g. `1e2` has scale `-2`).
    pub fn scale(&self) -> i64 {
        self.0.as_bigint_and_exponent().1
    }

    /// True when the fractional part is zero (`3`, `3.0`, `3e1`).
    pub fn is_integral(&self) -> bool {
        let digits = self.digits();
        digits.zero || self.scale() <= digits.trailing_zeros
    }

    /// The value as `u64` when it is a non-negative integer that fits.
    pub fn as_u64(&self) -> Option<u64> {
        let digits = self.digits();
        if digits.negative || !self.is_integral() || digits.leading_position(self.scale()) > 20 {
            return None;
        }
        self.0.with_scale(0).to_string().parse().ok()
    }

    /// True when the value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        let digits = self.digits();
        !digits.zero && !digits.negative
    }

    /// True when `self / divisor` is a whole number. A zero divisor never
    /// divides.
    ///
    /// Both sides are reduced to `significand × 10^-scale` with trailing
    /// zeros stripped. A quotient needing a negative power of ten is never
    /// whole; a positive one only matters up to the factors of 2 and 5 in
    /// the divisor's significand, so the power is capped before it is
    /// materialised.
    pub fn is_multiple_of(&self, divisor: &JsonNumber) -> bool {
        let (value_digits, divisor_digits) = (self.digits(), divisor.digits());
        if divisor_digits.zero {
            return false;
        }
        if value_digits.zero {
            return true;
        }
        let (value, value_scale) = self.reduced(&value_digits);
        let (divisor_value, divisor_scale) = divisor.reduced(&divisor_digits);
        let shift = divisor_scale - value_scale;
        if shift < 0 {
            return false;
        }
        let shift = shift.min(4 * divisor_digits.count + 1);
        let scaled = value * BigDecimal::new(1.into(), -shift);
        scaled % divisor_value == BigDecimal::from(0i64)
    }

    /// Same unscaled value and same scale.
    pub fn lexically_eq(&self, other: &JsonNumber) -> bool {
        self.0.as_bigint_and_exponent() == other.0.as_bigint_and_exponent()
    }

    /// Convert back to a JSON number, preserving the written scale.
    pub fn to_json(&self) -> Result<Value, NumberError> {
        let text = self.to_string();
        Number::from_str(&text)
            .map(Value::Number)
            .map_err(|_| NumberError::InvalidLiteral(text))
    }
}

impl JsonNumber {
    fn digits(&self) -> Digits {
        let (unscaled, _) = self.0.as_bigint_and_exponent();
        let text = unscaled.to_string();
        let body = text.trim_start_matches('-');
        let significant = body.trim_end_matches('0');
        Digits {
            negative: text.starts_with('-'),
            zero: significant.is_empty(),
            count: body.len() as i64,
            trailing_zeros: (body.len() - significant.len()) as i64,
        }
    }

    /// The significand without trailing zeros, as an integer, and the
    /// matching scale.
    fn reduced(&self, digits: &Digits) -> (BigDecimal, i64) {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        let significand = BigDecimal::new(unscaled, digits.trailing_zeros).with_scale(0);
        (significand, scale - digits.trailing_zeros)
    }

    /// Numeric comparison. Values whose leading digits sit at different
    /// powers of ten are ordered without aligning their scales.
    fn cmp_value(&self, other: &Self) -> Ordering {
        let (a, b) = (self.digits(), other.digits());
        let by_sign = a.sign().cmp(&b.sign());
        if by_sign != Ordering::Equal || a.zero {
            return by_sign;
        }
        let by_position = a
            .leading_position(self.scale())
            .cmp(&b.leading_position(other.scale()));
        match by_position {
            Ordering::Equal => self.0.cmp(&other.0),
            ord if a.negative => ord.reverse(),
            ord => ord,
        }
    }
}

/// Facts about the unscaled digits of a decimal, read without expanding
/// its exponent.
struct Digits {
    negative: bool,
    zero: bool,
    count: i64,
    trailing_zeros: i64,
}

impl Digits {
    fn sign(&self) -> i8 {
        match (self.zero, self.negative) {
            (true, _) => 0,
            (false, true) => -1,
            (false, false) => 1,
        }
    }

    /// Power of ten just above the leading digit.
    fn leading_position(&self, scale: i64) -> i64 {
        self.count - scale
    }
}

impl PartialEq for JsonNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}

impl PartialOrd for JsonNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_value(other))
    }
}

/// Scales beyond this are written with an exponent instead of padded zeros.
const PLAIN_SCALE_LIMIT: i64 = 64;

impl fmt::Display for JsonNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (unscaled, scale) = self.0.as_bigint_and_exponent();
        if scale.abs() > PLAIN_SCALE_LIMIT {
            write!(f, "{unscaled}e{}", -scale)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl FromStr for JsonNumber {
    type Err = NumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// True when a JSON number has no fractional part.
pub fn is_integral(number: &Number) -> bool {
    if number.is_i64() || number.is_u64() {
        return true;
    }
    JsonNumber::from_number(number).is_ok_and(|n| n.is_integral())
}

/// Lexical equivalence of two JSON values.
///
/// Numbers compare by unscaled value and scale. Arrays compare element-wise
/// in order. Objects compare by key set and member values, ignoring member
/// order. Everything else compares structurally.
pub fn lexically_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            match (JsonNumber::from_number(x), JsonNumber::from_number(y)) {
                (Ok(x), Ok(y)) => x.lexically_eq(&y),
                _ => x.to_string() == y.to_string(),
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| lexically_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| lexically_equal(x, y)))
        }
        _ => a == b,
    }
}
