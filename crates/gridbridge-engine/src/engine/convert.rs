//! Scalar conversion between untyped values and host types.
//!
//! Rules applied by [`ScalarConverter::convert`], in order:
//!
//! 1. An empty source yields the target's zero value.
//! 2. A source whose kind already matches the target passes through.
//! 3. A string target takes the canonical text form.
//! 4. A char target takes the first code point of a string.
//! 5. A date target decodes a float as an OLE Automation serial.
//! 6. `Option<U>` peels once, converts to `U` and rewraps.
//! 7. Everything else goes through the numeric/string path. Narrowing a
//!    float to an integer rounds half to even.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use super::date::{from_oa_date, ole_epoch, to_oa_date};
use super::empty::EmptinessClassifier;
use super::value::Value;
use crate::error::{MarshalError, Result};

/// Static type a value is being converted to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetType {
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    String,
    DateTime,
    Any,
    Sequence,
    Sequence2,
    Grid,
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetType::Bool => "boolean",
            TargetType::Byte => "byte",
            TargetType::Short => "short",
            TargetType::Int => "int32",
            TargetType::Long => "int64",
            TargetType::Float => "float",
            TargetType::Double => "double",
            TargetType::Char => "char",
            TargetType::String => "string",
            TargetType::DateTime => "date",
            TargetType::Any => "any",
            TargetType::Sequence => "sequence",
            TargetType::Sequence2 => "sequence<sequence>",
            TargetType::Grid => "grid",
        };
        f.write_str(name)
    }
}

/// A host type an untyped value can be converted into.
pub trait FromValue: Sized {
    /// Tag reported when conversion fails.
    const TARGET: TargetType;

    /// Result for an empty source.
    fn zero() -> Self;

    /// Convert a non-empty source. None when the kinds are incompatible.
    fn from_present(value: &Value) -> Option<Self>;
}

/// Host types that may sit inside the nullable wrapper `Option<_>`.
///
/// `Option` itself is not a scalar, so a nullable peels exactly once.
pub trait Scalar: FromValue {}

impl<S: Scalar> FromValue for Option<S> {
    const TARGET: TargetType = S::TARGET;

    fn zero() -> Self {
        None
    }

    fn from_present(value: &Value) -> Option<Self> {
        S::from_present(value).map(Some)
    }
}

/// A host value that can be boxed onto the wire.
pub trait ToValue {
    /// Wire form of this value. None marks a logical absent element; each
    /// bridge decides how absence is written.
    fn to_value(&self) -> Option<Value>;
}

/// Stateless scalar converter shared by every bridge.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarConverter {
    classifier: EmptinessClassifier,
}

/// Converter instance used by both bridges.
pub static SCALAR_CONVERTER: ScalarConverter = ScalarConverter::new();

impl ScalarConverter {
    pub const fn new() -> Self {
        ScalarConverter {
            classifier: EmptinessClassifier::new(),
        }
    }

    pub fn classifier(&self) -> &EmptinessClassifier {
        &self.classifier
    }

    /// Convert one value to `T`. An empty source yields `T::zero()`.
    pub fn convert<T: FromValue>(&self, value: &Value) -> Result<T> {
        if self.classifier.is_empty(value) {
            tracing::trace!(
                kind = %value.kind(),
                target = %T::TARGET,
                "empty source, using zero value"
            );
            return Ok(T::zero());
        }
        T::from_present(value).ok_or_else(|| MarshalError::conversion(value.kind(), T::TARGET))
    }
}

/// Convert with the shared converter.
pub fn convert<T: FromValue>(value: &Value) -> Result<T> {
    SCALAR_CONVERTER.convert(value)
}

/// Float to integer with round-half-to-even, rejecting NaN and overflow.
fn round_to_i64(n: f64) -> Option<i64> {
    let r = n.round_ties_even();
    // -2^63 is exact in f64; the upper bound 2^63 is exclusive.
    if r.is_finite() && r >= i64::MIN as f64 && r < -(i64::MIN as f64) {
        Some(r as i64)
    } else {
        None
    }
}

fn integer<T: TryFrom<i64>>(value: &Value) -> Option<T> {
    let n = match value {
        Value::Float(f) => round_to_i64(f64::from(*f))?,
        Value::Double(f) => round_to_i64(*f)?,
        Value::Char(c) => i64::from(u32::from(*c)),
        Value::Str(s) => s.trim().parse::<i64>().ok()?,
        other => other.as_i64()?,
    };
    T::try_from(n).ok()
}

fn parse_bool(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

macro_rules! impl_integer_target {
    ($($ty:ty => $variant:ident, $target:ident);* $(;)?) => {
        $(
            impl FromValue for $ty {
                const TARGET: TargetType = TargetType::$target;

                fn zero() -> Self {
                    0
                }

                fn from_present(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(n) => Some(*n),
                        other => integer(other),
                    }
                }
            }

            impl Scalar for $ty {}
        )*
    };
}

impl_integer_target! {
    u8 => Byte, Byte;
    i16 => Short, Short;
    i32 => Int, Int;
    i64 => Long, Long;
}

impl FromValue for bool {
    const TARGET: TargetType = TargetType::Bool;

    fn zero() -> Self {
        false
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Str(s) => parse_bool(s),
            other => other.as_f64().map(|n| n != 0.0),
        }
    }
}

impl Scalar for bool {}

impl FromValue for f64 {
    const TARGET: TargetType = TargetType::Double;

    fn zero() -> Self {
        0.0
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Double(n) => Some(*n),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        }
    }
}

impl Scalar for f64 {}

impl FromValue for f32 {
    const TARGET: TargetType = TargetType::Float;

    fn zero() -> Self {
        0.0
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(*n),
            Value::Str(s) => s.trim().parse::<f32>().ok(),
            other => other.as_f64().map(|n| n as f32),
        }
    }
}

impl Scalar for f32 {}

impl FromValue for char {
    const TARGET: TargetType = TargetType::Char;

    fn zero() -> Self {
        '\0'
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(*c),
            Value::Str(s) => s.chars().next(),
            Value::Byte(_) | Value::Short(_) | Value::Int(_) | Value::Long(_) => {
                let code = u32::try_from(value.as_i64()?).ok()?;
                char::from_u32(code)
            }
            _ => None,
        }
    }
}

impl Scalar for char {}

impl FromValue for String {
    const TARGET: TargetType = TargetType::String;

    fn zero() -> Self {
        String::new()
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl Scalar for String {}

/// The zero date is the OLE epoch, serial `0.0`.
impl FromValue for NaiveDateTime {
    const TARGET: TargetType = TargetType::DateTime;

    fn zero() -> Self {
        ole_epoch()
    }

    fn from_present(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            Value::Double(n) => from_oa_date(*n),
            Value::Float(n) => from_oa_date(f64::from(*n)),
            Value::Str(s) => parse_date(s),
            _ => None,
        }
    }
}

impl Scalar for NaiveDateTime {}

/// The generic "any" target keeps the value as-is.
impl FromValue for Value {
    const TARGET: TargetType = TargetType::Any;

    fn zero() -> Self {
        Value::EMPTY
    }

    fn from_present(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Scalar for Value {}

macro_rules! impl_to_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Option<Value> {
                    Some(Value::from(self.clone()))
                }
            }
        )*
    };
}

impl_to_value!(bool, u8, i8, i16, i32, i64, f32, f64, char, String);

impl ToValue for str {
    fn to_value(&self) -> Option<Value> {
        Some(Value::from(self))
    }
}

/// Dates leave as OLE serials.
impl ToValue for NaiveDateTime {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Double(to_oa_date(*self)))
    }
}

/// Every Empty marker is a logical absent element; the bridge picks its
/// wire form.
impl ToValue for Value {
    fn to_value(&self) -> Option<Value> {
        match self {
            v if v.is_marker() => None,
            other => Some(other.clone()),
        }
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(ToValue::to_value)
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Option<Value> {
        (**self).to_value()
    }
}
