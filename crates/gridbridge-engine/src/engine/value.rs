//! The untyped value crossing the spreadsheet boundary.
//!
//! [`Value`] is a closed variant: one scalar kind, a 1-D or 2-D sequence,
//! or one of the "no value" markers. Exactly one form is active at a time.

use chrono::NaiveDateTime;
use std::fmt;

/// An untyped spreadsheet value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// True null: nothing was produced.
    Null,
    /// Boxed database-style "no value" marker.
    NoValue,
    /// The caller omitted this argument.
    Missing,
    Bool(bool),
    Byte(u8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    Str(String),
    DateTime(NaiveDateTime),
    /// 1-D sequence.
    Array(Vec<Value>),
    /// 2-D sequence of rows. Rows may differ in length on input.
    Array2(Vec<Vec<Value>>),
}

/// Runtime kind of a [`Value`], reported in conversion errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    NoValue,
    Missing,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Char,
    Str,
    DateTime,
    Array,
    Array2,
}

impl Value {
    /// Marker used to pad cells that were never supplied.
    pub const EMPTY: Value = Value::Null;

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::NoValue => ValueKind::NoValue,
            Value::Missing => ValueKind::Missing,
            Value::Bool(_) => ValueKind::Bool,
            Value::Byte(_) => ValueKind::Byte,
            Value::Short(_) => ValueKind::Short,
            Value::Int(_) => ValueKind::Int,
            Value::Long(_) => ValueKind::Long,
            Value::Float(_) => ValueKind::Float,
            Value::Double(_) => ValueKind::Double,
            Value::Char(_) => ValueKind::Char,
            Value::Str(_) => ValueKind::Str,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Array(_) => ValueKind::Array,
            Value::Array2(_) => ValueKind::Array2,
        }
    }

    /// Number of array dimensions: 0 for scalars and markers.
    pub fn rank(&self) -> usize {
        match self {
            Value::Array(_) => 1,
            Value::Array2(_) => 2,
            _ => 0,
        }
    }

    /// True for the null, no-value and missing markers.
    pub fn is_marker(&self) -> bool {
        matches!(self, Value::Null | Value::NoValue | Value::Missing)
    }

    pub fn is_collection(&self) -> bool {
        self.rank() > 0
    }

    /// Numeric view used by the generic conversion path.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(n) => Some(f64::from(*n)),
            Value::Short(n) => Some(f64::from(*n)),
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(n) => Some(f64::from(*n)),
            Value::Double(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Exact integer view, when the value is an integer kind.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(n) => Some(i64::from(*n)),
            Value::Short(n) => Some(i64::from(*n)),
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::NoValue => "no-value",
            ValueKind::Missing => "missing",
            ValueKind::Bool => "boolean",
            ValueKind::Byte => "byte",
            ValueKind::Short => "short",
            ValueKind::Int => "int32",
            ValueKind::Long => "int64",
            ValueKind::Float => "float",
            ValueKind::Double => "double",
            ValueKind::Char => "char",
            ValueKind::Str => "string",
            ValueKind::DateTime => "date",
            ValueKind::Array => "sequence",
            ValueKind::Array2 => "sequence<sequence>",
        };
        f.write_str(name)
    }
}

/// Canonical text form. Never fails.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null | Value::NoValue | Value::Missing => Ok(()),
            Value::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
            Value::Byte(n) => write!(f, "{}", n),
            Value::Short(n) => write!(f, "{}", n),
            Value::Int(n) => write!(f, "{}", n),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Char(c) => write!(f, "{}", c),
            Value::Str(s) => f.write_str(s),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Array(items) => write_items(f, items),
            Value::Array2(rows) => {
                f.write_str("[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_items(f, row)?;
                }
                f.write_str("]")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    u8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Str,
    NaiveDateTime => DateTime,
    Vec<Value> => Array,
    Vec<Vec<Value>> => Array2,
}

/// The wire has no signed byte, so `i8` widens to a short.
impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::Short(i16::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
