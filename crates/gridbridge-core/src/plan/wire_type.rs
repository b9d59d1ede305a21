//! Wire type tags.
//!
//! Parses the tags a function manifest declares (`double`,
//! `sequence<int32>`, `sequence<sequence<any>>`, ...) and converts a source
//! to the matching typed value.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use gridbridge_engine::engine::{FromValue, NaiveDateTime, Value};
use gridbridge_engine::Result;

use crate::bridge::Bridge;
use crate::error::BridgeError;

/// Scalar element tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Boolean,
    Byte,
    Short,
    Int32,
    Int64,
    Float,
    Double,
    Char,
    String,
    Date,
    Any,
}

/// Full parameter tag: a scalar, a sequence, a sequence of sequences, or an
/// untyped grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireType {
    Scalar(ScalarType),
    Sequence(ScalarType),
    Sequence2(ScalarType),
    Grid,
}

impl ScalarType {
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::Boolean => "boolean",
            ScalarType::Byte => "byte",
            ScalarType::Short => "short",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Char => "char",
            ScalarType::String => "string",
            ScalarType::Date => "date",
            ScalarType::Any => "any",
        }
    }

    fn from_name(name: &str) -> Option<ScalarType> {
        let ty = match name.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => ScalarType::Boolean,
            "byte" => ScalarType::Byte,
            "short" | "int16" => ScalarType::Short,
            "int32" | "int" => ScalarType::Int32,
            "int64" | "hyper" => ScalarType::Int64,
            "float" => ScalarType::Float,
            "double" => ScalarType::Double,
            "char" => ScalarType::Char,
            "string" => ScalarType::String,
            "date" => ScalarType::Date,
            "any" => ScalarType::Any,
            _ => return None,
        };
        Some(ty)
    }
}

fn sequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(concat!(
            r"^sequence\s*<\s*",
            r"(?:(?<nested>sequence\s*<\s*(?<inner>\w+)\s*>)|(?<elem>\w+))",
            r"\s*>$",
        ))
        .expect("sequence tag regex must compile")
    })
}

impl FromStr for WireType {
    type Err = BridgeError;

    fn from_str(tag: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = tag.trim();
        let unknown = || BridgeError::UnknownType {
            tag: tag.to_string(),
        };

        if trimmed.eq_ignore_ascii_case("grid") {
            return Ok(WireType::Grid);
        }
        if let Some(caps) = sequence_re().captures(trimmed) {
            if caps.name("nested").is_some() {
                let inner = ScalarType::from_name(&caps["inner"]).ok_or_else(unknown)?;
                return Ok(WireType::Sequence2(inner));
            }
            let elem = ScalarType::from_name(&caps["elem"]).ok_or_else(unknown)?;
            return Ok(WireType::Sequence(elem));
        }
        ScalarType::from_name(trimmed)
            .map(WireType::Scalar)
            .ok_or_else(unknown)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireType::Scalar(s) => f.write_str(s.name()),
            WireType::Sequence(s) => write!(f, "sequence<{}>", s.name()),
            WireType::Sequence2(s) => write!(f, "sequence<sequence<{}>>", s.name()),
            WireType::Grid => f.write_str("grid"),
        }
    }
}

fn scalar<B, T>(bridge: &B, source: &B::Source) -> Result<Value>
where
    B: Bridge,
    T: FromValue + Into<Value>,
{
    bridge.convert::<T>(source).map(Into::into)
}

fn sequence<B, T>(bridge: &B, source: &B::Source) -> Result<Value>
where
    B: Bridge,
    T: FromValue + Into<Value>,
{
    let items = bridge.to_list::<T>(source)?;
    Ok(Value::Array(items.into_iter().map(Into::into).collect()))
}

fn sequence2<B, T>(bridge: &B, source: &B::Source) -> Result<Value>
where
    B: Bridge,
    T: FromValue + Into<Value>,
{
    let rows = bridge.to_2d::<T>(source)?;
    Ok(Value::Array2(
        rows.into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect(),
    ))
}

/// Call `$f::<T>` with the host type for a scalar tag.
macro_rules! dispatch {
    ($scalar:expr, $f:ident, $bridge:expr, $source:expr) => {
        match $scalar {
            ScalarType::Boolean => $f::<B, bool>($bridge, $source),
            ScalarType::Byte => $f::<B, u8>($bridge, $source),
            ScalarType::Short => $f::<B, i16>($bridge, $source),
            ScalarType::Int32 => $f::<B, i32>($bridge, $source),
            ScalarType::Int64 => $f::<B, i64>($bridge, $source),
            ScalarType::Float => $f::<B, f32>($bridge, $source),
            ScalarType::Double => $f::<B, f64>($bridge, $source),
            ScalarType::Char => $f::<B, char>($bridge, $source),
            ScalarType::String => $f::<B, String>($bridge, $source),
            ScalarType::Date => $f::<B, NaiveDateTime>($bridge, $source),
            ScalarType::Any => $f::<B, Value>($bridge, $source),
        }
    };
}

impl WireType {
    /// Convert a source to the typed value this tag describes.
    pub fn marshal<B: Bridge>(&self, bridge: &B, source: &B::Source) -> Result<Value> {
        match *self {
            WireType::Scalar(s) => dispatch!(s, scalar, bridge, source),
            WireType::Sequence(s) => dispatch!(s, sequence, bridge, source),
            WireType::Sequence2(s) => dispatch!(s, sequence2, bridge, source),
            WireType::Grid => Ok(bridge.to_grid(source)?.into_value()),
        }
    }
}
