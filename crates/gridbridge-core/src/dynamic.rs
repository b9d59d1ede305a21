//! Rhai [`Dynamic`] interop.
//!
//! Script hosts hand over loosely nested arrays; [`IterableBridge<Dynamic>`]
//! reads them directly. Unit maps to [`Value::Null`] in both directions.
//! Dates leave as OLE serials since Rhai has no date type.
//!
//! [`IterableBridge<Dynamic>`]: crate::bridge::IterableBridge

use std::borrow::Cow;

use gridbridge_engine::engine::{NaiveDateTime, Value, to_oa_date};
use rhai::{Array, Dynamic};

use crate::bridge::Enumerable;

/// Convert a Rhai value into the untyped value model.
///
/// An array whose items are all arrays becomes a 2-D sequence. Types with
/// no counterpart become their text.
pub fn value_from_dynamic(value: &Dynamic) -> Value {
    if value.is_unit() {
        return Value::Null;
    }
    if let Ok(b) = value.as_bool() {
        return Value::Bool(b);
    }
    if let Ok(n) = value.as_int() {
        return Value::Long(n);
    }
    if let Ok(n) = value.as_float() {
        return Value::Double(n);
    }
    if let Ok(c) = value.as_char() {
        return Value::Char(c);
    }
    if value.is_string() {
        return Value::Str(value.to_string());
    }
    if let Some(dt) = value.clone().try_cast::<NaiveDateTime>() {
        return Value::DateTime(dt);
    }
    if let Ok(items) = value.clone().into_array() {
        return array_to_value(&items);
    }
    Value::Str(value.to_string())
}

fn array_to_value(items: &Array) -> Value {
    if !items.is_empty() && items.iter().all(Dynamic::is_array) {
        let rows = items
            .iter()
            .map(|row| match row.clone().into_array() {
                Ok(cells) => cells.iter().map(value_from_dynamic).collect(),
                Err(_) => Vec::new(),
            })
            .collect();
        return Value::Array2(rows);
    }
    Value::Array(items.iter().map(value_from_dynamic).collect())
}

/// Convert an untyped value into a Rhai value. Every marker becomes unit.
pub fn value_to_dynamic(value: &Value) -> Dynamic {
    match value {
        Value::Null | Value::NoValue | Value::Missing => Dynamic::UNIT,
        Value::Bool(b) => Dynamic::from_bool(*b),
        Value::Byte(n) => Dynamic::from_int(i64::from(*n)),
        Value::Short(n) => Dynamic::from_int(i64::from(*n)),
        Value::Int(n) => Dynamic::from_int(i64::from(*n)),
        Value::Long(n) => Dynamic::from_int(*n),
        Value::Float(n) => Dynamic::from_float(f64::from(*n)),
        Value::Double(n) => Dynamic::from_float(*n),
        Value::Char(c) => Dynamic::from_char(*c),
        Value::Str(s) => Dynamic::from(s.clone()),
        Value::DateTime(dt) => Dynamic::from_float(to_oa_date(*dt)),
        Value::Array(items) => Dynamic::from_array(items.iter().map(value_to_dynamic).collect()),
        Value::Array2(rows) => Dynamic::from_array(
            rows.iter()
                .map(|row| Dynamic::from_array(row.iter().map(value_to_dynamic).collect()))
                .collect(),
        ),
    }
}

impl Enumerable for Dynamic {
    fn enumerate(&self) -> Option<Vec<Dynamic>> {
        if !self.is_array() {
            return None;
        }
        self.clone().into_array().ok()
    }

    fn as_value(&self) -> Cow<'_, Value> {
        Cow::Owned(value_from_dynamic(self))
    }

    /// Rhai has no missing-argument marker; unit reads as empty.
    fn missing() -> Dynamic {
        Dynamic::UNIT
    }
}
