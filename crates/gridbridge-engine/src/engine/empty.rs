//! Emptiness classification.
//!
//! Decides whether an untyped value stands for "no value supplied". A
//! supplied zero or `false` is never empty. A one-cell range whose only cell
//! is blank is indistinguishable from an omitted argument.

use super::Value;

/// The single Empty/NotEmpty tag every bridge operation consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emptiness {
    Empty,
    NotEmpty,
}

impl Emptiness {
    pub fn is_empty(self) -> bool {
        self == Emptiness::Empty
    }
}

/// Stateless classifier shared by every bridge.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptinessClassifier;

impl EmptinessClassifier {
    pub const fn new() -> Self {
        EmptinessClassifier
    }

    pub fn classify(&self, value: &Value) -> Emptiness {
        if is_empty(value) {
            Emptiness::Empty
        } else {
            Emptiness::NotEmpty
        }
    }

    pub fn is_empty(&self, value: &Value) -> bool {
        is_empty(value)
    }
}

/// Emptiness rules, in order:
/// markers are empty; scalars are never empty; strings are empty when blank;
/// a sequence is empty when it has no items or one empty item; a 2-D
/// sequence is empty when it has no rows or one row that is empty.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::NoValue | Value::Missing => true,
        Value::Str(s) => s.is_empty(),
        Value::Array(items) => is_empty_items(items),
        Value::Array2(rows) => match rows.as_slice() {
            [] => true,
            [row] => is_empty_items(row),
            _ => false,
        },
        _ => false,
    }
}

fn is_empty_items(items: &[Value]) -> bool {
    match items {
        [] => true,
        [only] => is_empty(only),
        _ => false,
    }
}
