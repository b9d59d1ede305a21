//! Bridge over anything that can be enumerated.

use std::borrow::Cow;
use std::marker::PhantomData;

use gridbridge_engine::engine::{TargetType, Value};
use gridbridge_engine::{MarshalError, Result};

use super::{Bridge, check_cells};

/// A host value that may expose an enumeration of child values.
pub trait Enumerable: Sized {
    /// Children, when this value can be enumerated.
    fn enumerate(&self) -> Option<Vec<Self>>;

    /// Scalar view of this value.
    fn as_value(&self) -> Cow<'_, Value>;

    /// The value an omitted argument reads as.
    fn missing() -> Self;
}

/// Sequences enumerate their items; a 2-D sequence enumerates its rows.
/// Strings are scalars.
impl Enumerable for Value {
    fn enumerate(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.clone()),
            Value::Array2(rows) => Some(rows.iter().cloned().map(Value::Array).collect()),
            _ => None,
        }
    }

    fn as_value(&self) -> Cow<'_, Value> {
        Cow::Borrowed(self)
    }

    fn missing() -> Value {
        Value::Missing
    }
}

/// Accepts any [`Enumerable`] source. A 2-D read turns each enumerable
/// item into a row and each bare scalar item into a single-cell row. On
/// output a null element stays a literal [`Value::Null`].
pub struct IterableBridge<E = Value> {
    _source: PhantomData<fn(&E)>,
}

impl<E: Enumerable> IterableBridge<E> {
    pub const fn new() -> Self {
        IterableBridge {
            _source: PhantomData,
        }
    }
}

impl<E: Enumerable> Default for IterableBridge<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for IterableBridge<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for IterableBridge<E> {}

impl<E> std::fmt::Debug for IterableBridge<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IterableBridge")
    }
}

fn is_null<E: Enumerable>(source: &E) -> bool {
    source.as_value().is_marker()
}

impl<E: Enumerable> Bridge for IterableBridge<E> {
    type Source = E;

    fn scalar<'a>(&self, source: &'a E) -> Cow<'a, Value> {
        source.as_value()
    }

    fn items(&self, source: &E) -> Result<Vec<Value>> {
        if is_null(source) {
            return Ok(Vec::new());
        }
        match source.enumerate() {
            Some(children) => Ok(children.iter().map(|c| c.as_value().into_owned()).collect()),
            None => Err(MarshalError::conversion(
                source.as_value().kind(),
                TargetType::Sequence,
            )),
        }
    }

    fn rows(&self, source: &E) -> Result<Vec<Vec<Value>>> {
        if is_null(source) {
            return Ok(Vec::new());
        }
        let Some(children) = source.enumerate() else {
            return Err(MarshalError::conversion(
                source.as_value().kind(),
                TargetType::Sequence2,
            ));
        };
        let rows: Vec<Vec<Value>> = children
            .iter()
            .map(|child| match child.enumerate() {
                Some(cells) => cells.iter().map(|c| c.as_value().into_owned()).collect(),
                None => vec![child.as_value().into_owned()],
            })
            .collect();
        check_cells(&rows)?;
        Ok(rows)
    }

    fn absent(&self) -> Value {
        Value::Null
    }

    fn missing(&self) -> E {
        E::missing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridbridge_engine::engine::{ValueGrid, ValueKind};

    fn d(n: f64) -> Value {
        Value::Double(n)
    }

    #[test]
    fn test_scalar_rows_become_single_cell_rows() {
        let bridge = IterableBridge::<Value>::new();
        let source = Value::Array(vec![
            Value::Array(vec![d(1.0), d(2.0)]),
            d(3.0),
            Value::Array(vec![]),
        ]);
        assert_eq!(
            bridge.to_2d::<f64>(&source).unwrap(),
            vec![vec![1.0, 2.0], vec![3.0, 0.0], vec![0.0, 0.0]]
        );
    }

    #[test]
    fn test_flat_sequence_reads_as_a_column() {
        let bridge = IterableBridge::<Value>::new();
        let grid = bridge
            .to_grid(&Value::Array(vec![d(1.0), d(2.0), d(3.0)]))
            .unwrap();
        assert_eq!((grid.rows(), grid.cols()), (3, 1));
        assert_eq!(grid.get(2, 0).unwrap(), &d(3.0));
    }

    #[test]
    fn test_canonical_shapes_still_work() {
        let bridge = IterableBridge::<Value>::new();
        let source = Value::Array2(vec![vec![d(1.0), d(2.0), d(3.0)], vec![d(4.0)]]);
        let grid = bridge.to_grid(&source).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.get(1, 1).unwrap(), &Value::EMPTY);
        assert!(bridge.to_list::<f64>(&Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_non_enumerable_source_is_conversion_error() {
        let bridge = IterableBridge::<Value>::new();
        assert_eq!(
            bridge.to_list::<f64>(&d(1.0)).unwrap_err(),
            MarshalError::conversion(ValueKind::Double, TargetType::Sequence)
        );
        assert_eq!(
            bridge.to_grid(&Value::Str("abc".to_string())).unwrap_err(),
            MarshalError::conversion(ValueKind::Str, TargetType::Sequence2)
        );
    }

    #[test]
    fn test_three_levels_is_dimension_error() {
        let bridge = IterableBridge::<Value>::new();
        let source = Value::Array(vec![Value::Array(vec![Value::Array(vec![d(1.0)])])]);
        assert_eq!(
            bridge.to_grid(&source).unwrap_err(),
            MarshalError::Dimension { rank: 3 }
        );
    }

    #[test]
    fn test_output_keeps_literal_null() {
        let bridge = IterableBridge::<Value>::new();
        let out = bridge.to_wire_array(&[Some("a"), None]);
        assert_eq!(out, Value::Array(vec![Value::Str("a".to_string()), Value::Null]));
        let rows = vec![vec![Some(1i64)], vec![None, Some(2)]];
        assert_eq!(
            bridge.to_wire_grid(&rows),
            Value::Array2(vec![
                vec![Value::Long(1), Value::Null],
                vec![Value::Null, Value::Long(2)],
            ])
        );
    }

    #[test]
    fn test_grid_to_wire_never_boxes() {
        let grid = ValueGrid::from_ragged(vec![
            vec![Value::Int(1), Value::Missing, Value::NoValue, Value::Null],
            vec![d(2.0)],
        ]);
        let out = IterableBridge::<Value>::new().grid_to_wire(&grid);
        assert_eq!(
            out,
            Value::Array2(vec![
                vec![Value::Int(1), Value::Null, Value::Null, Value::Null],
                vec![d(2.0), Value::Null, Value::Null, Value::Null],
            ])
        );
    }
}
