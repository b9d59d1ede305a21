//! Bridge over the canonical wire arrays.

use std::borrow::Cow;

use gridbridge_engine::engine::{TargetType, Value};
use gridbridge_engine::{MarshalError, Result};

use super::{Bridge, check_cells};

/// Accepts only the fixed wire shapes: [`Value::Array`] for 1-D and
/// [`Value::Array2`] for 2-D. On output a null element becomes the boxed
/// [`Value::NoValue`] marker, so the wire shape stays rectangular.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedArrayBridge;

impl FixedArrayBridge {
    pub const fn new() -> Self {
        FixedArrayBridge
    }
}

impl Bridge for FixedArrayBridge {
    type Source = Value;

    fn scalar<'a>(&self, source: &'a Value) -> Cow<'a, Value> {
        Cow::Borrowed(source)
    }

    fn items(&self, source: &Value) -> Result<Vec<Value>> {
        match source {
            v if v.is_marker() => Ok(Vec::new()),
            Value::Array(items) => Ok(items.clone()),
            other => Err(MarshalError::conversion(other.kind(), TargetType::Sequence)),
        }
    }

    fn rows(&self, source: &Value) -> Result<Vec<Vec<Value>>> {
        match source {
            v if v.is_marker() => Ok(Vec::new()),
            Value::Array2(rows) => {
                check_cells(rows)?;
                Ok(rows.clone())
            }
            other => Err(MarshalError::conversion(other.kind(), TargetType::Sequence2)),
        }
    }

    fn absent(&self) -> Value {
        Value::NoValue
    }

    fn missing(&self) -> Value {
        Value::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use gridbridge_engine::engine::{ValueGrid, ValueKind};

    fn d(n: f64) -> Value {
        Value::Double(n)
    }

    #[test]
    fn test_null_source_gives_empty_results() {
        let bridge = FixedArrayBridge::new();
        for source in [Value::Null, Value::NoValue, Value::Missing] {
            assert!(bridge.to_1d::<f64>(&source).unwrap().is_empty());
            assert!(bridge.to_list::<i32>(&source).unwrap().is_empty());
            assert!(bridge.to_2d::<f64>(&source).unwrap().is_empty());
            let grid = bridge.to_grid(&source).unwrap();
            assert_eq!((grid.rows(), grid.cols()), (0, 0));
        }
    }

    #[test]
    fn test_shape_mismatch_is_conversion_error() {
        let bridge = FixedArrayBridge::new();
        assert_eq!(
            bridge.to_1d::<f64>(&d(1.0)).unwrap_err(),
            MarshalError::conversion(ValueKind::Double, TargetType::Sequence)
        );
        assert_eq!(
            bridge.to_2d::<f64>(&Value::Array(vec![d(1.0)])).unwrap_err(),
            MarshalError::conversion(ValueKind::Array, TargetType::Sequence2)
        );
        assert!(bridge.to_grid(&Value::Str("A1".to_string())).is_err());
        assert!(bridge.to_1d::<f64>(&Value::Array2(vec![vec![d(1.0)]])).is_err());
    }

    #[test]
    fn test_to_1d_converts_each_element() {
        let bridge = FixedArrayBridge::new();
        let source = Value::Array(vec![d(1.5), Value::Null, Value::Str("7".to_string())]);
        assert_eq!(&*bridge.to_1d::<i32>(&source).unwrap(), &[2, 0, 7]);
        assert!(bridge
            .to_1d::<i32>(&Value::Array(vec![Value::Str("x".to_string())]))
            .is_err());
    }

    #[test]
    fn test_to_2d_pads_ragged_rows_with_zero() {
        let bridge = FixedArrayBridge::new();
        let source = Value::Array2(vec![vec![d(1.0)], vec![d(2.0), d(3.0), d(4.0)]]);
        assert_eq!(
            bridge.to_2d::<f64>(&source).unwrap(),
            vec![vec![1.0, 0.0, 0.0], vec![2.0, 3.0, 4.0]]
        );
        let strings = bridge.to_2d::<String>(&source).unwrap();
        assert_eq!(strings[0], vec!["1".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn test_to_grid_pads_with_empty_marker() {
        let bridge = FixedArrayBridge::new();
        let source = Value::Array2(vec![vec![d(1.0), d(2.0), d(3.0)], vec![d(4.0)]]);
        let grid = bridge.to_grid(&source).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (2, 3));
        assert_eq!(grid.get(1, 2).unwrap(), &Value::EMPTY);
    }

    #[test]
    fn test_rank_above_two_is_dimension_error() {
        let bridge = FixedArrayBridge::new();
        let source = Value::Array2(vec![vec![Value::Array(vec![d(1.0)])]]);
        assert_eq!(
            bridge.to_grid(&source).unwrap_err(),
            MarshalError::Dimension { rank: 3 }
        );
        assert!(bridge.to_2d::<Value>(&source).is_err());
    }

    #[test]
    fn test_to_date() {
        let bridge = FixedArrayBridge::new();
        let expected = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(bridge.to_date(&d(44197.0)).unwrap(), expected);
        assert_eq!(bridge.to_date(&Value::DateTime(expected)).unwrap(), expected);
        assert_eq!(
            bridge.to_date(&Value::Null).unwrap_err(),
            MarshalError::conversion(ValueKind::Null, TargetType::DateTime)
        );
        assert!(bridge.to_date(&Value::Missing).is_err());
        assert!(bridge.to_date(&Value::Bool(true)).is_err());
    }

    #[test]
    fn test_unwrap_optional_int_for_every_empty_form() {
        let bridge = FixedArrayBridge::new();
        let empties = [
            Value::Null,
            Value::NoValue,
            Value::Missing,
            Value::Str(String::new()),
            Value::Array(vec![]),
            Value::Array(vec![Value::Missing]),
            Value::Array2(vec![vec![Value::Null]]),
            Value::Array2(vec![]),
        ];
        for empty in &empties {
            assert_eq!(bridge.unwrap_optional_int(empty, 42).unwrap(), 42);
            assert_eq!(bridge.unwrap_nullable_int(empty).unwrap(), None);
        }
        assert_eq!(bridge.unwrap_optional_int(&d(0.0), 42).unwrap(), 0);
        assert_eq!(bridge.unwrap_nullable_int(&d(2.5)).unwrap(), Some(2));
        assert!(!bridge.unwrap_optional_bool(&Value::Bool(false), true).unwrap());
    }

    #[test]
    fn test_unwrap_collections() {
        let bridge = FixedArrayBridge::new();
        let fallback: Box<[f64]> = vec![9.0].into_boxed_slice();
        assert_eq!(
            &*bridge
                .unwrap_optional_1d(&Value::Array(vec![Value::Null]), fallback.clone())
                .unwrap(),
            &[9.0]
        );
        assert_eq!(
            &*bridge
                .unwrap_optional_1d(&Value::Array(vec![d(1.0), d(2.0)]), fallback)
                .unwrap(),
            &[1.0, 2.0]
        );
        assert!(bridge
            .unwrap_nullable_grid(&Value::Array2(vec![vec![Value::Missing]]))
            .unwrap()
            .is_none());
        assert_eq!(
            bridge
                .unwrap_nullable_list::<i64>(&Value::Array(vec![d(3.0), d(4.0)]))
                .unwrap(),
            Some(vec![3, 4])
        );
        assert_eq!(
            bridge
                .unwrap_optional_2d::<i32>(&Value::Null, vec![vec![1]])
                .unwrap(),
            vec![vec![1]]
        );
    }

    #[test]
    fn test_output_boxes_absent_elements() {
        let bridge = FixedArrayBridge::new();
        let out = bridge.to_wire_array(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(out, Value::Array(vec![d(1.0), Value::NoValue, d(3.0)]));

        let rows: Vec<Vec<Option<i32>>> = vec![vec![Some(1), None], vec![Some(3)]];
        assert_eq!(
            bridge.to_wire_grid(&rows),
            Value::Array2(vec![
                vec![Value::Int(1), Value::NoValue],
                vec![Value::Int(3), Value::NoValue],
            ])
        );
    }

    #[test]
    fn test_grid_to_wire_boxes_every_marker() {
        let grid = ValueGrid::from_ragged(vec![
            vec![Value::Int(1), Value::Missing, Value::NoValue],
            vec![Value::Str(String::new())],
        ]);
        assert_eq!(
            FixedArrayBridge::new().grid_to_wire(&grid),
            Value::Array2(vec![
                vec![Value::Int(1), Value::NoValue, Value::NoValue],
                vec![Value::Str(String::new()), Value::NoValue, Value::NoValue],
            ])
        );
    }

    #[test]
    fn test_output_encodes_dates_as_serials() {
        let bridge = FixedArrayBridge::new();
        let dt = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(
            bridge.to_wire_array(&[dt]),
            Value::Array(vec![d(44197.5)])
        );
    }
}
