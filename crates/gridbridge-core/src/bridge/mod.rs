//! Conversion bridges.
//!
//! Both bridges share one [`ScalarConverter`] and one emptiness classifier
//! through the provided methods of [`Bridge`]. An implementation only says:
//!
//! - how it reads a 1-D or 2-D source ([`Bridge::items`], [`Bridge::rows`])
//! - what a logical null element becomes on output ([`Bridge::absent`])
//! - what an omitted argument looks like on input ([`Bridge::missing`])
//!
//! [`FixedArrayBridge`] accepts the canonical wire arrays and boxes absent
//! output elements. [`IterableBridge`] accepts anything [`Enumerable`] and
//! writes absent output elements as a literal null.

mod fixed;
mod iterable;

use std::borrow::Cow;

use gridbridge_engine::engine::{
    Emptiness, FromValue, NaiveDateTime, SCALAR_CONVERTER, Scalar, ScalarConverter, TargetType,
    ToValue, Value, ValueGrid,
};
use gridbridge_engine::{MarshalError, Result};

pub use fixed::FixedArrayBridge;
pub use iterable::{Enumerable, IterableBridge};

/// Generates the named optional/nullable pair for one primitive family.
macro_rules! family_unwraps {
    ($($optional:ident, $nullable:ident => $ty:ty;)*) => {
        $(
            fn $optional(&self, source: &Self::Source, default: $ty) -> Result<$ty> {
                self.unwrap_optional(source, default)
            }

            fn $nullable(&self, source: &Self::Source) -> Result<Option<$ty>> {
                self.unwrap_nullable(source)
            }
        )*
    };
}

/// A conversion bridge between host values and the untyped wire model.
pub trait Bridge {
    /// Host-side input this bridge accepts.
    type Source;

    /// Scalar view of a source.
    fn scalar<'a>(&self, source: &'a Self::Source) -> Cow<'a, Value>;

    /// Items of a 1-D source. A null source has no items.
    fn items(&self, source: &Self::Source) -> Result<Vec<Value>>;

    /// Rows of a 2-D source, possibly ragged. A null source has no rows.
    fn rows(&self, source: &Self::Source) -> Result<Vec<Vec<Value>>>;

    /// Output form of a logical null element.
    fn absent(&self) -> Value;

    /// Source standing in for an omitted argument.
    fn missing(&self) -> Self::Source;

    /// The shared converter. Bridges never carry their own.
    fn converter(&self) -> &'static ScalarConverter {
        &SCALAR_CONVERTER
    }

    fn classify(&self, source: &Self::Source) -> Emptiness {
        self.converter().classifier().classify(&self.scalar(source))
    }

    fn is_empty(&self, source: &Self::Source) -> bool {
        self.classify(source).is_empty()
    }

    /// Convert a scalar source. An empty source yields `T::zero()`.
    fn convert<T: FromValue>(&self, source: &Self::Source) -> Result<T> {
        self.converter().convert(&self.scalar(source))
    }

    /// Typed array. A null source gives an empty array.
    fn to_1d<T: FromValue>(&self, source: &Self::Source) -> Result<Box<[T]>> {
        self.to_list(source).map(Vec::into_boxed_slice)
    }

    /// Typed list. A null source gives an empty list.
    fn to_list<T: FromValue>(&self, source: &Self::Source) -> Result<Vec<T>> {
        let converter = self.converter();
        self.items(source)?
            .iter()
            .map(|item| converter.convert(item))
            .collect()
    }

    /// Typed rectangular rows. Ragged input is widened to the longest row
    /// and missing cells take `T::zero()`.
    fn to_2d<T: FromValue>(&self, source: &Self::Source) -> Result<Vec<Vec<T>>> {
        let rows = self.rows(source)?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let converter = self.converter();
        rows.iter()
            .map(|row| {
                let mut out = row
                    .iter()
                    .map(|cell| converter.convert(cell))
                    .collect::<Result<Vec<T>>>()?;
                out.resize_with(width, T::zero);
                Ok(out)
            })
            .collect()
    }

    /// Untyped grid. A null source gives a 0x0 grid.
    fn to_grid(&self, source: &Self::Source) -> Result<ValueGrid> {
        Ok(ValueGrid::from_ragged(self.rows(source)?))
    }

    /// Date from an OLE serial or a date-time. There is no empty date, so an
    /// empty source is an error here.
    fn to_date(&self, source: &Self::Source) -> Result<NaiveDateTime> {
        let value = self.scalar(source);
        if self.converter().classifier().is_empty(&value) {
            return Err(MarshalError::conversion(value.kind(), TargetType::DateTime));
        }
        self.converter().convert(&value)
    }

    /// `default` when the source is empty, otherwise the converted value.
    fn unwrap_optional<T: FromValue>(&self, source: &Self::Source, default: T) -> Result<T> {
        if self.is_empty(source) {
            return Ok(default);
        }
        self.convert(source)
    }

    /// `None` when the source is empty, otherwise the converted value.
    fn unwrap_nullable<T: Scalar>(&self, source: &Self::Source) -> Result<Option<T>> {
        if self.is_empty(source) {
            return Ok(None);
        }
        self.convert::<T>(source).map(Some)
    }

    family_unwraps! {
        unwrap_optional_bool, unwrap_nullable_bool => bool;
        unwrap_optional_byte, unwrap_nullable_byte => u8;
        unwrap_optional_short, unwrap_nullable_short => i16;
        unwrap_optional_int, unwrap_nullable_int => i32;
        unwrap_optional_long, unwrap_nullable_long => i64;
        unwrap_optional_float, unwrap_nullable_float => f32;
        unwrap_optional_double, unwrap_nullable_double => f64;
        unwrap_optional_char, unwrap_nullable_char => char;
        unwrap_optional_string, unwrap_nullable_string => String;
        unwrap_optional_date, unwrap_nullable_date => NaiveDateTime;
        unwrap_optional_any, unwrap_nullable_any => Value;
    }

    fn unwrap_optional_1d<T: FromValue>(
        &self,
        source: &Self::Source,
        default: Box<[T]>,
    ) -> Result<Box<[T]>> {
        if self.is_empty(source) {
            return Ok(default);
        }
        self.to_1d(source)
    }

    fn unwrap_nullable_1d<T: FromValue>(&self, source: &Self::Source) -> Result<Option<Box<[T]>>> {
        if self.is_empty(source) {
            return Ok(None);
        }
        self.to_1d(source).map(Some)
    }

    fn unwrap_optional_list<T: FromValue>(
        &self,
        source: &Self::Source,
        default: Vec<T>,
    ) -> Result<Vec<T>> {
        if self.is_empty(source) {
            return Ok(default);
        }
        self.to_list(source)
    }

    fn unwrap_nullable_list<T: FromValue>(&self, source: &Self::Source) -> Result<Option<Vec<T>>> {
        if self.is_empty(source) {
            return Ok(None);
        }
        self.to_list(source).map(Some)
    }

    fn unwrap_optional_2d<T: FromValue>(
        &self,
        source: &Self::Source,
        default: Vec<Vec<T>>,
    ) -> Result<Vec<Vec<T>>> {
        if self.is_empty(source) {
            return Ok(default);
        }
        self.to_2d(source)
    }

    fn unwrap_nullable_2d<T: FromValue>(
        &self,
        source: &Self::Source,
    ) -> Result<Option<Vec<Vec<T>>>> {
        if self.is_empty(source) {
            return Ok(None);
        }
        self.to_2d(source).map(Some)
    }

    fn unwrap_optional_grid(&self, source: &Self::Source, default: ValueGrid) -> Result<ValueGrid> {
        if self.is_empty(source) {
            return Ok(default);
        }
        self.to_grid(source)
    }

    fn unwrap_nullable_grid(&self, source: &Self::Source) -> Result<Option<ValueGrid>> {
        if self.is_empty(source) {
            return Ok(None);
        }
        self.to_grid(source).map(Some)
    }

    /// Box host elements into a wire sequence, one output cell per element.
    fn to_wire_array<T: ToValue>(&self, items: &[T]) -> Value {
        Value::Array(items.iter().map(|item| self.wire_cell(item)).collect())
    }

    /// Box host rows into a rectangular wire grid. Short rows are padded
    /// with the absent form.
    fn to_wire_grid<T: ToValue, R: AsRef<[T]>>(&self, rows: &[R]) -> Value {
        let width = rows.iter().map(|row| row.as_ref().len()).max().unwrap_or(0);
        Value::Array2(
            rows.iter()
                .map(|row| {
                    let mut out: Vec<Value> =
                        row.as_ref().iter().map(|item| self.wire_cell(item)).collect();
                    out.resize_with(width, || self.absent());
                    out
                })
                .collect(),
        )
    }

    /// Box a grid; empty cells take the absent form.
    fn grid_to_wire(&self, grid: &ValueGrid) -> Value {
        self.to_wire_grid(&grid.to_ragged())
    }

    fn wire_cell<T: ToValue>(&self, item: &T) -> Value {
        item.to_value().unwrap_or_else(|| self.absent())
    }
}

/// Cells of a 2-D source must be scalars.
pub(crate) fn check_cells(rows: &[Vec<Value>]) -> Result<()> {
    for cell in rows.iter().flatten() {
        if cell.is_collection() {
            return Err(MarshalError::Dimension {
                rank: 2 + cell.rank(),
            });
        }
    }
    Ok(())
}
