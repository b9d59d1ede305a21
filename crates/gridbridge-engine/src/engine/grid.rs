//! Rectangular 2-D value container.
//!
//! A [`ValueGrid`] is always rectangular. Ragged input is padded to the
//! widest row with [`Value::EMPTY`]. A grid belongs to the call that built it.

use super::convert::{FromValue, SCALAR_CONVERTER};
use super::value::Value;
use crate::error::{MarshalError, Result};

/// Dense row-major grid of untyped values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueGrid {
    cells: Vec<Value>,
    rows: usize,
    cols: usize,
}

impl ValueGrid {
    /// A `rows x cols` grid filled with the Empty marker.
    pub fn new(rows: usize, cols: usize) -> ValueGrid {
        ValueGrid {
            cells: vec![Value::EMPTY; rows * cols],
            rows,
            cols,
        }
    }

    /// Wrap a row-major buffer. The buffer length must be `rows * cols`.
    pub fn from_rectangular(data: Vec<Value>, rows: usize, cols: usize) -> Result<ValueGrid> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MarshalError::Shape {
                len: data.len(),
                rows,
                cols,
            });
        }
        Ok(ValueGrid {
            cells: data,
            rows,
            cols,
        })
    }

    /// Build from rows of unequal length. The width is the longest row;
    /// shorter rows are right-padded with the Empty marker.
    pub fn from_ragged(rows: Vec<Vec<Value>>) -> ValueGrid {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for mut row in rows {
            row.resize(cols, Value::EMPTY);
            cells.extend(row);
        }
        ValueGrid {
            cells,
            rows: row_count,
            cols,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(self.out_of_bounds(row, col))
        }
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> MarshalError {
        MarshalError::Bounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Value> {
        let idx = self.index(row, col)?;
        Ok(&self.cells[idx])
    }

    pub fn set(&mut self, row: usize, col: usize, value: Value) -> Result<()> {
        let idx = self.index(row, col)?;
        self.cells[idx] = value;
        Ok(())
    }

    /// Typed cell read.
    ///
    /// A cell that cannot convert to `T` reads as `T::zero()`; only an
    /// out-of-range index is an error.
    pub fn get_as<T: FromValue>(&self, row: usize, col: usize) -> Result<T> {
        let value = self.get(row, col)?;
        match SCALAR_CONVERTER.convert::<T>(value) {
            Ok(v) => Ok(v),
            Err(err) => {
                tracing::trace!(row, col, %err, "cell conversion failed, reading zero value");
                Ok(T::zero())
            }
        }
    }

    /// Copy of row `i`.
    pub fn row(&self, i: usize) -> Result<Vec<Value>> {
        if i >= self.rows {
            return Err(self.out_of_bounds(i, 0));
        }
        let start = i * self.cols;
        Ok(self.cells[start..start + self.cols].to_vec())
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Result<Vec<Value>> {
        if j >= self.cols {
            return Err(self.out_of_bounds(0, j));
        }
        Ok(self
            .cells
            .iter()
            .skip(j)
            .step_by(self.cols)
            .cloned()
            .collect())
    }

    /// Row-major iteration. Each call starts from the first cell.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.cells.iter()
    }

    /// Row-major copy of every cell.
    pub fn flatten(&self) -> Vec<Value> {
        self.cells.clone()
    }

    /// Rows of values in wire order; the inverse of [`ValueGrid::from_ragged`].
    pub fn to_ragged(&self) -> Vec<Vec<Value>> {
        if self.cols == 0 {
            return vec![Vec::new(); self.rows];
        }
        self.cells.chunks(self.cols).map(<[Value]>::to_vec).collect()
    }

    pub fn into_value(self) -> Value {
        Value::Array2(self.to_ragged())
    }
}

impl<'a> IntoIterator for &'a ValueGrid {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
