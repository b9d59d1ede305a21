//! Value marshalling engine API.
//!
//! The pieces every bridge shares:
//!
//! - [`Value`], [`ValueKind`] - The untyped value crossing the boundary
//! - [`EmptinessClassifier`], [`is_empty`] - "No value supplied" detection
//! - [`ScalarConverter`], [`FromValue`], [`ToValue`] - Scalar conversion rules
//! - [`from_oa_date`], [`to_oa_date`] - OLE Automation date codec
//! - [`ValueGrid`] - Rectangular grid normalizing ragged input

mod convert;
mod date;
mod empty;
mod grid;
mod value;

pub use convert::{
    FromValue, SCALAR_CONVERTER, Scalar, ScalarConverter, TargetType, ToValue, convert,
};
pub use date::{MAX_SERIAL, MIN_SERIAL, from_oa_date, ole_epoch, to_oa_date};
pub use empty::{EmptinessClassifier, Emptiness, is_empty};
pub use grid::ValueGrid;
pub use value::{Value, ValueKind};

pub use chrono::NaiveDateTime;
