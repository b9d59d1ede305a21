//! Error types for the marshalling engine.

use thiserror::Error;

use crate::engine::{TargetType, ValueKind};

/// Errors raised while converting values across the boundary.
///
/// Every error is local to the argument or cell being converted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("cannot convert {source_kind} to {target}")]
    Conversion {
        source_kind: ValueKind,
        target: TargetType,
    },

    #[error("unsupported array rank {rank} (at most 2 dimensions)")]
    Dimension { rank: usize },

    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    Bounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("buffer of {len} values cannot form a {rows}x{cols} grid")]
    Shape { len: usize, rows: usize, cols: usize },
}

impl MarshalError {
    pub fn conversion(source_kind: ValueKind, target: TargetType) -> Self {
        MarshalError::Conversion {
            source_kind,
            target,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarshalError>;
