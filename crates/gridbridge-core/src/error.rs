//! Error types for Gridbridge core.

use thiserror::Error;

use gridbridge_engine::MarshalError;

/// Errors raised by bridges, plans and manifest loading.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Manifest parse error: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("Refusing to read {path}: file too large ({size} bytes, max {max})")]
    ManifestTooLarge { path: String, size: u64, max: u64 },

    #[error("Unknown wire type: {tag}")]
    UnknownType { tag: String },

    #[error("Invalid default for parameter '{param}': {message}")]
    InvalidDefault { param: String, message: String },

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{function} takes at most {expected} arguments, got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("{function}: argument '{param}': {source}")]
    Argument {
        function: String,
        param: String,
        #[source]
        source: MarshalError,
    },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
