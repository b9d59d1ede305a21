//! gridbridge_engine - value model and scalar marshalling rules.

pub mod engine;
pub mod error;

pub use error::{MarshalError, Result};
