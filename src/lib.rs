//! gridbridge - spreadsheet value marshalling.
//!
//! Converts untyped spreadsheet cell values into typed host values and back.
//! The value model, emptiness rules, scalar conversion and grids live in
//! [`engine`]; bridges, parameter plans and function manifests come from
//! `gridbridge-core` and are re-exported here.

mod default_manifest;

pub use default_manifest::{default_manifest_path, load_default_registry};

pub use gridbridge_core::bridge::{Bridge, Enumerable, FixedArrayBridge, IterableBridge};
pub use gridbridge_core::dynamic::{value_from_dynamic, value_to_dynamic};
pub use gridbridge_core::plan::{
    FunctionPlan, MAX_MANIFEST_BYTES, ParamMode, ParameterPlan, PlanRegistry, ScalarType, WireType,
    load_manifest, parse_manifest,
};
pub use gridbridge_core::{BridgeError, Dynamic, Result};
pub use gridbridge_engine::MarshalError;
pub use gridbridge_engine::engine;
