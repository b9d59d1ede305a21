//! gridbridge-core - conversion bridges and table-driven parameter plans.

pub mod bridge;
pub mod dynamic;
pub mod error;
pub mod plan;

pub use bridge::{Bridge, Enumerable, FixedArrayBridge, IterableBridge};
pub use error::{BridgeError, Result};
pub use plan::{FunctionPlan, ParamMode, ParameterPlan, PlanRegistry, ScalarType, WireType};

pub use gridbridge_engine::engine::{Value, ValueGrid};
pub use gridbridge_engine::MarshalError;
pub use rhai::Dynamic;
