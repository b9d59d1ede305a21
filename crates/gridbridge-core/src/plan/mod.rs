//! Table-driven parameter plans.
//!
//! A [`ParameterPlan`] is computed once from a declared parameter (its wire
//! type plus whether it is required, optional with a default, or nullable).
//! At call time the plan picks the conversion; the bridges never need to
//! know which kind of parameter they are serving.

mod manifest;
mod registry;
mod wire_type;

pub use manifest::{MAX_MANIFEST_BYTES, load_manifest, parse_manifest};
pub use registry::PlanRegistry;
pub use wire_type::{ScalarType, WireType};

use gridbridge_engine::engine::Value;

use crate::bridge::{Bridge, FixedArrayBridge};
use crate::error::{BridgeError, Result};

/// How an empty argument is handled.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamMode {
    /// Converted as-is; an empty argument takes the type's zero value.
    Required,
    /// An empty argument takes this (already typed) default.
    Optional(Value),
    /// An empty argument becomes [`Value::NoValue`].
    Nullable,
}

/// Conversion plan for one declared parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterPlan {
    pub name: String,
    pub ty: WireType,
    pub mode: ParamMode,
}

impl ParameterPlan {
    pub fn required(name: &str, ty: WireType) -> ParameterPlan {
        ParameterPlan {
            name: name.to_string(),
            ty,
            mode: ParamMode::Required,
        }
    }

    pub fn nullable(name: &str, ty: WireType) -> ParameterPlan {
        ParameterPlan {
            name: name.to_string(),
            ty,
            mode: ParamMode::Nullable,
        }
    }

    /// An optional parameter. The default is converted to `ty` up front so
    /// a bad default fails when the plan is built, not when it is used.
    pub fn optional(name: &str, ty: WireType, default: Value) -> Result<ParameterPlan> {
        let typed = ty
            .marshal(&FixedArrayBridge::new(), &default)
            .map_err(|e| BridgeError::InvalidDefault {
                param: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(ParameterPlan {
            name: name.to_string(),
            ty,
            mode: ParamMode::Optional(typed),
        })
    }

    /// Convert one argument according to this plan.
    pub fn apply<B: Bridge>(
        &self,
        bridge: &B,
        source: &B::Source,
    ) -> gridbridge_engine::Result<Value> {
        match &self.mode {
            ParamMode::Optional(default) if bridge.is_empty(source) => Ok(default.clone()),
            ParamMode::Nullable if bridge.is_empty(source) => Ok(Value::NoValue),
            _ => self.ty.marshal(bridge, source),
        }
    }
}

/// Plans for every parameter of one function.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionPlan {
    pub name: String,
    pub description: Option<String>,
    pub params: Vec<ParameterPlan>,
}

impl FunctionPlan {
    pub fn new(name: &str, params: Vec<ParameterPlan>) -> FunctionPlan {
        FunctionPlan {
            name: name.to_string(),
            description: None,
            params,
        }
    }

    /// Convert a call's arguments. Omitted trailing arguments read as the
    /// bridge's missing source; surplus arguments are an error.
    pub fn marshal<B: Bridge>(&self, bridge: &B, args: &[B::Source]) -> Result<Vec<Value>> {
        if args.len() > self.params.len() {
            return Err(BridgeError::Arity {
                function: self.name.clone(),
                expected: self.params.len(),
                got: args.len(),
            });
        }
        let missing = bridge.missing();
        self.params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let arg = args.get(i).unwrap_or(&missing);
                param.apply(bridge, arg).map_err(|source| BridgeError::Argument {
                    function: self.name.clone(),
                    param: param.name.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::IterableBridge;
    use gridbridge_engine::MarshalError;

    fn double() -> WireType {
        WireType::Scalar(ScalarType::Double)
    }

    #[test]
    fn test_required_empty_takes_zero() {
        let plan = ParameterPlan::required("x", double());
        let bridge = FixedArrayBridge::new();
        assert_eq!(plan.apply(&bridge, &Value::Missing).unwrap(), Value::Double(0.0));
        assert_eq!(plan.apply(&bridge, &Value::Int(3)).unwrap(), Value::Double(3.0));
    }

    #[test]
    fn test_optional_uses_typed_default() {
        let plan =
            ParameterPlan::optional("n", WireType::Scalar(ScalarType::Int32), Value::Long(42))
                .unwrap();
        assert_eq!(plan.mode, ParamMode::Optional(Value::Int(42)));
        let bridge = FixedArrayBridge::new();
        assert_eq!(
            plan.apply(&bridge, &Value::Array2(vec![vec![Value::Null]])).unwrap(),
            Value::Int(42)
        );
        assert_eq!(plan.apply(&bridge, &Value::Double(0.0)).unwrap(), Value::Int(0));
    }

    #[test]
    fn test_optional_rejects_bad_default() {
        let err = ParameterPlan::optional(
            "n",
            WireType::Scalar(ScalarType::Int32),
            Value::Str("abc".into()),
        )
        .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidDefault { ref param, .. } if param == "n"));
    }

    #[test]
    fn test_nullable_empty_is_no_value() {
        let plan = ParameterPlan::nullable("s", WireType::Scalar(ScalarType::String));
        let bridge = IterableBridge::<Value>::new();
        assert_eq!(plan.apply(&bridge, &Value::Str(String::new())).unwrap(), Value::NoValue);
        assert_eq!(plan.apply(&bridge, &Value::Int(5)).unwrap(), Value::Str("5".to_string()));
    }

    #[test]
    fn test_function_marshal_fills_missing_and_checks_arity() {
        let plan = FunctionPlan::new(
            "ADDDAYS",
            vec![
                ParameterPlan::required("start", double()),
                ParameterPlan::optional("days", WireType::Scalar(ScalarType::Int32), Value::Long(1))
                    .unwrap(),
            ],
        );
        let bridge = FixedArrayBridge::new();
        assert_eq!(
            plan.marshal(&bridge, &[Value::Double(44197.0)]).unwrap(),
            vec![Value::Double(44197.0), Value::Int(1)]
        );
        assert!(matches!(
            plan.marshal(&bridge, &[Value::Null, Value::Null, Value::Null]),
            Err(BridgeError::Arity { expected: 2, got: 3, .. })
        ));
        let err = plan
            .marshal(&bridge, &[Value::Str("soon".to_string())])
            .unwrap_err();
        match err {
            BridgeError::Argument { param, source, .. } => {
                assert_eq!(param, "start");
                assert!(matches!(source, MarshalError::Conversion { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
