//! Concurrent table of function plans.

use dashmap::DashMap;
use std::path::Path;
use std::sync::Arc;

use gridbridge_engine::engine::Value;

use super::{FunctionPlan, load_manifest, parse_manifest};
use crate::bridge::Bridge;
use crate::error::{BridgeError, Result};

/// Function plans keyed by upper-cased name.
///
/// Plans are immutable once registered, so calculation threads can look
/// them up and marshal arguments without further locking. Clones share the
/// same table.
#[derive(Clone, Debug, Default)]
pub struct PlanRegistry {
    plans: Arc<DashMap<String, Arc<FunctionPlan>>>,
}

impl PlanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every function in a manifest file.
    pub fn from_manifest_file(path: &Path) -> Result<Self> {
        let registry = Self::new();
        registry.extend(load_manifest(path)?);
        Ok(registry)
    }

    /// A registry holding every function in manifest text.
    pub fn from_manifest_str(content: &str) -> Result<Self> {
        let registry = Self::new();
        registry.extend(parse_manifest(content)?);
        Ok(registry)
    }

    /// Register a plan, returning the plan it replaced.
    pub fn register(&self, plan: FunctionPlan) -> Option<Arc<FunctionPlan>> {
        let key = plan.name.to_ascii_uppercase();
        tracing::debug!(function = %plan.name, "registering function plan");
        self.plans.insert(key, Arc::new(plan))
    }

    pub fn extend(&self, plans: impl IntoIterator<Item = FunctionPlan>) {
        for plan in plans {
            self.register(plan);
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<FunctionPlan>> {
        self.plans
            .get(&name.to_ascii_uppercase())
            .map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<FunctionPlan>> {
        self.plans
            .remove(&name.to_ascii_uppercase())
            .map(|(_, plan)| plan)
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plans.iter().map(|e| e.value().name.clone()).collect();
        names.sort();
        names
    }

    /// Marshal a call's arguments through the named function's plan.
    pub fn marshal_args<B: Bridge>(
        &self,
        bridge: &B,
        name: &str,
        args: &[B::Source],
    ) -> Result<Vec<Value>> {
        let plan = self
            .get(name)
            .ok_or_else(|| BridgeError::UnknownFunction(name.to_string()))?;
        plan.marshal(bridge, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::FixedArrayBridge;
    use crate::plan::{ParameterPlan, ScalarType, WireType};
    use std::thread;

    fn sum_plan() -> FunctionPlan {
        FunctionPlan::new(
            "Sum",
            vec![ParameterPlan::required(
                "values",
                WireType::Sequence(ScalarType::Double),
            )],
        )
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = PlanRegistry::new();
        assert!(registry.register(sum_plan()).is_none());
        assert!(registry.get("SUM").is_some());
        assert!(registry.get("sum").is_some());
        assert!(registry.register(sum_plan()).is_some());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["Sum".to_string()]);
        assert!(registry.remove("sUm").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unknown_function() {
        let registry = PlanRegistry::new();
        let err = registry
            .marshal_args(&FixedArrayBridge::new(), "NOPE", &[])
            .unwrap_err();
        assert!(matches!(err, BridgeError::UnknownFunction(ref n) if n == "NOPE"));
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = PlanRegistry::new();
        registry.register(sum_plan());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let args = [Value::Array(vec![Value::Int(i), Value::Null])];
                    registry
                        .marshal_args(&FixedArrayBridge::new(), "sum", &args)
                        .unwrap()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let out = handle.join().unwrap();
            assert_eq!(
                out,
                vec![Value::Array(vec![Value::Double(i as f64), Value::Double(0.0)])]
            );
        }
    }

    #[test]
    fn test_from_manifest_str() {
        let registry = PlanRegistry::from_manifest_str(
            r#"
[[function]]
name = "twice"
[[function.param]]
name = "x"
type = "int64"
"#,
        )
        .unwrap();
        let out = registry
            .marshal_args(&FixedArrayBridge::new(), "TWICE", &[Value::Double(3.5)])
            .unwrap();
        assert_eq!(out, vec![Value::Long(4)]);
    }
}
