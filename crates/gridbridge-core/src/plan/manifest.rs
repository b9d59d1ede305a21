//! Function manifests.
//!
//! A manifest is a TOML file declaring functions and their parameters:
//!
//! ```toml
//! [[function]]
//! name = "ADDDAYS"
//!
//! [[function.param]]
//! name = "start"
//! type = "double"
//!
//! [[function.param]]
//! name = "days"
//! type = "int32"
//! default = 1
//! ```
//!
//! `default` makes a parameter optional, `nullable = true` makes it
//! nullable, neither makes it required.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use gridbridge_engine::engine::Value;

use super::{FunctionPlan, ParameterPlan, WireType};
use crate::error::{BridgeError, Result};

pub const MAX_MANIFEST_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default, rename = "function")]
    functions: Vec<FunctionEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionEntry {
    name: String,
    description: Option<String>,
    #[serde(default, rename = "param")]
    params: Vec<ParamEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamEntry {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    default: Option<toml::Value>,
    #[serde(default)]
    nullable: bool,
}

/// Parse manifest text into function plans.
///
/// A function declared twice keeps its first declaration.
pub fn parse_manifest(content: &str) -> Result<Vec<FunctionPlan>> {
    let file: ManifestFile = toml::from_str(content)?;
    let mut seen = HashSet::new();
    let mut plans = Vec::with_capacity(file.functions.len());

    for entry in file.functions {
        if !seen.insert(entry.name.to_ascii_uppercase()) {
            tracing::warn!(function = %entry.name, "duplicate function in manifest, skipping");
            continue;
        }
        let params = entry
            .params
            .iter()
            .map(build_param)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(function = %entry.name, params = params.len(), "planned function");
        plans.push(FunctionPlan {
            name: entry.name,
            description: entry.description,
            params,
        });
    }
    Ok(plans)
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<Vec<FunctionPlan>> {
    let size = std::fs::metadata(path)?.len();
    if size > MAX_MANIFEST_BYTES {
        return Err(BridgeError::ManifestTooLarge {
            path: path.display().to_string(),
            size,
            max: MAX_MANIFEST_BYTES,
        });
    }
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading function manifest");
    parse_manifest(&content)
}

fn build_param(entry: &ParamEntry) -> Result<ParameterPlan> {
    let ty: WireType = entry.ty.parse()?;
    match (&entry.default, entry.nullable) {
        (Some(_), true) => Err(BridgeError::InvalidDefault {
            param: entry.name.clone(),
            message: "a parameter cannot be both nullable and have a default".to_string(),
        }),
        (Some(default), false) => {
            let default = toml_to_value(default).ok_or_else(|| BridgeError::InvalidDefault {
                param: entry.name.clone(),
                message: "tables are not valid defaults".to_string(),
            })?;
            ParameterPlan::optional(&entry.name, ty, default)
        }
        (None, true) => Ok(ParameterPlan::nullable(&entry.name, ty)),
        (None, false) => Ok(ParameterPlan::required(&entry.name, ty)),
    }
}

/// An array of arrays becomes a 2-D sequence. Dates stay text and are
/// parsed by the date conversion.
fn toml_to_value(value: &toml::Value) -> Option<Value> {
    let v = match value {
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Integer(n) => Value::Long(*n),
        toml::Value::Float(n) => Value::Double(*n),
        toml::Value::String(s) => Value::Str(s.clone()),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items)
            if !items.is_empty() && items.iter().all(toml::Value::is_array) =>
        {
            let rows = items
                .iter()
                .map(|row| match row {
                    toml::Value::Array(cells) => cells.iter().map(toml_to_value).collect(),
                    _ => None,
                })
                .collect::<Option<Vec<Vec<Value>>>>()?;
            Value::Array2(rows)
        }
        toml::Value::Array(items) => {
            Value::Array(items.iter().map(toml_to_value).collect::<Option<Vec<_>>>()?)
        }
        toml::Value::Table(_) => return None,
    };
    Some(v)
}
