use directories::ProjectDirs;
use std::path::PathBuf;

use gridbridge_core::{PlanRegistry, Result};

/// `<config dir>/gridbridge/functions.toml`, when a home directory exists.
pub fn default_manifest_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridbridge")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("functions.toml");
    Some(path)
}

/// Registry loaded from the default manifest. Empty when there is no
/// manifest; a manifest that fails to parse is an error.
pub fn load_default_registry() -> Result<PlanRegistry> {
    let Some(path) = default_manifest_path() else {
        return Ok(PlanRegistry::new());
    };
    if path.is_file() {
        PlanRegistry::from_manifest_file(&path)
    } else {
        tracing::debug!(path = %path.display(), "no default function manifest");
        Ok(PlanRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::default_manifest_path;

    #[test]
    fn default_manifest_path_is_deterministic() {
        // Should never panic and should either be Some(path) or None.
        assert_eq!(default_manifest_path(), default_manifest_path());
    }
}
