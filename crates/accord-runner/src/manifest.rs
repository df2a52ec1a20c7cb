//! The run manifest: a frozen snapshot of the configuration that produced a
//! run directory, written once and never updated.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::error::Result;

/// Manifest file name inside the run directory.
pub const MANIFEST_FILE: &str = "run_manifest.json";

/// Frozen description of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// The run id.
    pub run_id: String,
    /// The method label.
    pub method: String,
    /// Unix timestamp in milliseconds at manifest creation.
    pub created_at_ms: u64,
    /// The full configuration snapshot.
    pub config: RunConfig,
}

impl RunManifest {
    /// Build a manifest for the given config, stamped with the current time.
    #[must_use]
    pub fn new(config: &RunConfig) -> Self {
        let created_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            run_id: config.run_id.clone(),
            method: config.method.clone(),
            created_at_ms,
            config: config.clone(),
        }
    }

    /// Write a manifest into `dir` unless one already exists.
    ///
    /// Returns true when a new manifest was written. A resumed run keeps the
    /// original manifest untouched.
    pub fn write_if_absent(dir: &Path, config: &RunConfig) -> Result<bool> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(MANIFEST_FILE);
        if path.exists() {
            return Ok(false);
        }
        let manifest = Self::new(config);
        std::fs::write(&path, serde_json::to_vec_pretty(&manifest)?)?;
        Ok(true)
    }

    /// Load the manifest from `dir`, if present.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_load_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new("r1");

        assert!(RunManifest::write_if_absent(dir.path(), &config).unwrap());
        let manifest = RunManifest::load(dir.path()).unwrap().unwrap();
        assert_eq!(manifest.run_id, "r1");
        assert_eq!(manifest.config, config);
    }

    #[test]
    fn second_write_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::new("r1");

        assert!(RunManifest::write_if_absent(dir.path(), &config).unwrap());
        let original = std::fs::read(dir.path().join(MANIFEST_FILE)).unwrap();

        let mut changed = config.clone();
        changed.max_rounds = 9;
        assert!(!RunManifest::write_if_absent(dir.path(), &changed).unwrap());

        let after = std::fs::read(dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(original, after);
    }

    #[test]
    fn load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(RunManifest::load(dir.path()).unwrap().is_none());
    }
}
