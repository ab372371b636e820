//! Directory-backed load strategies.
//!
//! A dataset `user/name` lives in `<root>/user/name`. The legacy 0.x format is
//! marked by a `meta.json` file; the current format by `dataset.json`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use hub_error::HubError;

use crate::dispatcher::Format;
use crate::strategy::{CurrentLoader, LegacyFailure, LegacyLoader};

pub const LEGACY_META_FILE: &str = "meta.json";
pub const MANIFEST_FILE: &str = "dataset.json";
pub const LEGACY_MODULE: &str = "legacy-v0";

/// A dataset found on disk, with its parsed metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetHandle {
    pub identifier: String,
    pub path: PathBuf,
    pub format: Format,
    pub metadata: serde_json::Value,
}

/// Resolve `identifier` under `root`, rejecting absolute paths and `..`.
fn resolve(root: &Path, identifier: &str) -> Option<PathBuf> {
    let rel = Path::new(identifier);
    if identifier.is_empty()
        || rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(rel))
}

fn read_json(path: &Path) -> Result<serde_json::Value, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Reads datasets stored in the deprecated 0.x layout.
#[derive(Debug, Clone)]
pub struct LocalLegacyLoader {
    root: PathBuf,
}

impl LocalLegacyLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LegacyLoader for LocalLegacyLoader {
    type Dataset = DatasetHandle;

    #[cfg(feature = "legacy-v0")]
    fn load_legacy(&self, identifier: &str) -> Result<DatasetHandle, LegacyFailure> {
        let dir = resolve(&self.root, identifier)
            .filter(|d| d.is_dir())
            .ok_or_else(|| LegacyFailure::NotFound(HubError::dataset_not_found(identifier)))?;

        let meta_path = dir.join(LEGACY_META_FILE);
        if !meta_path.is_file() {
            return Err(LegacyFailure::other(format!(
                "no {LEGACY_META_FILE} in {}",
                dir.display()
            )));
        }
        let metadata = read_json(&meta_path).map_err(LegacyFailure::other)?;
        Ok(DatasetHandle {
            identifier: identifier.to_string(),
            path: dir,
            format: Format::Legacy,
            metadata,
        })
    }

    #[cfg(not(feature = "legacy-v0"))]
    fn load_legacy(&self, _identifier: &str) -> Result<DatasetHandle, LegacyFailure> {
        Err(LegacyFailure::ModuleUnavailable {
            module: LEGACY_MODULE.to_string(),
        })
    }
}

/// Reads datasets in the current layout.
#[derive(Debug, Clone)]
pub struct LocalLoader {
    root: PathBuf,
}

impl LocalLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CurrentLoader for LocalLoader {
    type Dataset = DatasetHandle;

    fn open(&self, identifier: &str) -> Result<DatasetHandle, HubError> {
        let dir = resolve(&self.root, identifier)
            .filter(|d| d.is_dir())
            .ok_or_else(|| HubError::dataset_not_found(identifier))?;

        let manifest = dir.join(MANIFEST_FILE);
        if !manifest.is_file() {
            return Err(HubError::info_not_found(format!(
                "no {MANIFEST_FILE} in {}",
                dir.display()
            )));
        }
        let metadata = read_json(&manifest).map_err(HubError::file_system)?;
        Ok(DatasetHandle {
            identifier: identifier.to_string(),
            path: dir,
            format: Format::Current,
            metadata,
        })
    }
}
