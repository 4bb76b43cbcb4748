//! StorageConfig and resolve_paths for workspace storage.

use crate::config::xdg;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ROOT_DIR: &str = "data";
pub const DEFAULT_STORE_PATH: &str = ".fsindex/store";

fn default_root_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ROOT_DIR)
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Physical root the index maps `"/"` onto (relative to workspace root unless absolute)
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Path to the node store (relative to workspace root unless absolute)
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl StorageConfig {
    /// Resolve `(root_dir, store_path)` to actual filesystem locations.
    ///
    /// The default store path is relocated into the XDG data directory for
    /// the workspace so nothing is written next to user files.
    pub fn resolve_paths(&self, workspace_root: &Path) -> Result<(PathBuf, PathBuf), ApiError> {
        let root_dir = workspace_root.join(&self.root_dir);

        let store_path = if self.store_path == default_store_path() {
            xdg::workspace_data_dir(workspace_root)?.join("store")
        } else {
            workspace_root.join(&self.store_path)
        };

        Ok((root_dir, store_path))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            store_path: default_store_path(),
        }
    }
}
