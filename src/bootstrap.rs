//! Bootstrap
//!
//! Prepares a fresh deployment: the physical root directory and the root
//! record must both exist before the index serves any request. The index
//! itself never seeds anything.

use crate::error::ApiError;
use crate::index::builder::root_node;
use crate::index::ROOT_PATH;
use crate::store::{Node, NodeStore};
use std::path::Path;
use tracing::info;

/// Create the physical root directory if it is missing.
pub fn provision_root_dir(root_dir: &Path) -> Result<(), ApiError> {
    if !root_dir.exists() {
        std::fs::create_dir_all(root_dir).map_err(|e| {
            ApiError::ConfigError(format!(
                "Failed to create root directory {}: {}",
                root_dir.display(),
                e
            ))
        })?;
        info!("Created root directory {}", root_dir.display());
    } else if !root_dir.is_dir() {
        return Err(ApiError::ConfigError(format!(
            "{} exists and is not a directory",
            root_dir.display()
        )));
    }
    Ok(())
}

/// Seed the root record if the store has none. Idempotent.
pub fn ensure_root(store: &dyn NodeStore) -> Result<Node, ApiError> {
    if let Some(root) = store.get_by_path(ROOT_PATH)? {
        return Ok(root);
    }
    let root = store.insert(root_node())?;
    store.flush()?;
    info!(id = root.id, ref_id = %root.ref_id, "Seeded root record");
    Ok(root)
}
