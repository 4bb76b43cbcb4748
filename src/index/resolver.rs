//! Path Resolver
//!
//! Resolution is a single exact-match lookup on the stored `full_path`; no
//! segment-by-segment traversal happens. This is only sound because nodes
//! are never renamed or moved.

use crate::error::ApiError;
use crate::session::Session;
use crate::store::Node;
use tracing::debug;

pub const ROOT_PATH: &str = "/";

/// Canonical form of a request path: one leading slash, no trailing slash
/// (except for the root itself).
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return ROOT_PATH.to_string();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Full path of a child named `name` under `parent`.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == ROOT_PATH {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}

pub fn resolve(session: &Session<'_>, path: &str) -> Result<Node, ApiError> {
    let full_path = normalize_path(path);
    match session.get_by_path(&full_path)? {
        Some(node) => {
            debug!(path = %full_path, id = node.id, "Resolved path");
            Ok(node)
        }
        None => Err(ApiError::PathNotFound(full_path)),
    }
}
