//! Directory Listing Service
//!
//! Lists the direct children of a directory and, on request, appends a
//! synthesized `".."` entry pointing at the listed directory's parent.

use crate::error::{ApiError, StorageError};
use crate::session::Session;
use crate::store::{Node, NodeKind};
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the synthesized parent-traversal entry
pub const PARENT_ENTRY_NAME: &str = "..";

/// Projection of a node handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

impl From<&Node> for Entry {
    fn from(node: &Node) -> Self {
        Entry {
            name: node.name.clone(),
            path: node.full_path.clone(),
            kind: node.kind,
        }
    }
}

impl Entry {
    /// The synthesized parent entry is never backed by a node; follow it by
    /// resolving its path, not by id.
    pub fn is_parent_entry(&self) -> bool {
        self.name == PARENT_ENTRY_NAME
    }
}

/// List the directory identified by `node_id`.
pub fn list(
    session: &Session<'_>,
    node_id: NodeId,
    include_parent_entry: bool,
) -> Result<Vec<Entry>, ApiError> {
    let node = session.get(node_id).map_err(|e| match e {
        StorageError::NotFound(id) => ApiError::PathNotFound(format!("node #{}", id)),
        other => other.into(),
    })?;
    list_node(session, &node, include_parent_entry)
}

/// List an already resolved directory node.
///
/// Children are sorted by name; the parent entry, if any, comes last.
pub fn list_node(
    session: &Session<'_>,
    node: &Node,
    include_parent_entry: bool,
) -> Result<Vec<Entry>, ApiError> {
    if !node.is_directory() {
        return Err(ApiError::NotADirectory(node.full_path.clone()));
    }

    let mut entries: Vec<Entry> = session
        .children_of(node.id)?
        .iter()
        .map(Entry::from)
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    if include_parent_entry {
        if let Some(parent_id) = node.parent_id {
            let parent = session.get(parent_id).map_err(|e| match e {
                StorageError::NotFound(id) => ApiError::IntegrityFault(format!(
                    "parent #{} of {} is missing from the index",
                    id, node.full_path
                )),
                other => other.into(),
            })?;
            entries.push(Entry {
                name: PARENT_ENTRY_NAME.to_string(),
                path: parent.full_path,
                kind: NodeKind::Directory,
            });
        }
    }

    debug!(path = %node.full_path, entries = entries.len(), "Listed directory");
    Ok(entries)
}
