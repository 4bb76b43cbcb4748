//! Hierarchy Builder
//!
//! Creates metadata for a new node under an existing directory. The builder
//! never touches physical storage; callers pair it with the storage bridge.

use super::resolver::{join_path, resolve, ROOT_PATH};
use crate::error::ApiError;
use crate::session::Session;
use crate::store::{NewNode, Node, NodeKind};
use crate::types::RefId;
use tracing::info;
use uuid::Uuid;

/// Where a new node will go: its resolved parent, own name, and full path.
#[derive(Debug, Clone)]
pub struct Placement {
    pub parent: Node,
    pub name: String,
    pub full_path: String,
}

impl Placement {
    /// Same parent, different name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let full_path = join_path(&self.parent.full_path, &name);
        Self {
            parent: self.parent,
            name,
            full_path,
        }
    }
}

/// Fresh random ref id: a v4 UUID in its 32 hex digit form.
pub fn new_ref_id() -> RefId {
    Uuid::new_v4().simple().to_string()
}

/// Reject names that are not a single path segment.
pub fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') || name.contains('\0')
    {
        return Err(ApiError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Resolve `parent_path` and compute where `name` would live under it.
pub fn place(session: &Session<'_>, parent_path: &str, name: &str) -> Result<Placement, ApiError> {
    validate_name(name)?;
    let parent = resolve(session, parent_path)?;
    if !parent.is_directory() {
        return Err(ApiError::NotADirectory(parent.full_path));
    }
    let full_path = join_path(&parent.full_path, name);
    Ok(Placement {
        parent,
        name: name.to_string(),
        full_path,
    })
}

/// Stage the node described by `placement` in the session.
pub fn insert(
    session: &mut Session<'_>,
    placement: &Placement,
    kind: NodeKind,
) -> Result<Node, ApiError> {
    let node = session.insert(NewNode {
        name: placement.name.clone(),
        full_path: placement.full_path.clone(),
        ref_id: new_ref_id(),
        kind,
        parent_id: Some(placement.parent.id),
    })?;
    info!(path = %node.full_path, kind = %node.kind, id = node.id, "Created node");
    Ok(node)
}

pub fn create(
    session: &mut Session<'_>,
    parent_path: &str,
    name: &str,
    kind: NodeKind,
) -> Result<Node, ApiError> {
    let placement = place(session, parent_path, name)?;
    insert(session, &placement, kind)
}

/// The root record seeded by bootstrap.
pub fn root_node() -> NewNode {
    NewNode {
        name: ROOT_PATH.to_string(),
        full_path: ROOT_PATH.to_string(),
        ref_id: new_ref_id(),
        kind: NodeKind::Directory,
        parent_id: None,
    }
}
