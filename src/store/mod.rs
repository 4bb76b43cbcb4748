//! Node Store
//!
//! Durable table of nodes. Each node carries only a `parent_id`; children are
//! computed on demand through `children_of`, so no back-pointers are kept.
//! The store knows nothing about path semantics beyond enforcing that
//! `full_path` and `ref_id` are unique.

pub mod persistence;

use crate::error::StorageError;
use crate::types::{NodeId, RefId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use persistence::SledNodeStore;

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    #[serde(rename = "dir")]
    Directory,
    #[serde(rename = "file")]
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => write!(f, "dir"),
            NodeKind::File => write!(f, "file"),
        }
    }
}

/// Node: one directory or file in the indexed hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Own segment name, `"/"` for the root
    pub name: String,
    /// Absolute slash-separated path; the lookup key
    pub full_path: String,
    pub ref_id: RefId,
    pub kind: NodeKind,
    /// `None` only for the root
    pub parent_id: Option<NodeId>,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }
}

/// A node that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    pub name: String,
    pub full_path: String,
    pub ref_id: RefId,
    pub kind: NodeKind,
    pub parent_id: Option<NodeId>,
}

impl NewNode {
    pub fn with_id(self, id: NodeId) -> Node {
        Node {
            id,
            name: self.name,
            full_path: self.full_path,
            ref_id: self.ref_id,
            kind: self.kind,
            parent_id: self.parent_id,
        }
    }
}

/// Node Store interface
///
/// Implementations must reject an insert whose `full_path` or `ref_id` is
/// already present with `StorageError::UniqueConstraintViolation`, and must
/// reject a `parent_id` that does not reference a directory.
pub trait NodeStore: Send + Sync {
    /// Reserve a fresh identifier.
    fn next_id(&self) -> Result<NodeId, StorageError>;

    /// Insert a batch of nodes atomically: either every node lands or none does.
    fn insert_all(&self, nodes: &[Node]) -> Result<(), StorageError>;

    fn get(&self, id: NodeId) -> Result<Node, StorageError>;

    fn get_by_path(&self, full_path: &str) -> Result<Option<Node>, StorageError>;

    /// Direct children of `parent_id`, in no particular order.
    fn children_of(&self, parent_id: NodeId) -> Result<Vec<Node>, StorageError>;

    /// Every node in the store.
    fn all(&self) -> Result<Vec<Node>, StorageError>;

    /// Make committed writes durable.
    fn flush(&self) -> Result<(), StorageError>;

    /// Assign an id and insert a single node.
    fn insert(&self, node: NewNode) -> Result<Node, StorageError> {
        let node = node.with_id(self.next_id()?);
        self.insert_all(std::slice::from_ref(&node))?;
        Ok(node)
    }
}
