//! Session: one unit of work against the node store.
//!
//! Writes made through a session are staged in memory and become visible to
//! other sessions only when `commit` applies them as one atomic batch. Reads
//! see the session's own staged writes on top of the committed store.
//!
//! A session is finalized exactly once: `commit` and `abandon` consume it, and
//! dropping an unfinalized session discards whatever it staged.

use crate::error::{ApiError, StorageError};
use crate::store::{NewNode, Node, NodeStore};
use crate::types::NodeId;
use tracing::{debug, warn};

pub struct Session<'a> {
    store: &'a dyn NodeStore,
    staged: Vec<Node>,
    finalized: bool,
}

impl<'a> Session<'a> {
    pub fn open(store: &'a dyn NodeStore) -> Self {
        Self {
            store,
            staged: Vec::new(),
            finalized: false,
        }
    }

    /// Run `work` inside a fresh session.
    ///
    /// Commits when `work` returns `Ok`; abandons the staged writes otherwise.
    pub fn run<T, F>(store: &'a dyn NodeStore, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Session<'a>) -> Result<T, ApiError>,
    {
        let mut session = Session::open(store);
        match work(&mut session) {
            Ok(value) => {
                session.commit()?;
                Ok(value)
            }
            Err(e) => {
                session.abandon();
                Err(e)
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Result<Node, StorageError> {
        match self.staged.iter().find(|n| n.id == id) {
            Some(node) => Ok(node.clone()),
            None => self.store.get(id),
        }
    }

    pub fn get_by_path(&self, full_path: &str) -> Result<Option<Node>, StorageError> {
        if let Some(node) = self.staged.iter().find(|n| n.full_path == full_path) {
            return Ok(Some(node.clone()));
        }
        self.store.get_by_path(full_path)
    }

    pub fn children_of(&self, parent_id: NodeId) -> Result<Vec<Node>, StorageError> {
        let mut children = self.store.children_of(parent_id)?;
        children.extend(
            self.staged
                .iter()
                .filter(|n| n.parent_id == Some(parent_id))
                .cloned(),
        );
        Ok(children)
    }

    /// Stage a node for insertion and return it with its assigned id.
    ///
    /// Uniqueness and parent checks run here against the store and the staged
    /// batch; the store repeats them atomically on commit, which is what guards
    /// against a concurrent session claiming the same path in between.
    pub fn insert(&mut self, node: NewNode) -> Result<Node, StorageError> {
        if self.get_by_path(&node.full_path)?.is_some() {
            return Err(StorageError::UniqueConstraintViolation {
                column: "full_path",
                value: node.full_path,
            });
        }
        if self.staged.iter().any(|n| n.ref_id == node.ref_id) {
            return Err(StorageError::UniqueConstraintViolation {
                column: "ref_id",
                value: node.ref_id,
            });
        }
        if let Some(parent_id) = node.parent_id {
            let parent = match self.get(parent_id) {
                Ok(parent) => parent,
                Err(StorageError::NotFound(_)) => {
                    return Err(StorageError::InvalidParent(parent_id))
                }
                Err(e) => return Err(e),
            };
            if !parent.is_directory() {
                return Err(StorageError::InvalidParent(parent_id));
            }
        }

        let node = node.with_id(self.store.next_id()?);
        self.staged.push(node.clone());
        Ok(node)
    }

    /// Number of staged, uncommitted nodes.
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Apply every staged write atomically and close the session.
    pub fn commit(mut self) -> Result<(), StorageError> {
        self.finalized = true;
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(());
        }
        self.store.insert_all(&staged)?;
        self.store.flush()?;
        debug!(nodes = staged.len(), "Session committed");
        Ok(())
    }

    /// Discard staged writes and close the session.
    pub fn abandon(mut self) {
        self.finalized = true;
        if !self.staged.is_empty() {
            debug!(nodes = self.staged.len(), "Session abandoned");
        }
        self.staged.clear();
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.finalized && !self.staged.is_empty() {
            warn!(
                nodes = self.staged.len(),
                "Session dropped without commit, discarding staged writes"
            );
        }
    }
}
