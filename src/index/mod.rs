//! Metadata index
//!
//! `FsIndex` answers the four request kinds of the outer layer (list, read,
//! create directory, create file) by combining the path resolver, listing
//! service, hierarchy builder and collision resolver with the storage bridge.
//! One instance is constructed at startup and passed to whoever serves requests.
//!
//! Metadata and physical storage cannot be committed atomically together. For
//! both files and directories the physical object is created first and the
//! metadata is committed only after that succeeds; if the metadata insert or
//! commit fails the physical object is removed again. A crash between the two
//! steps still leaves an orphaned physical object, which `audit` reports.
//!
//! Files are created exclusively, so a rollback only ever removes an object
//! the same request created. A write that fails partway has its partial file
//! removed the same way.

pub mod builder;
pub mod collision;
pub mod listing;
pub mod resolver;

use crate::error::ApiError;
use crate::integrity::{self, IntegrityReport};
use crate::session::Session;
use crate::storage::StorageBridge;
use crate::store::{Node, NodeKind, NodeStore};
use std::sync::Arc;
use tracing::{error, warn};

pub use listing::{Entry, PARENT_ENTRY_NAME};
pub use resolver::ROOT_PATH;

pub struct FsIndex {
    store: Arc<dyn NodeStore>,
    storage: Arc<dyn StorageBridge>,
}

impl FsIndex {
    pub fn new(store: Arc<dyn NodeStore>, storage: Arc<dyn StorageBridge>) -> Self {
        Self { store, storage }
    }

    pub fn store(&self) -> &dyn NodeStore {
        self.store.as_ref()
    }

    pub fn storage(&self) -> &dyn StorageBridge {
        self.storage.as_ref()
    }

    /// Open a unit of work against the node store.
    pub fn session(&self) -> Session<'_> {
        Session::open(self.store.as_ref())
    }

    /// Resolve `path` to its node record.
    pub fn stat(&self, path: &str) -> Result<Node, ApiError> {
        Session::run(self.store(), |s| resolver::resolve(s, path))
    }

    /// Listing request.
    pub fn list(&self, path: &str, include_parent_entry: bool) -> Result<Vec<Entry>, ApiError> {
        Session::run(self.store(), |s| {
            let node = resolver::resolve(s, path)?;
            if !node.is_directory() {
                return Err(ApiError::NotADirectory(node.full_path));
            }
            self.require_physical(&node)?;
            listing::list_node(s, &node, include_parent_entry)
        })
    }

    /// Read request.
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let node = Session::run(self.store(), |s| resolver::resolve(s, path))?;
        if node.kind != NodeKind::File {
            return Err(ApiError::NotAFile(node.full_path));
        }
        self.require_physical(&node)?;
        self.storage.read_file(&node.full_path)
    }

    /// Create-directory request.
    ///
    /// Fails with `PathAlreadyExists` when either the index or the physical
    /// tree already holds something at the target path.
    pub fn create_directory(&self, parent_path: &str, name: &str) -> Result<Entry, ApiError> {
        let mut session = self.session();
        let placement = builder::place(&session, parent_path, name)?;
        if session.get_by_path(&placement.full_path)?.is_some()
            || self.storage.exists(&placement.full_path)
        {
            return Err(ApiError::PathAlreadyExists(placement.full_path));
        }
        self.require_physical(&placement.parent)?;

        if let Err(e) = self.storage.make_directory(&placement.full_path) {
            return Err(if is_already_exists(&e) {
                ApiError::PathAlreadyExists(placement.full_path)
            } else {
                e
            });
        }

        let committed =
            builder::insert(&mut session, &placement, NodeKind::Directory).and_then(|node| {
                session.commit()?;
                Ok(node)
            });
        match committed {
            Ok(node) => Ok(Entry::from(&node)),
            Err(e) => Err(self.roll_back(&placement.full_path, NodeKind::Directory, e)),
        }
    }

    /// Create-file request.
    ///
    /// The stored name is `desired_name`, or a suffixed variant of it when
    /// the physical directory already holds an object of that name.
    pub fn create_file(
        &self,
        directory_path: &str,
        desired_name: &str,
        content: &[u8],
    ) -> Result<Entry, ApiError> {
        let mut session = self.session();
        let placement = builder::place(&session, directory_path, desired_name)?;
        self.require_physical(&placement.parent)?;

        let final_name =
            collision::resolve_name(self.storage(), &placement.parent.full_path, desired_name);
        let placement = placement.with_name(final_name);
        if session.get_by_path(&placement.full_path)?.is_some() {
            // Free on disk yet present in the index: the physical file vanished.
            return Err(self.integrity_fault(format!(
                "{} is indexed but missing from storage",
                placement.full_path
            )));
        }

        if let Err(e) = self.storage.write_file(&placement.full_path, content) {
            return Err(if is_already_exists(&e) {
                // A concurrent upload claimed the name after it was resolved.
                warn!("Upload raced for {}", placement.full_path);
                ApiError::PathAlreadyExists(placement.full_path)
            } else if self.storage.exists(&placement.full_path) {
                self.roll_back(&placement.full_path, NodeKind::File, e)
            } else {
                e
            });
        }

        let committed =
            builder::insert(&mut session, &placement, NodeKind::File).and_then(|node| {
                session.commit()?;
                Ok(node)
            });
        match committed {
            Ok(node) => Ok(Entry::from(&node)),
            Err(e) => Err(self.roll_back(&placement.full_path, NodeKind::File, e)),
        }
    }

    /// Compare the whole index against physical storage.
    pub fn audit(&self) -> Result<IntegrityReport, ApiError> {
        integrity::audit(self.store(), self.storage())
    }

    /// The physical object behind `node` must exist with the node's kind.
    fn require_physical(&self, node: &Node) -> Result<(), ApiError> {
        let path = &node.full_path;
        if !self.storage.exists(path) {
            return Err(self.integrity_fault(format!(
                "{} is indexed but missing from storage",
                path
            )));
        }
        if self.storage.is_dir(path) != node.is_directory() {
            return Err(self.integrity_fault(format!(
                "{} is indexed as {} but storage disagrees",
                path, node.kind
            )));
        }
        Ok(())
    }

    fn integrity_fault(&self, message: String) -> ApiError {
        error!(target: "fsindex::integrity", "{}", message);
        ApiError::IntegrityFault(message)
    }

    /// Undo a physical creation whose metadata never landed.
    ///
    /// Returns the error to report: `cause` itself, or an integrity fault if
    /// the physical object could not be removed either.
    fn roll_back(&self, path: &str, kind: NodeKind, cause: ApiError) -> ApiError {
        warn!("Rolling back physical {} {}: {}", kind, path, cause);
        let removed = match kind {
            NodeKind::Directory => self.storage.remove_dir(path),
            NodeKind::File => self.storage.remove_file(path),
        };
        match removed {
            Ok(()) => cause,
            Err(e) => self.integrity_fault(format!(
                "{} exists in storage without metadata ({}); rollback failed: {}",
                path, cause, e
            )),
        }
    }
}

fn is_already_exists(e: &ApiError) -> bool {
    matches!(e, ApiError::StorageIo { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists)
}
