//! Sled-backed node store.
//!
//! Layout, one sled tree per concern:
//! - `nodes`:    id (big endian) -> bincode(Node)
//! - `paths`:    full_path -> id
//! - `refs`:     ref_id -> id
//! - `children`: parent id ++ child id -> ()
//!
//! All four trees are written in one sled transaction per insert batch, so the
//! secondary indexes never disagree with `nodes`.

use super::{Node, NodeKind, NodeStore};
use crate::error::StorageError;
use crate::types::NodeId;
use sled::transaction::{ConflictableTransactionError, TransactionError, Transactional};
use std::path::Path;

const NODES_TREE: &str = "nodes";
const PATHS_TREE: &str = "paths";
const REFS_TREE: &str = "refs";
const CHILDREN_TREE: &str = "children";

pub struct SledNodeStore {
    db: sled::Db,
    nodes: sled::Tree,
    paths: sled::Tree,
    refs: sled::Tree,
    children: sled::Tree,
}

impl SledNodeStore {
    /// Open (or create) the store at `path`.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Self::from_db(db)
    }

    /// Open a store that is removed when dropped.
    pub fn temporary() -> Result<Self, StorageError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    pub fn from_db(db: sled::Db) -> Result<Self, StorageError> {
        Ok(Self {
            nodes: db.open_tree(NODES_TREE)?,
            paths: db.open_tree(PATHS_TREE)?,
            refs: db.open_tree(REFS_TREE)?,
            children: db.open_tree(CHILDREN_TREE)?,
            db,
        })
    }

    fn decode(bytes: &[u8]) -> Result<Node, StorageError> {
        Ok(bincode::deserialize(bytes)?)
    }

    fn decode_id(bytes: &[u8]) -> Result<NodeId, StorageError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| {
            StorageError::Serialization(format!("Malformed node id of {} bytes", bytes.len()))
        })?;
        Ok(NodeId::from_be_bytes(raw))
    }
}

fn child_key(parent_id: NodeId, child_id: NodeId) -> Vec<u8> {
    let mut key = Vec::with_capacity(16);
    key.extend_from_slice(&parent_id.to_be_bytes());
    key.extend_from_slice(&child_id.to_be_bytes());
    key
}

impl NodeStore for SledNodeStore {
    fn next_id(&self) -> Result<NodeId, StorageError> {
        Ok(self.db.generate_id()?)
    }

    fn insert_all(&self, batch: &[Node]) -> Result<(), StorageError> {
        let encoded = batch
            .iter()
            .map(|node| Ok((node, bincode::serialize(node)?)))
            .collect::<Result<Vec<_>, StorageError>>()?;

        let result = (&self.nodes, &self.paths, &self.refs, &self.children).transaction(
            |(nodes, paths, refs, children)| {
                for (node, bytes) in &encoded {
                    if paths.get(node.full_path.as_str())?.is_some() {
                        return Err(ConflictableTransactionError::Abort(
                            StorageError::UniqueConstraintViolation {
                                column: "full_path",
                                value: node.full_path.clone(),
                            },
                        ));
                    }
                    if refs.get(node.ref_id.as_str())?.is_some() {
                        return Err(ConflictableTransactionError::Abort(
                            StorageError::UniqueConstraintViolation {
                                column: "ref_id",
                                value: node.ref_id.clone(),
                            },
                        ));
                    }
                    if let Some(parent_id) = node.parent_id {
                        let parent_key = parent_id.to_be_bytes();
                        let parent = match nodes.get(&parent_key[..])? {
                            Some(raw) => Self::decode(&raw)
                                .map_err(ConflictableTransactionError::Abort)?,
                            None => {
                                return Err(ConflictableTransactionError::Abort(
                                    StorageError::InvalidParent(parent_id),
                                ))
                            }
                        };
                        if parent.kind != NodeKind::Directory {
                            return Err(ConflictableTransactionError::Abort(
                                StorageError::InvalidParent(parent_id),
                            ));
                        }
                        let empty: &[u8] = &[];
                        children.insert(child_key(parent_id, node.id), empty)?;
                    }

                    let key = node.id.to_be_bytes();
                    nodes.insert(&key[..], bytes.as_slice())?;
                    paths.insert(node.full_path.as_str(), &key[..])?;
                    refs.insert(node.ref_id.as_str(), &key[..])?;
                }
                Ok::<(), ConflictableTransactionError<StorageError>>(())
            },
        );

        result.map_err(|e| match e {
            TransactionError::Abort(e) => e,
            TransactionError::Storage(e) => StorageError::Sled(e),
        })
    }

    fn get(&self, id: NodeId) -> Result<Node, StorageError> {
        match self.nodes.get(id.to_be_bytes())? {
            Some(raw) => Self::decode(&raw),
            None => Err(StorageError::NotFound(id)),
        }
    }

    fn get_by_path(&self, full_path: &str) -> Result<Option<Node>, StorageError> {
        match self.paths.get(full_path)? {
            Some(raw) => self.get(Self::decode_id(&raw)?).map(Some),
            None => Ok(None),
        }
    }

    fn children_of(&self, parent_id: NodeId) -> Result<Vec<Node>, StorageError> {
        self.children
            .scan_prefix(parent_id.to_be_bytes())
            .keys()
            .map(|key| {
                let key = key?;
                self.get(Self::decode_id(&key[8..])?)
            })
            .collect()
    }

    fn all(&self) -> Result<Vec<Node>, StorageError> {
        self.nodes
            .iter()
            .values()
            .map(|raw| Self::decode(&raw?))
            .collect()
    }

    fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }
}
