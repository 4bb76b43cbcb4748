//! fsindex: Path-Indexed File Tree
//!
//! Exposes a hierarchical name space of directories and files. Every node has
//! a metadata record in a durable node store and a physical counterpart below
//! a root directory; the index keeps the two consistent and reports when they
//! are not.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod index;
pub mod integrity;
pub mod logging;
pub mod session;
pub mod storage;
pub mod store;
pub mod tooling;
pub mod types;

pub use error::{ApiError, ErrorClass, StorageError};
pub use index::{Entry, FsIndex};
pub use session::Session;
pub use store::{Node, NodeKind, NodeStore, SledNodeStore};
