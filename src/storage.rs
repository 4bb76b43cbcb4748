//! Storage Bridge
//!
//! Physical counterpart of the node store: every index path maps to a file
//! system object below a configured root directory.

pub mod contract;
pub mod local;

pub use contract::StorageBridge;
pub use local::LocalStorage;
