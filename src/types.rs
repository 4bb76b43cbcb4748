//! Core types for the path index.

/// NodeId: store-assigned identifier of a node, immutable once assigned
pub type NodeId = u64;

/// RefId: opaque identity token assigned to a node at creation
pub type RefId = String;
