//! Error types
//!
//! `StorageError` is what the node store reports; `ApiError` is what the index
//! reports to its callers. Every failure carries a specific kind so the outer
//! layer can map it to a response class without inspecting messages.

use crate::types::NodeId;
use thiserror::Error;

/// Errors raised by the node store
#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique column already holds the value being inserted
    #[error("Unique constraint violated on {column}: {value}")]
    UniqueConstraintViolation { column: &'static str, value: String },

    #[error("Node not found: {0}")]
    NotFound(NodeId),

    /// Parent reference does not name an existing directory node
    #[error("Invalid parent reference: {0}")]
    InvalidParent(NodeId),

    #[error("Database error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<bincode::Error> for StorageError {
    fn from(err: bincode::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Errors raised by the index boundary
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Path already exists: {0}")]
    PathAlreadyExists(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Physical storage could not complete an operation
    #[error("Storage I/O error at {path}: {source}")]
    StorageIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Index and physical storage disagree about a path
    #[error("Integrity fault: {0}")]
    IntegrityFault(String),

    #[error("Storage error: {0}")]
    StorageError(StorageError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A `full_path` uniqueness violation is the index's `PathAlreadyExists`;
/// every other store failure is passed through unchanged.
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UniqueConstraintViolation {
                column: "full_path",
                value,
            } => ApiError::PathAlreadyExists(value),
            other => ApiError::StorageError(other),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Response class a caller should map an error to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    BadRequest,
    ServerFault,
}

impl ApiError {
    pub fn storage_io(path: impl Into<String>, source: std::io::Error) -> Self {
        ApiError::StorageIo {
            path: path.into(),
            source,
        }
    }

    /// Classify the error for the outer request layer.
    ///
    /// Integrity faults are kept apart from not-found so operators can alert on them.
    pub fn class(&self) -> ErrorClass {
        match self {
            ApiError::PathNotFound(_) => ErrorClass::NotFound,
            ApiError::PathAlreadyExists(_)
            | ApiError::NotADirectory(_)
            | ApiError::NotAFile(_)
            | ApiError::InvalidName(_) => ErrorClass::BadRequest,
            ApiError::StorageIo { .. }
            | ApiError::IntegrityFault(_)
            | ApiError::StorageError(_)
            | ApiError::ConfigError(_) => ErrorClass::ServerFault,
        }
    }
}
