use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Physical file operations addressed by index path (`"/foo/bar"`).
///
/// Failures are reported as `ApiError::StorageIo`; whether they are fatal is up
/// to the caller. Nothing here is atomic with respect to the node store.
pub trait StorageBridge: Send + Sync {
    /// Directory that index path `"/"` maps to.
    fn root(&self) -> &Path;

    fn physical_path(&self, path: &str) -> PathBuf;

    fn exists(&self, path: &str) -> bool;

    fn is_dir(&self, path: &str) -> bool;

    /// Create a single directory; fails if the target already exists.
    fn make_directory(&self, path: &str) -> Result<(), ApiError>;

    /// Create a new file holding `bytes`; fails with `AlreadyExists` if the
    /// target is occupied. Never truncates an existing object.
    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<(), ApiError>;

    fn read_file(&self, path: &str) -> Result<Vec<u8>, ApiError>;

    fn remove_file(&self, path: &str) -> Result<(), ApiError>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &str) -> Result<(), ApiError>;
}
