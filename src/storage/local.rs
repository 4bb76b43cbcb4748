//! Local file system implementation of the storage bridge.

use super::StorageBridge;
use crate::error::ApiError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl StorageBridge for LocalStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    /// Map an index path onto the root, ignoring empty, `.` and `..` segments.
    fn physical_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }

    fn exists(&self, path: &str) -> bool {
        self.physical_path(path).exists()
    }

    fn is_dir(&self, path: &str) -> bool {
        self.physical_path(path).is_dir()
    }

    fn make_directory(&self, path: &str) -> Result<(), ApiError> {
        std::fs::create_dir(self.physical_path(path)).map_err(|e| ApiError::storage_io(path, e))
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> Result<(), ApiError> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.physical_path(path))
            .and_then(|mut file| file.write_all(bytes))
            .map_err(|e| ApiError::storage_io(path, e))
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        std::fs::read(self.physical_path(path)).map_err(|e| ApiError::storage_io(path, e))
    }

    fn remove_file(&self, path: &str) -> Result<(), ApiError> {
        std::fs::remove_file(self.physical_path(path)).map_err(|e| ApiError::storage_io(path, e))
    }

    fn remove_dir(&self, path: &str) -> Result<(), ApiError> {
        std::fs::remove_dir(self.physical_path(path)).map_err(|e| ApiError::storage_io(path, e))
    }
}
