use fsindex::bootstrap;
use fsindex::storage::LocalStorage;
use fsindex::{FsIndex, SledNodeStore};
use std::sync::Arc;
use tempfile::TempDir;

/// Index over a temporary root with the root record seeded.
pub fn seeded_index() -> (TempDir, FsIndex) {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(SledNodeStore::temporary().unwrap());
    bootstrap::ensure_root(store.as_ref()).unwrap();
    let index = FsIndex::new(store, Arc::new(LocalStorage::new(temp.path())));
    (temp, index)
}
