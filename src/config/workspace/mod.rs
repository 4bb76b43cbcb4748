pub mod storage_paths;

pub use storage_paths::StorageConfig;
