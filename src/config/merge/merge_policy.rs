//! Defaults every merge starts from.

use crate::config::workspace::storage_paths::{DEFAULT_ROOT_DIR, DEFAULT_STORE_PATH};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("storage.root_dir", DEFAULT_ROOT_DIR)?
        .set_default("storage.store_path", DEFAULT_STORE_PATH)
}
