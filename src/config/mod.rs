//! Configuration
//!
//! Layered configuration built with the `config` crate. Precedence, lowest to
//! highest: built-in defaults, global file, workspace files, environment.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;
pub mod workspace;

pub use facade::ConfigLoader;
pub use paths::xdg_root as xdg;
pub use workspace::StorageConfig;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
