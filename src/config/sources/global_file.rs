//! Global config file: $XDG_CONFIG_HOME/fsindex/config.toml

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::PathBuf;

pub fn global_config_path() -> Option<PathBuf> {
    xdg::config_home()
        .ok()
        .map(|home| home.join("fsindex").join("config.toml"))
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    match global_config_path() {
        Some(path) => Ok(builder.add_source(File::from(path).required(false))),
        None => Ok(builder),
    }
}
