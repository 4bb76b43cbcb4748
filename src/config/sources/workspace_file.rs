//! Workspace config files: fsindex.toml, then fsindex.local.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::Path;

pub const WORKSPACE_CONFIG_FILE: &str = "fsindex.toml";
pub const WORKSPACE_LOCAL_CONFIG_FILE: &str = "fsindex.local.toml";

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder
        .add_source(File::from(workspace_root.join(WORKSPACE_CONFIG_FILE)).required(false))
        .add_source(File::from(workspace_root.join(WORKSPACE_LOCAL_CONFIG_FILE)).required(false));
    Ok(builder)
}
