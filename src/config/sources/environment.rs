//! Environment variable source: FSINDEX_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `FSINDEX__STORAGE__ROOT_DIR=/srv/files` sets `storage.root_dir`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("FSINDEX")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
