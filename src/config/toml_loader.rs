//! TOML configuration file parsing.
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Read and deserialize a TOML file.
///
/// A missing file deserializes as empty TOML, so types whose fields all have
/// defaults load as their default value.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = if path.exists() {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?
    } else {
        String::new()
    };

    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        file: path.display().to_string(),
        message: e.message().to_string(),
    })
}
