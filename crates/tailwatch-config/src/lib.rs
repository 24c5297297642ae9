//! tailwatch configuration.
//!
//! TOML-based configuration for the watcher and the tail loop. Every
//! section has defaults, so an empty or partial file is valid.

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{LogLevel, LoggingConfig, TailConfig, TailwatchConfig, WatcherConfig};
pub use toml_loader::{default_config_path, load_default, load_from_path, load_or_default, to_toml};

use std::path::Path;
use tailwatch_common::ConfigError;

/// Load config from `path` if given, otherwise from the platform default.
///
/// The result is validated; an invalid config is an error here, unlike
/// [`load_from_path`] which only warns.
pub fn load_config(path: Option<&Path>) -> Result<TailwatchConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            load_from_path(path)?
        }
        None => load_default()?,
    };

    validation::validate(&config)?;
    Ok(config)
}
