//! Read a config from a given path or the platform default.

use crate::schema::TailwatchConfig;
use crate::validation;
use std::path::{Path, PathBuf};
use tailwatch_common::ConfigError;
use tracing::{debug, info, warn};

/// `<config dir>/tailwatch/config.toml`, e.g. `~/.config/tailwatch/config.toml`
/// on Linux.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("tailwatch").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Parse the TOML file at `path`.
///
/// Missing fields take serde defaults. A config that fails validation is
/// logged and returned as-is.
pub fn load_from_path(path: &Path) -> Result<TailwatchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TailwatchConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "config has invalid values: {e}");
    }

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Like [`load_from_path`], but a missing file means defaults.
///
/// Nothing is written to disk; `tailwatch --print-config` shows what a
/// config file would contain.
pub fn load_or_default(path: &Path) -> Result<TailwatchConfig, ConfigError> {
    match path.try_exists() {
        Ok(true) => load_from_path(path),
        Ok(false) => {
            debug!(path = %path.display(), "no config file, using defaults");
            Ok(TailwatchConfig::default())
        }
        Err(e) => Err(ConfigError::ParseError(format!(
            "cannot access {}: {e}",
            path.display()
        ))),
    }
}

/// [`load_or_default`] on [`default_config_path`].
pub fn load_default() -> Result<TailwatchConfig, ConfigError> {
    load_or_default(&default_config_path()?)
}
