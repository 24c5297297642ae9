//! Serialize a config back to TOML.

use crate::schema::TailwatchConfig;
use tailwatch_common::ConfigError;

/// Render `config` as a TOML document that [`super::load_from_path`] reads
/// back unchanged.
pub fn to_toml(config: &TailwatchConfig) -> Result<String, ConfigError> {
    toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("cannot render config as TOML: {e}")))
}
