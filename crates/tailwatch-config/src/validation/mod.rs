//! Configuration validation.
//!
//! Collects every out-of-range value into a single `ConfigError`.


use crate::schema::TailwatchConfig;
use tailwatch_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TailwatchConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(
        &mut errors,
        "watcher.event_capacity",
        config.watcher.event_capacity,
        16,
        65_536,
    );
    validate_range(
        &mut errors,
        "tail.read_buffer",
        config.tail.read_buffer,
        512,
        1_048_576,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Push an error if `value` is outside `[min, max]`.
fn validate_range(errors: &mut Vec<String>, name: &str, value: usize, min: usize, max: usize) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
