//! Configuration types.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TailwatchConfig {
    pub watcher: WatcherConfig,
    pub tail: TailConfig,
    pub logging: LoggingConfig,
}

/// File event source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Buffered raw events per subscriber (valid range: 16-65536).
    pub event_capacity: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            event_capacity: 1024,
        }
    }
}

/// Tail loop behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Reopen the file by name after it is deleted or renamed.
    pub follow_name: bool,
    /// Start reading at byte 0 instead of the current end of file.
    pub from_start: bool,
    /// Read buffer size in bytes (valid range: 512-1048576).
    pub read_buffer: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            follow_name: true,
            from_start: false,
            read_buffer: 8192,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
