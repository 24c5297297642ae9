pub mod errors;

pub use errors::{ConfigError, TailwatchError, WatchError};

pub type Result<T> = std::result::Result<T, TailwatchError>;
