//! File event sources.
//!
//! An [`EventSource`] is the shared handle into the OS file-event
//! subsystem. Many watchers register paths on one source and each
//! subscribes to the full stream, picking out the paths it cares about.

mod manual;
mod notify_source;
mod registry;

#[cfg(test)]
mod tests;

pub use manual::ManualEventSource;
pub use notify_source::NotifyEventSource;

use std::path::{Path, PathBuf};
use tailwatch_common::WatchError;
use tokio::sync::broadcast;

/// Kind of filesystem operation carried by an [`FsEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Write,
    Remove,
    Rename,
    /// Permission or other metadata change. Not every backend reports it.
    Chmod,
}

/// One filesystem event for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub path: PathBuf,
    pub op: Op,
}

impl FsEvent {
    pub fn new(path: impl Into<PathBuf>, op: Op) -> Self {
        Self {
            path: path.into(),
            op,
        }
    }
}

/// Shared handle into a file-event subsystem.
///
/// Registrations are reference counted: a path stays watched until every
/// `add` has been matched by a `remove`. Implementations synchronize
/// internally so one source can serve many watchers concurrently.
pub trait EventSource: Send + Sync {
    /// Register interest in events for `path`.
    fn add(&self, path: &Path) -> Result<(), WatchError>;

    /// Drop one registration of `path`.
    fn remove(&self, path: &Path) -> Result<(), WatchError>;

    /// Receive every event the source produces from now on. The receiver
    /// reports `Closed` once the source shuts down.
    fn subscribe(&self) -> broadcast::Receiver<FsEvent>;

    /// Number of distinct paths currently registered.
    fn registrations(&self) -> usize;
}

/// A receiver that is already closed, for subscribers that arrive after
/// shutdown.
fn closed_receiver() -> broadcast::Receiver<FsEvent> {
    let (_, rx) = broadcast::channel(1);
    rx
}
