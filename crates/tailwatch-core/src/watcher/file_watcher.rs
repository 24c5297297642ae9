//! The public watcher: wait for existence, then monitor.

use super::monitor::{Monitor, Registration};
use super::path::normalize;
use super::size::SizeTracker;
use crate::changes::{self, FileChanges};
use crate::events::{EventSource, Op};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tailwatch_common::WatchError;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Watches one file path through a shared [`EventSource`].
pub struct FileWatcher {
    path: PathBuf,
    source: Arc<dyn EventSource>,
}

impl FileWatcher {
    /// Create a watcher for `path`. Relative paths are resolved against
    /// the current directory.
    pub fn new(path: impl AsRef<Path>, source: Arc<dyn EventSource>) -> Result<Self, WatchError> {
        let path = path.as_ref();
        let path = normalize(path).map_err(|source| WatchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { path, source })
    }

    /// The normalized watch target.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait until the target file exists.
    ///
    /// Returns at once if it already exists. The parent directory must
    /// exist; it stays registered only for the duration of the call.
    /// Fails with [`WatchError::Cancelled`] when `cancel` fires and with
    /// [`WatchError::Closed`] if the event stream ends first.
    pub async fn block_until_exists(&self, cancel: &CancellationToken) -> Result<(), WatchError> {
        let dir = self.path.parent().unwrap_or(&self.path).to_path_buf();

        // Subscribe before registering so no creation slips between them.
        let mut events = self.source.subscribe();
        let _registration = Registration::acquire(Arc::clone(&self.source), dir)?;

        // The file may have appeared before the directory was registered.
        if self.exists().await? {
            return Ok(());
        }

        debug!(path = %self.path.display(), "waiting for file to be created");
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(WatchError::Cancelled),
                event = events.recv() => match event {
                    Ok(event) if event.op == Op::Create && event.path == self.path => {
                        info!(path = %self.path.display(), "file created");
                        return Ok(());
                    }
                    Ok(event) => {
                        trace!(path = %event.path.display(), op = ?event.op, "ignoring directory event");
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "file event stream lagged, re-checking existence");
                        if self.exists().await? {
                            return Ok(());
                        }
                    }
                    Err(RecvError::Closed) => return Err(WatchError::Closed),
                },
            }
        }
    }

    /// Start monitoring the already-open target file.
    ///
    /// `info` is the file's current metadata; its length is the starting
    /// size for truncation detection. Signals arrive on the returned bus
    /// until the file is deleted, `cancel` fires, or the event stream
    /// closes, at which point the bus is closed. Must be called from
    /// within a tokio runtime.
    pub fn change_events(
        &self,
        cancel: &CancellationToken,
        info: &Metadata,
    ) -> Result<FileChanges, WatchError> {
        let events = self.source.subscribe();
        let registration = Registration::acquire(Arc::clone(&self.source), self.path.clone())?;

        let (notifier, changes) = changes::channel();
        let monitor = Monitor {
            path: self.path.clone(),
            events,
            cancel: cancel.clone(),
            size: SizeTracker::new(info.len()),
            _registration: registration,
            notifier,
        };

        info!(path = %self.path.display(), size = info.len(), "monitoring file");
        let session = tokio::spawn(monitor.run());
        Ok(changes.with_session(session))
    }

    async fn exists(&self) -> Result<bool, WatchError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(WatchError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .field("registrations", &self.source.registrations())
            .finish()
    }
}
