//! Background monitoring task for one open file.

use super::size::SizeTracker;
use crate::changes::{Change, ChangeNotifier, SessionEnd};
use crate::events::{EventSource, FsEvent, Op};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tailwatch_common::WatchError;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// A path registered on an event source, released on drop.
pub(super) struct Registration {
    source: Arc<dyn EventSource>,
    path: PathBuf,
}

impl Registration {
    pub(super) fn acquire(source: Arc<dyn EventSource>, path: PathBuf) -> Result<Self, WatchError> {
        source.add(&path)?;
        Ok(Self { source, path })
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        if let Err(e) = self.source.remove(&self.path) {
            debug!(path = %self.path.display(), "releasing watch: {e}");
        }
    }
}

/// State of one monitoring session.
///
/// Dropping it, whether the loop returned or the task was torn down,
/// releases the watch and then closes the bus, in field order.
pub(super) struct Monitor {
    pub(super) path: PathBuf,
    pub(super) events: broadcast::Receiver<FsEvent>,
    pub(super) cancel: CancellationToken,
    pub(super) size: SizeTracker,
    pub(super) _registration: Registration,
    pub(super) notifier: ChangeNotifier,
}

impl Monitor {
    pub(super) async fn run(mut self) -> SessionEnd {
        let end = self.watch_loop().await;
        info!(path = %self.path.display(), end = ?end, "monitoring stopped");
        end
    }

    async fn watch_loop(&mut self) -> SessionEnd {
        loop {
            let previous = self.size.size();

            let op = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return SessionEnd::Cancelled,
                _ = self.notifier.abandoned() => return SessionEnd::Abandoned,
                event = self.events.recv() => match event {
                    Ok(event) if event.path == self.path => Some(event.op),
                    Ok(_) => None,
                    // Whatever was missed, the file's size tells the story.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(path = %self.path.display(), skipped, "file event stream lagged");
                        Some(Op::Write)
                    }
                    Err(RecvError::Closed) => return SessionEnd::StreamClosed,
                },
            };
            let Some(op) = op else { continue };

            match op {
                Op::Remove | Op::Rename => {
                    debug!(path = %self.path.display(), op = ?op, "file went away");
                    self.notifier.notify_deleted();
                    return SessionEnd::Deleted;
                }
                Op::Write => match tokio::fs::metadata(&self.path).await {
                    Ok(meta) => {
                        let change = self.size.observe(meta.len());
                        debug!(
                            path = %self.path.display(),
                            previous,
                            size = meta.len(),
                            change = ?change,
                            "file written"
                        );
                        self.notifier.notify(change);
                    }
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        // The write raced with a removal; the removal wins.
                        self.notifier.notify_deleted();
                        return SessionEnd::Deleted;
                    }
                    Err(e) => return self.fail(e),
                },
                Op::Chmod => match tokio::fs::metadata(&self.path).await {
                    Ok(_) => {}
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {
                        debug!(path = %self.path.display(), "file unlinked while open");
                        self.notifier.notify(Change::NeedToClose);
                    }
                    Err(e) => return self.fail(e),
                },
                Op::Create => {}
            }
        }
    }

    fn fail(&self, e: io::Error) -> SessionEnd {
        error!(path = %self.path.display(), "failed to stat file: {e}");
        SessionEnd::Failed(e)
    }
}
