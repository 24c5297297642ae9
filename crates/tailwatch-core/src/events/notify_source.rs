//! [`EventSource`] backed by the `notify` crate.
//!
//! Uses the platform's recommended watcher (inotify on Linux) in
//! non-recursive mode. Raw `notify` events are flattened into one
//! [`FsEvent`] per path and broadcast to every subscriber.

use super::registry::Registry;
use super::{closed_receiver, EventSource, FsEvent, Op};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tailwatch_common::WatchError;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Shared OS file-event handle.
pub struct NotifyEventSource {
    inner: Mutex<Inner>,
}

struct Inner {
    watcher: Option<RecommendedWatcher>,
    sender: Option<broadcast::Sender<FsEvent>>,
    registry: Registry,
}

impl NotifyEventSource {
    /// Start the backend. `capacity` is the number of events buffered per
    /// subscriber before the oldest are dropped.
    pub fn new(capacity: usize) -> Result<Self, WatchError> {
        let (sender, _) = broadcast::channel(capacity);
        let event_tx = sender.clone();

        let watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) => {
                    for fs_event in translate(&event) {
                        // No subscribers is fine; nobody is waiting.
                        let _ = event_tx.send(fs_event);
                    }
                }
                Err(e) => {
                    warn!("file watcher error: {e}");
                }
            },
            notify::Config::default(),
        )
        .map_err(|e| WatchError::Backend(format!("failed to create watcher: {e}")))?;

        info!("file event source started");
        Ok(Self {
            inner: Mutex::new(Inner {
                watcher: Some(watcher),
                sender: Some(sender),
                registry: Registry::default(),
            }),
        })
    }

    /// Stop the backend. Subscribers see the stream close once the
    /// backend thread has let go of its sender.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.watcher.take();
        inner.sender.take();
        inner.registry.clear();
        info!("file event source closed");
    }

    /// Whether `path` currently holds at least one registration.
    pub fn is_registered(&self, path: &Path) -> bool {
        self.lock().registry.contains(path)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl EventSource for NotifyEventSource {
    fn add(&self, path: &Path) -> Result<(), WatchError> {
        let mut inner = self.lock();
        let Inner {
            watcher, registry, ..
        } = &mut *inner;
        let watcher = watcher.as_mut().ok_or(WatchError::Closed)?;

        if registry.acquire(path) {
            if let Err(e) = watcher.watch(path, RecursiveMode::NonRecursive) {
                registry.release(path);
                return Err(WatchError::Watch {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
            debug!(path = %path.display(), "watch registered");
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), WatchError> {
        let mut inner = self.lock();
        let Inner {
            watcher, registry, ..
        } = &mut *inner;

        match registry.release(path) {
            None => Err(WatchError::Unwatch {
                path: path.to_path_buf(),
                message: "path is not watched".into(),
            }),
            Some(false) => Ok(()),
            Some(true) => {
                debug!(path = %path.display(), "watch released");
                match watcher.as_mut() {
                    // The kernel drops watches on deleted files by itself,
                    // so this can fail after the fact.
                    Some(watcher) => watcher.unwatch(path).map_err(|e| WatchError::Unwatch {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    }),
                    None => Ok(()),
                }
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<FsEvent> {
        match self.lock().sender.as_ref() {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    fn registrations(&self) -> usize {
        self.lock().registry.len()
    }
}

impl std::fmt::Debug for NotifyEventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("NotifyEventSource")
            .field("open", &inner.watcher.is_some())
            .field("registrations", &inner.registry.len())
            .finish()
    }
}

/// Flatten a `notify` event into one [`FsEvent`] per path.
///
/// Access events and kinds we cannot classify are dropped. A rename that
/// lands inside a watched directory looks like a creation of the new name.
pub(super) fn translate(event: &Event) -> Vec<FsEvent> {
    let op = match event.kind {
        EventKind::Create(_) => Op::Create,
        EventKind::Modify(ModifyKind::Metadata(_)) => Op::Chmod,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => Op::Create,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            return event
                .paths
                .iter()
                .enumerate()
                .map(|(i, path)| {
                    let op = if i == 0 { Op::Rename } else { Op::Create };
                    FsEvent::new(path.clone(), op)
                })
                .collect();
        }
        EventKind::Modify(ModifyKind::Name(_)) => Op::Rename,
        EventKind::Modify(_) => Op::Write,
        EventKind::Remove(_) => Op::Remove,
        EventKind::Access(_) | EventKind::Any | EventKind::Other => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| FsEvent::new(path.clone(), op))
        .collect()
}
