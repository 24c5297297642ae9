//! In-memory event source driven by hand.

use super::registry::Registry;
use super::{closed_receiver, EventSource, FsEvent, Op};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tailwatch_common::WatchError;
use tokio::sync::broadcast;

/// An [`EventSource`] whose events are injected with [`emit`](Self::emit).
///
/// Useful in tests and for embedding the watcher behind a custom event
/// feed. Registrations are tracked but never touch the filesystem.
#[derive(Debug)]
pub struct ManualEventSource {
    sender: Mutex<Option<broadcast::Sender<FsEvent>>>,
    registry: Mutex<Registry>,
    refuse: AtomicBool,
}

impl ManualEventSource {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Mutex::new(Some(sender)),
            registry: Mutex::new(Registry::default()),
            refuse: AtomicBool::new(false),
        }
    }

    /// Publish an event. Returns the number of subscribers that got it.
    pub fn emit(&self, path: impl Into<PathBuf>, op: Op) -> usize {
        let sender = self.sender.lock().unwrap_or_else(|e| e.into_inner());
        match sender.as_ref() {
            Some(tx) => tx.send(FsEvent::new(path, op)).unwrap_or(0),
            None => 0,
        }
    }

    /// Make subsequent `add` calls fail.
    pub fn refuse_registrations(&self, refuse: bool) {
        self.refuse.store(refuse, Ordering::SeqCst);
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(path)
    }

    /// End the event stream for every subscriber.
    pub fn close(&self) {
        self.sender.lock().unwrap_or_else(|e| e.into_inner()).take();
    }
}

impl Default for ManualEventSource {
    fn default() -> Self {
        Self::new(64)
    }
}

impl EventSource for ManualEventSource {
    fn add(&self, path: &Path) -> Result<(), WatchError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(WatchError::Watch {
                path: path.to_path_buf(),
                message: "registration refused".into(),
            });
        }
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .acquire(path);
        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), WatchError> {
        self.registry
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .release(path)
            .map(|_| ())
            .ok_or_else(|| WatchError::Unwatch {
                path: path.to_path_buf(),
                message: "path is not watched".into(),
            })
    }

    fn subscribe(&self) -> broadcast::Receiver<FsEvent> {
        match self.sender.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            Some(tx) => tx.subscribe(),
            None => closed_receiver(),
        }
    }

    fn registrations(&self) -> usize {
        self.registry.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
