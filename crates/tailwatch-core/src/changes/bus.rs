//! Producer and consumer halves of the change signal bus.

use super::{Change, SessionEnd};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Create a fresh bus for one monitoring session.
pub fn channel() -> (ChangeNotifier, FileChanges) {
    let (modified_tx, modified) = mpsc::channel(1);
    let (truncated_tx, truncated) = mpsc::channel(1);
    let (deleted_tx, deleted) = mpsc::channel(1);
    let (need_to_close_tx, need_to_close) = mpsc::channel(1);

    let notifier = ChangeNotifier {
        modified: modified_tx,
        truncated: truncated_tx,
        deleted: deleted_tx,
        need_to_close: need_to_close_tx,
    };
    let changes = FileChanges {
        modified,
        truncated,
        deleted,
        need_to_close,
        session: None,
    };
    (notifier, changes)
}

/// Sending half, owned by the monitoring task.
///
/// Closing consumes the notifier, so the bus can only be closed once and
/// nothing can be sent after it.
#[derive(Debug)]
pub struct ChangeNotifier {
    modified: mpsc::Sender<()>,
    truncated: mpsc::Sender<()>,
    deleted: mpsc::Sender<()>,
    need_to_close: mpsc::Sender<()>,
}

impl ChangeNotifier {
    pub fn notify_modified(&self) {
        send_only_if_empty(&self.modified);
    }

    pub fn notify_truncated(&self) {
        send_only_if_empty(&self.truncated);
    }

    pub fn notify_deleted(&self) {
        send_only_if_empty(&self.deleted);
    }

    pub fn notify_need_to_close(&self) {
        send_only_if_empty(&self.need_to_close);
    }

    /// Send the marker for `change`.
    pub fn notify(&self, change: Change) {
        match change {
            Change::Modified => self.notify_modified(),
            Change::Truncated => self.notify_truncated(),
            Change::Deleted => self.notify_deleted(),
            Change::NeedToClose => self.notify_need_to_close(),
        }
    }

    /// Close all four channels. Markers already pending stay readable.
    pub fn close(self) {
        trace!("closing change bus");
        drop(self);
    }

    /// Resolves once every receiver of the bus has been dropped.
    pub async fn abandoned(&self) {
        tokio::join!(
            self.modified.closed(),
            self.truncated.closed(),
            self.deleted.closed(),
            self.need_to_close.closed(),
        );
    }
}

/// Leaves a marker only if none is waiting. A full channel means the
/// consumer has not looked yet; a closed one means it never will.
fn send_only_if_empty(tx: &mpsc::Sender<()>) {
    let _ = tx.try_send(());
}

/// Receiving half, handed to the tailer.
///
/// Each channel can be awaited on its own, or through [`FileChanges::recv`].
/// Once the session ends every channel yields `None` after its pending
/// marker, if any, has been taken.
#[derive(Debug)]
pub struct FileChanges {
    pub modified: mpsc::Receiver<()>,
    pub truncated: mpsc::Receiver<()>,
    pub deleted: mpsc::Receiver<()>,
    pub need_to_close: mpsc::Receiver<()>,
    session: Option<JoinHandle<SessionEnd>>,
}

impl FileChanges {
    pub(crate) fn with_session(mut self, session: JoinHandle<SessionEnd>) -> Self {
        self.session = Some(session);
        self
    }

    /// Wait for the next pending signal on any channel.
    ///
    /// Returns `None` once the bus is closed and drained. When several
    /// markers are pending, `Deleted` is returned last.
    pub async fn recv(&mut self) -> Option<Change> {
        tokio::select! {
            biased;
            Some(()) = self.truncated.recv() => Some(Change::Truncated),
            Some(()) = self.modified.recv() => Some(Change::Modified),
            Some(()) = self.need_to_close.recv() => Some(Change::NeedToClose),
            Some(()) = self.deleted.recv() => Some(Change::Deleted),
            else => None,
        }
    }

    /// Take a pending signal without waiting.
    pub fn try_recv(&mut self) -> Option<Change> {
        if self.truncated.try_recv().is_ok() {
            Some(Change::Truncated)
        } else if self.modified.try_recv().is_ok() {
            Some(Change::Modified)
        } else if self.need_to_close.try_recv().is_ok() {
            Some(Change::NeedToClose)
        } else if self.deleted.try_recv().is_ok() {
            Some(Change::Deleted)
        } else {
            None
        }
    }

    /// Wait for the monitoring task behind this bus and report how it ended.
    ///
    /// The receivers are dropped first, so a task that is still running
    /// stops with [`SessionEnd::Abandoned`] instead of waiting for its next
    /// event. Returns `None` for a bus with no task attached, or if the task
    /// panicked or was aborted.
    pub async fn outcome(self) -> Option<SessionEnd> {
        let FileChanges {
            modified,
            truncated,
            deleted,
            need_to_close,
            session,
        } = self;
        drop((modified, truncated, deleted, need_to_close));
        session?.await.ok()
    }
}
