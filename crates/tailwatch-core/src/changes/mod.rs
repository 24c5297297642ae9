//! Change signal bus.
//!
//! Four one-slot channels, one per [`Change`] kind. A notification is a
//! pending flag rather than a queue entry: repeated notifications of the
//! same kind collapse until the consumer takes the marker.

mod bus;

#[cfg(test)]
mod tests;

pub use bus::{channel, ChangeNotifier, FileChanges};

/// A signal observed on a [`FileChanges`] bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Change {
    /// Data was appended or rewritten without shrinking the file.
    Modified,
    /// The file shrank since the last observation.
    Truncated,
    /// The file was removed or renamed away. Always the last signal.
    Deleted,
    /// The file is gone but the handle is still alive; close it.
    NeedToClose,
}

/// How a monitoring session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// The file was removed or renamed; `Deleted` was sent.
    Deleted,
    /// The caller's cancellation token fired.
    Cancelled,
    /// The underlying event stream closed.
    StreamClosed,
    /// Every receiver of the bus was dropped.
    Abandoned,
    /// Stat failed with something other than "not found".
    Failed(std::io::Error),
}
