//! File change notification for tailers.
//!
//! A [`FileWatcher`] follows one file through a shared [`EventSource`]
//! and reports appends, truncations, deletions and reopen requests on a
//! [`FileChanges`] bus. Each kind of signal holds at most one pending
//! marker, so a slow reader never holds up the watcher.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tailwatch_core::{Change, FileWatcher, NotifyEventSource};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(NotifyEventSource::new(1024)?);
//! let watcher = FileWatcher::new("/var/log/app.log", source)?;
//! let cancel = CancellationToken::new();
//!
//! watcher.block_until_exists(&cancel).await?;
//! let file = std::fs::File::open(watcher.path())?;
//! let mut changes = watcher.change_events(&cancel, &file.metadata()?)?;
//!
//! while let Some(change) = changes.recv().await {
//!     match change {
//!         Change::Modified => { /* read new bytes */ }
//!         Change::Truncated => { /* seek to start */ }
//!         Change::NeedToClose => { /* release the handle */ }
//!         Change::Deleted => break,
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod changes;
pub mod events;
pub mod watcher;

pub use changes::{Change, ChangeNotifier, FileChanges, SessionEnd};
pub use events::{EventSource, FsEvent, ManualEventSource, NotifyEventSource, Op};
pub use watcher::FileWatcher;
