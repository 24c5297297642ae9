//! Single-file watcher.
//!
//! [`FileWatcher`] waits for a file to appear and then follows it,
//! turning raw events into [`Change`](crate::Change) signals.

mod file_watcher;
mod monitor;
mod path;
mod size;


pub use file_watcher::FileWatcher;
