//! Size-based classification of write events.

use crate::changes::Change;

/// Last known size of the watched file.
///
/// A write that leaves the file smaller than before is a truncation;
/// anything else is a modification. A file that was empty can never be
/// truncated, so the first write to an empty file is always `Modified`.
#[derive(Debug, Clone, Copy)]
pub(super) struct SizeTracker {
    size: u64,
}

impl SizeTracker {
    pub(super) fn new(size: u64) -> Self {
        Self { size }
    }

    pub(super) fn size(&self) -> u64 {
        self.size
    }

    /// Record `new_size` and classify the transition from the previous size.
    pub(super) fn observe(&mut self, new_size: u64) -> Change {
        let previous = self.size;
        self.size = new_size;
        if previous > 0 && new_size < previous {
            Change::Truncated
        } else {
            Change::Modified
        }
    }
}
