//! Reference-counted path registrations.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub(super) struct Registry {
    counts: HashMap<PathBuf, usize>,
}

impl Registry {
    pub(super) fn contains(&self, path: &Path) -> bool {
        self.counts.contains_key(path)
    }

    /// Count one more registration. Returns `true` for the first one.
    pub(super) fn acquire(&mut self, path: &Path) -> bool {
        let count = self.counts.entry(path.to_path_buf()).or_insert(0);
        *count += 1;
        *count == 1
    }

    /// Drop one registration. Returns `Some(true)` when it was the last,
    /// `None` when the path was not registered.
    pub(super) fn release(&mut self, path: &Path) -> Option<bool> {
        let count = self.counts.get_mut(path)?;
        *count -= 1;
        if *count == 0 {
            self.counts.remove(path);
            Some(true)
        } else {
            Some(false)
        }
    }

    pub(super) fn len(&self) -> usize {
        self.counts.len()
    }

    pub(super) fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_acquire_and_last_release() {
        let mut registry = Registry::default();
        let path = Path::new("/var/log");

        assert!(registry.acquire(path));
        assert!(!registry.acquire(path));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.release(path), Some(false));
        assert!(registry.contains(path));
        assert_eq!(registry.release(path), Some(true));
        assert!(!registry.contains(path));
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn release_unknown_path() {
        let mut registry = Registry::default();
        assert_eq!(registry.release(Path::new("/nope")), None);
    }
}
