//! Target path normalization.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute and drop `.` and `..` components lexically.
///
/// Backends report absolute paths, so the target must be absolute to
/// compare equal. Symlinks are left alone: the file may not exist yet.
pub(super) fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_path_is_kept() {
        assert_eq!(
            normalize(Path::new("/var/log/app.log")).unwrap(),
            PathBuf::from("/var/log/app.log")
        );
    }

    #[test]
    fn dot_components_are_removed() {
        assert_eq!(
            normalize(Path::new("/var/./log/../log/app.log")).unwrap(),
            PathBuf::from("/var/log/app.log")
        );
    }

    #[test]
    fn parent_of_root_stays_at_root() {
        assert_eq!(
            normalize(Path::new("/../app.log")).unwrap(),
            PathBuf::from("/app.log")
        );
    }

    #[test]
    fn relative_path_joins_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            normalize(Path::new("./logs/app.log")).unwrap(),
            cwd.join("logs").join("app.log")
        );
    }
}
