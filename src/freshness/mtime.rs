//! Filesystem modification-time probes.
//!
//! Two flavors: [`probe`] for inputs that must exist (a missing input is an
//! error), [`get_mtime`] for artifacts that may not have been written yet.

use std::path::Path;
use std::time::SystemTime;

use crate::error::{BundleError, Result};

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Modification time of a file that is expected to exist.
pub fn probe(path: &Path) -> Result<SystemTime> {
    path.metadata()
        .and_then(|m| m.modified())
        .map_err(|err| BundleError::io(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_get_mtime_missing() {
        assert_eq!(get_mtime(Path::new("/nonexistent/sheaf/out.js")), None);
    }

    #[test]
    fn test_probe_matches_get_mtime() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();

        assert_eq!(Some(probe(&path).unwrap()), get_mtime(&path));
    }

    #[test]
    fn test_probe_missing_is_io_error() {
        let err = probe(Path::new("/nonexistent/sheaf/a.css")).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }
}
