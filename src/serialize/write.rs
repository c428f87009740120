//! Atomic artifact writes.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;

use crate::error::{BundleError, Result};

/// Prefix of in-flight temporary files, next to their final artifact.
pub const TEMP_PREFIX: &str = ".sheaf-";

/// Write `data` to `path` so readers see either the old or the new file.
///
/// Data goes to a temporary file in the same directory, which then
/// replaces `path` with a rename. Missing parent directories are created.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent).map_err(|err| BundleError::io(parent, err))?;

    let mut tmp = Builder::new()
        .prefix(TEMP_PREFIX)
        .tempfile_in(parent)
        .map_err(|err| BundleError::io(parent, err))?;

    if let Err(err) = tmp.write_all(data).and_then(|()| tmp.flush()) {
        return Err(BundleError::io(tmp.path(), err));
    }

    // Temp files are private; artifacts are served.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|err| BundleError::io(tmp.path(), err))?;
    }

    tmp.persist(path)
        .map_err(|err| BundleError::io(path, err.error))?;
    Ok(())
}
