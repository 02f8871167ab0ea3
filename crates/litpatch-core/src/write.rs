//! Whole-file IO for patch units
//!
//! Writes go through a temporary file in the target's directory that is
//! renamed over the target. Readers never observe a partial file; a failure
//! before the rename leaves the original untouched and the temporary file is
//! removed when dropped.

use crate::error::PatchError;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read a target file fully as UTF-8
///
/// # Errors
/// Returns [`PatchError::Read`] if the file is missing, unreadable or not
/// valid UTF-8
pub fn read_target(path: &Path) -> Result<String, PatchError> {
    fs::read_to_string(path).map_err(|e| PatchError::read(path, e))
}

/// Replace `path` with `content` atomically
///
/// Symlinks are followed, so the file they point to is rewritten and the
/// link itself is kept. The original file's permissions are carried over to
/// the new file.
///
/// # Errors
/// Returns [`PatchError::Write`] if staging, syncing or renaming fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), PatchError> {
    let err = |e: std::io::Error| PatchError::write(path, e);

    // Paths that do not resolve yet are written as given.
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match resolved.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(err)?;
    staged.write_all(content.as_bytes()).map_err(err)?;
    staged.as_file().sync_all().map_err(err)?;

    if let Ok(meta) = fs::metadata(&resolved) {
        staged
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(err)?;
    }

    staged.persist(&resolved).map_err(|e| err(e.error))?;
    tracing::debug!(path = %resolved.display(), bytes = content.len(), "target rewritten");
    Ok(())
}
