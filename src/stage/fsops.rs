//! File-system primitives for staging: classify, clear, copy.

use crate::error::{Result, StageError};
use filetime::FileTime;
use std::fs;
use std::path::Path;

/// What a path resolves to, following symlinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Missing,
    File,
    Directory,
    /// Exists but is neither file nor directory (dangling symlink, FIFO, socket...)
    Other,
}

/// Classify `path`
///
/// A dangling symlink counts as existing, so it reports as `Other` rather
/// than `Missing`.
#[must_use]
pub fn classify(path: &Path) -> PathKind {
    if fs::symlink_metadata(path).is_err() {
        return PathKind::Missing;
    }

    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => PathKind::File,
        Ok(meta) if meta.is_dir() => PathKind::Directory,
        _ => PathKind::Other,
    }
}

/// Remove every entry inside `dir`, keeping `dir` itself
///
/// Symlinks are removed, never followed. Returns the number of entries removed.
pub fn clear_dir(dir: &Path) -> Result<usize> {
    let mut removed = 0;

    for entry in fs::read_dir(dir).map_err(|e| StageError::fs(dir, e))? {
        let entry = entry.map_err(|e| StageError::fs(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| StageError::fs(&path, e))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        }
        .map_err(|e| StageError::fs(&path, e))?;

        tracing::debug!("Removed {}", path.display());
        removed += 1;
    }

    Ok(removed)
}

/// Copy a file, keeping permissions and access/modification times
///
/// Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64> {
    let bytes = fs::copy(src, dst).map_err(|e| StageError::fs(dst, e))?;

    // Set by path: dst may already carry a read-only mode copied from src
    let meta = fs::metadata(src).map_err(|e| StageError::fs(src, e))?;
    filetime::set_file_times(
        dst,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| StageError::fs(dst, e))?;

    Ok(bytes)
}

/// Recursively copy `src` into `dst`, overwriting same-named entries
///
/// `dst` may already exist. Symlinks are followed; entries that are neither
/// file nor directory are skipped. Returns the number of bytes copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<u64> {
    fs::create_dir_all(dst).map_err(|e| StageError::fs(dst, e))?;

    let mut bytes = 0;
    for entry in fs::read_dir(src).map_err(|e| StageError::fs(src, e))? {
        let entry = entry.map_err(|e| StageError::fs(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());

        let meta = fs::metadata(&from).map_err(|e| StageError::fs(&from, e))?;
        if meta.is_dir() {
            bytes += copy_dir_recursive(&from, &to)?;
        } else if meta.is_file() {
            bytes += copy_file(&from, &to)?;
        } else {
            tracing::warn!("Skipping special file {}", from.display());
        }
    }

    let perms = fs::metadata(src)
        .map_err(|e| StageError::fs(src, e))?
        .permissions();
    fs::set_permissions(dst, perms).map_err(|e| StageError::fs(dst, e))?;

    Ok(bytes)
}
