//! Filesystem helpers for the merge engine.
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::error::MergeError;

/// Kind of an existing filesystem entry (symlinks are followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or anything that is not a directory).
    File,
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Human-readable noun for messages.
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

/// Return the kind of `path`, or `None` if nothing exists there.
///
/// # Errors
///
/// Returns an error if the metadata lookup fails for any reason other than
/// the path being absent.
pub fn entry_kind(path: &Path) -> Result<Option<EntryKind>, MergeError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(Some(EntryKind::Directory)),
        Ok(_) => Ok(Some(EntryKind::File)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(MergeError::io(path, e)),
    }
}

/// Names of the direct children of `dir`, sorted.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn child_names(dir: &Path) -> Result<BTreeSet<OsString>, MergeError> {
    fs::read_dir(dir)
        .map_err(|e| MergeError::io(dir, e))?
        .map(|entry| {
            entry
                .map(|e| e.file_name())
                .map_err(|e| MergeError::io(dir, e))
        })
        .collect()
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<(), MergeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| MergeError::io(parent, e))?;
    }
    Ok(())
}

/// Copy a single file, keeping its permissions and modification time.
///
/// The modification time is carried over on a best-effort basis; platforms
/// that refuse it still get the content and permissions.
///
/// # Errors
///
/// Returns an error if the content cannot be copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), MergeError> {
    fs::copy(src, dst).map_err(|e| MergeError::io(dst, e))?;
    if let Ok(modified) = fs::metadata(src).and_then(|m| m.modified())
        && let Ok(file) = fs::File::options().write(true).open(dst)
    {
        file.set_modified(modified).ok();
    }
    Ok(())
}
