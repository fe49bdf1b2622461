//! Crash-safe file replacement.
//!
//! Content is written to a temp file next to the target (same directory, so the
//! final rename stays on one filesystem), flushed to disk, then renamed over the
//! target. Temp files carry [`TEMP_FILE_PREFIX`] so anything orphaned by a crash
//! can be found and removed with [`cleanup_orphaned_temp_files`].

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use thiserror::Error;
use tracing::{info, warn};

/// Prefix for temp files created next to the workbook being saved
pub const TEMP_FILE_PREFIX: &str = ".groobi_tmp_";

#[derive(Debug, Error)]
pub enum AtomicWriteError<E> {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("write error: {0}")]
    Writer(E),
}

fn parent_dir_or_dot(path: &Path) -> &Path {
    // `Path::parent` is `Some("")` for bare file names like `data.xlsx`.
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Create a uniquely named temp file in the same directory as `original`.
///
/// The name is `.groobi_tmp_<random>_<original file name>`.
pub fn create_temp_sibling(original: &Path) -> io::Result<NamedTempFile> {
    let dir = parent_dir_or_dot(original);
    let file_name = original
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .suffix(&format!("_{}", file_name))
        .tempfile_in(dir)
}

/// Write `dest` atomically through a temp file.
///
/// `write_fn` receives the open temp file. If `write_fn` or any later step fails,
/// the temp file is removed and `dest` is left untouched.
pub fn atomic_write<T, E>(
    dest: impl AsRef<Path>,
    write_fn: impl FnOnce(&mut File) -> Result<T, E>,
) -> Result<T, AtomicWriteError<E>> {
    let dest = dest.as_ref();
    // Dropping the NamedTempFile on an early return deletes it.
    let mut tmp = create_temp_sibling(dest)?;

    let out = write_fn(tmp.as_file_mut()).map_err(AtomicWriteError::Writer)?;

    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(dest).map_err(|err| AtomicWriteError::Io(err.error))?;

    // Best-effort: the file is already in place.
    let _ = sync_parent_dir(dest);

    Ok(out)
}

fn sync_parent_dir(path: &Path) -> io::Result<()> {
    File::open(parent_dir_or_dot(path))?.sync_all()
}

/// Remove a temp file if it exists. Never fails; returns whether a file was deleted.
pub fn cleanup_temp_file(path: &Path) -> bool {
    if !path.exists() {
        return false;
    }

    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not clean up temp file {}: {}", path.display(), e);
            false
        }
    }
}

/// Delete temp files left behind in `dir` by an interrupted save.
///
/// Only regular files starting with [`TEMP_FILE_PREFIX`] are touched. Returns the
/// number of files deleted.
pub fn cleanup_orphaned_temp_files(dir: &Path) -> usize {
    let pattern = format!(
        "{}/{}*",
        glob::Pattern::escape(&dir.to_string_lossy()),
        TEMP_FILE_PREFIX
    );

    let entries = match glob::glob(&pattern) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Error scanning directory {}: {}", dir.display(), e);
            return 0;
        }
    };

    let orphans: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();

    let mut deleted = 0;
    for path in orphans {
        if cleanup_temp_file(&path) {
            info!("Cleaned up orphaned temp file: {}", path.display());
            deleted += 1;
        }
    }

    deleted
}
