// ============================================================================
// dircomp-core/src/processing/copy.rs
// ============================================================================
//
// PLAIN COPY: Unchanged copies of files, links and whole subtrees
//
// Files are copied byte for byte, replacing any earlier copy. Permissions
// come along with `fs::copy`; access and modification times are restored with
// `filetime`. Symbolic links are recreated as links rather than followed, so
// dangling links survive a copy instead of failing it.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;
use log::trace;
use walkdir::WalkDir;

use crate::error::{CoreError, CoreResult, io_error};

/// Counters for a wholesale subtree copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub files: u64,
    pub bytes: u64,
    pub directories: u64,
    pub links: u64,
}

/// Copies a regular file, preserving permissions and timestamps.
///
/// Returns the number of bytes copied.
pub fn copy_file(source: &Path, destination: &Path) -> CoreResult<u64> {
    let metadata = fs::metadata(source).map_err(|e| io_error(source, e))?;
    // A previous run may have left a read-only copy behind.
    if fs::symlink_metadata(destination).is_ok_and(|m| !m.is_dir()) {
        fs::remove_file(destination).map_err(|e| io_error(destination, e))?;
    }
    let bytes = fs::copy(source, destination).map_err(|e| io_error(destination, e))?;

    let atime = FileTime::from_last_access_time(&metadata);
    let mtime = FileTime::from_last_modification_time(&metadata);
    filetime::set_file_times(destination, atime, mtime).map_err(|e| io_error(destination, e))?;

    trace!("Copied {} -> {} ({bytes} bytes)", source.display(), destination.display());
    Ok(bytes)
}

/// Recreates the symbolic link `source` at `destination`, pointing at the
/// same (possibly relative, possibly missing) target.
#[cfg(unix)]
pub fn copy_symlink(source: &Path, destination: &Path) -> CoreResult<()> {
    let target = fs::read_link(source).map_err(|e| io_error(source, e))?;
    if fs::symlink_metadata(destination).is_ok() {
        fs::remove_file(destination).map_err(|e| io_error(destination, e))?;
    }
    std::os::unix::fs::symlink(&target, destination).map_err(|e| io_error(destination, e))?;
    trace!("Linked {} -> {}", destination.display(), target.display());
    Ok(())
}

/// Symbolic links cannot be recreated portably here.
#[cfg(not(unix))]
pub fn copy_symlink(source: &Path, _destination: &Path) -> CoreResult<()> {
    Err(CoreError::UnsupportedEntry(source.to_path_buf()))
}

/// Copies the directory `source` and everything below it to `destination`.
pub fn copy_tree(source: &Path, destination: &Path) -> CoreResult<CopyStats> {
    let mut stats = CopyStats::default();

    for entry in WalkDir::new(source).follow_links(false).sort_by_file_name() {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            io_error(
                entry.path(),
                io::Error::other(format!("entry is outside {}", source.display())),
            )
        })?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| io_error(&target, e))?;
            stats.directories += 1;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
            stats.links += 1;
        } else if file_type.is_file() {
            stats.bytes += copy_file(entry.path(), &target)?;
            stats.files += 1;
        } else {
            return Err(CoreError::UnsupportedEntry(entry.path().to_path_buf()));
        }
    }

    Ok(stats)
}
