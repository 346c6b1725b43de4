//! Addition/update pass: converges replica directories and file contents
//! onto the source snapshot.

use std::fs;
use std::io;
use std::path::Path;

use checksums::ContentFingerprint;
use filetime::FileTime;
use tracing::{info, warn};

use crate::cycle::{CyclePlan, CycleSummary};
use crate::error::OpError;
use crate::paths::rebase;

/// Outcome of converging one replica file onto its source counterpart.
enum FileSync {
    /// The replica file did not exist and was copied fresh.
    Copied,
    /// The replica content had diverged and was re-copied.
    Updated,
    /// A directory occupied the replica path and was replaced by the file.
    ReplacedDirectory,
    /// Nothing to do.
    Unchanged,
}

pub(crate) fn apply_additions(plan: &CyclePlan<'_>) -> CycleSummary {
    let mut summary = CycleSummary::default();

    for (source_dir, files) in plan.source.iter() {
        let replica_dir = match rebase(source_dir, plan.source_root, plan.replica_root) {
            Ok(path) => path,
            Err(error) => {
                warn!(%error, "skipping directory");
                summary.failed_ops += 1;
                continue;
            }
        };

        // Key lookup against the snapshot; the live filesystem is consulted
        // inside ensure_directory because this cycle may already have
        // created the path.
        if !plan.replica.contains_dir(&replica_dir) {
            match ensure_directory(&replica_dir) {
                Ok(true) => {
                    info!(path = %replica_dir.display(), "new directory");
                    summary.dirs_created += 1;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, "could not create directory");
                    summary.failed_ops += 1;
                    continue;
                }
            }
        }

        for name in files {
            let source_file = source_dir.join(name);
            let replica_file = replica_dir.join(name);
            match sync_file(&source_file, &replica_file) {
                Ok(FileSync::Copied) => {
                    info!(path = %replica_file.display(), "new file");
                    summary.files_copied += 1;
                }
                Ok(FileSync::Updated) => {
                    info!(path = %replica_file.display(), "changed file");
                    summary.files_updated += 1;
                }
                Ok(FileSync::ReplacedDirectory) => {
                    info!(path = %replica_file.display(), "replaced directory with file");
                    summary.files_updated += 1;
                }
                Ok(FileSync::Unchanged) => {}
                Err(error) => {
                    warn!(%error, "could not sync file");
                    summary.failed_ops += 1;
                }
            }
        }
    }

    summary
}

/// Creates `path` as a directory, displacing any non-directory entry that
/// occupies it. Returns `true` when a directory was actually created.
fn ensure_directory(path: &Path) -> Result<bool, OpError> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => return Ok(false),
        Ok(_) => {
            fs::remove_file(path)
                .map_err(|error| OpError::io("displace non-directory", path.to_path_buf(), error))?;
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => {}
        Err(error) => {
            return Err(OpError::io("inspect", path.to_path_buf(), error));
        }
    }
    fs::create_dir(path)
        .map_err(|error| OpError::io("create directory", path.to_path_buf(), error))?;
    Ok(true)
}

/// Converges one replica file onto its source counterpart.
///
/// The existence check runs against the live filesystem rather than the
/// replica snapshot: the directory pass above may have created the parent
/// after the snapshot was taken.
fn sync_file(source: &Path, replica: &Path) -> Result<FileSync, OpError> {
    let source_meta = fs::metadata(source)
        .map_err(|error| OpError::io("inspect", source.to_path_buf(), error))?;

    let replica_meta = match fs::symlink_metadata(replica) {
        Ok(metadata) => metadata,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            copy_with_mtime(source, replica, &source_meta)?;
            return Ok(FileSync::Copied);
        }
        Err(error) => {
            return Err(OpError::io("inspect", replica.to_path_buf(), error));
        }
    };

    if replica_meta.is_dir() {
        // The path swapped roles from directory to file on the source side.
        fs::remove_dir_all(replica)
            .map_err(|error| OpError::io("displace directory", replica.to_path_buf(), error))?;
        copy_with_mtime(source, replica, &source_meta)?;
        return Ok(FileSync::ReplacedDirectory);
    }

    let source_mtime = FileTime::from_last_modification_time(&source_meta);
    let replica_mtime = FileTime::from_last_modification_time(&replica_meta);
    if source_mtime == replica_mtime {
        return Ok(FileSync::Unchanged);
    }

    let source_print = ContentFingerprint::of_file(source)
        .map_err(|error| OpError::io("fingerprint", source.to_path_buf(), error))?;
    let replica_print = ContentFingerprint::of_file(replica)
        .map_err(|error| OpError::io("fingerprint", replica.to_path_buf(), error))?;
    if source_print == replica_print {
        return Ok(FileSync::Unchanged);
    }

    fs::remove_file(replica)
        .map_err(|error| OpError::io("remove stale file", replica.to_path_buf(), error))?;
    copy_with_mtime(source, replica, &source_meta)?;
    Ok(FileSync::Updated)
}

/// Copies `source` over `replica` and restamps the source modification time
/// so the next cycle's mtime pre-filter sees the pair as unchanged.
fn copy_with_mtime(
    source: &Path,
    replica: &Path,
    source_meta: &fs::Metadata,
) -> Result<(), OpError> {
    fs::copy(source, replica)
        .map_err(|error| OpError::io("copy", source.to_path_buf(), error))?;
    let mtime = FileTime::from_last_modification_time(source_meta);
    filetime::set_file_mtime(replica, mtime)
        .map_err(|error| OpError::io("set modification time", replica.to_path_buf(), error))?;
    Ok(())
}
