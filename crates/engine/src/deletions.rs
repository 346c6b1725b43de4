//! Deletion pass: removes replica entries whose source counterparts are
//! gone.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{info, warn};

use crate::cycle::{CyclePlan, CycleSummary};
use crate::error::OpError;
use crate::paths::rebase;

pub(crate) fn apply_deletions(plan: &CyclePlan<'_>) -> CycleSummary {
    let mut summary = CycleSummary::default();

    for (replica_dir, files) in plan.replica.iter() {
        let source_dir = match rebase(replica_dir, plan.replica_root, plan.source_root) {
            Ok(path) => path,
            Err(error) => {
                warn!(%error, "skipping directory");
                summary.failed_ops += 1;
                continue;
            }
        };

        for name in files {
            // Live filesystem check; the source snapshot only records names
            // and a file created after the scan should not be deleted.
            if fs::symlink_metadata(source_dir.join(name)).is_ok() {
                continue;
            }
            let replica_file = replica_dir.join(name);
            match remove_file(&replica_file) {
                Ok(true) => {
                    info!(path = %replica_file.display(), "deleted file");
                    summary.files_deleted += 1;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, "could not delete file");
                    summary.failed_ops += 1;
                }
            }
        }

        if !plan.source.contains_dir(&source_dir) {
            match remove_tree(replica_dir) {
                Ok(true) => {
                    info!(path = %replica_dir.display(), "deleted directory");
                    summary.dirs_deleted += 1;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(%error, "could not delete directory");
                    summary.failed_ops += 1;
                }
            }
        }
    }

    summary
}

/// Removes a file, treating an already-absent path as done: an ancestor
/// subtree removed earlier in this cycle takes its files with it.
fn remove_file(path: &Path) -> Result<bool, OpError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(OpError::io("delete file", path.to_path_buf(), error)),
    }
}

/// Removes a directory subtree with the same already-absent tolerance.
fn remove_tree(path: &Path) -> Result<bool, OpError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(error) => Err(OpError::io("delete directory", path.to_path_buf(), error)),
    }
}
