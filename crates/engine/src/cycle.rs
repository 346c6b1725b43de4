//! One snapshot-and-reconcile pass over the two trees.

use std::path::Path;

use tracing::{debug, warn};
use walk::{ExcludedNames, TreeSnapshot};

use crate::additions::apply_additions;
use crate::deletions::apply_deletions;

/// Inputs shared by both reconciler passes for the duration of one cycle.
///
/// Snapshots are borrowed immutably; they are captured at the top of
/// [`run_cycle`] and discarded when it returns.
pub(crate) struct CyclePlan<'a> {
    pub(crate) source_root: &'a Path,
    pub(crate) replica_root: &'a Path,
    pub(crate) source: &'a TreeSnapshot,
    pub(crate) replica: &'a TreeSnapshot,
}

/// Counters aggregated over one reconciliation cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Replica directories created.
    pub dirs_created: u64,
    /// Files copied because the replica was missing them.
    pub files_copied: u64,
    /// Files re-copied because their content diverged.
    pub files_updated: u64,
    /// Replica files deleted.
    pub files_deleted: u64,
    /// Replica directory subtrees deleted.
    pub dirs_deleted: u64,
    /// Operations that failed and were skipped.
    pub failed_ops: u64,
}

impl CycleSummary {
    /// Total number of filesystem mutations applied.
    #[must_use]
    pub const fn changes(&self) -> u64 {
        self.dirs_created
            + self.files_copied
            + self.files_updated
            + self.files_deleted
            + self.dirs_deleted
    }

    /// Reports whether the cycle applied no mutations and hit no failures.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.changes() == 0 && self.failed_ops == 0
    }

    /// Field-wise sum of two summaries.
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        Self {
            dirs_created: self.dirs_created + other.dirs_created,
            files_copied: self.files_copied + other.files_copied,
            files_updated: self.files_updated + other.files_updated,
            files_deleted: self.files_deleted + other.files_deleted,
            dirs_deleted: self.dirs_deleted + other.dirs_deleted,
            failed_ops: self.failed_ops + other.failed_ops,
        }
    }
}

/// Captures a snapshot of each tree and converges the replica onto the
/// source.
///
/// The addition/update pass and the deletion pass run as a fan-out/join
/// pair over the same snapshot pair; both complete before this returns.
/// Individual operation failures are logged and counted, never propagated.
#[must_use]
pub fn run_cycle(
    source_root: &Path,
    replica_root: &Path,
    excluded: &ExcludedNames,
) -> CycleSummary {
    let source = TreeSnapshot::capture(source_root, excluded);
    let replica = TreeSnapshot::capture(replica_root, excluded);

    // A source walk that could not read its own root yields an empty view;
    // diffing against it would schedule deletion of the whole replica.
    if !source.has_root_entry() {
        warn!(path = %source_root.display(), "source tree unreadable, skipping cycle");
        return CycleSummary {
            failed_ops: 1,
            ..CycleSummary::default()
        };
    }

    debug!(
        source_dirs = source.dir_count(),
        replica_dirs = replica.dir_count(),
        "snapshots captured"
    );

    let plan = CyclePlan {
        source_root,
        replica_root,
        source: &source,
        replica: &replica,
    };

    let (additions, deletions) = rayon::join(|| apply_additions(&plan), || apply_deletions(&plan));
    additions.combine(deletions)
}
