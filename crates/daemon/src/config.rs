//! Mirror configuration, validated once at construction.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use walk::ExcludedNames;

/// Validated configuration for one mirror daemon instance.
///
/// Construction canonicalises both roots and checks every invariant the
/// cycle loop relies on, so a `MirrorConfig` value is always safe to run.
#[derive(Clone, Debug)]
pub struct MirrorConfig {
    source_root: PathBuf,
    replica_root: PathBuf,
    interval: Duration,
    excluded: ExcludedNames,
}

impl MirrorConfig {
    /// Builds a configuration, rejecting invalid inputs before any
    /// background work or filesystem mutation can happen.
    pub fn new(
        source_root: &Path,
        replica_root: &Path,
        interval_secs: u64,
        excluded: ExcludedNames,
    ) -> Result<Self, ConfigError> {
        let source_root = canonical_dir(source_root, RootRole::Source)?;
        let replica_root = canonical_dir(replica_root, RootRole::Replica)?;

        // Component-wise prefix test on canonical paths; nested roots would
        // let the reconciler act on its own output.
        if source_root.starts_with(&replica_root) || replica_root.starts_with(&source_root) {
            return Err(ConfigError::NestedRoots {
                source_root,
                replica_root,
            });
        }

        if interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(Self {
            source_root,
            replica_root,
            interval: Duration::from_secs(interval_secs),
            excluded,
        })
    }

    /// Canonical source root.
    #[must_use]
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    /// Canonical replica root.
    #[must_use]
    pub fn replica_root(&self) -> &Path {
        &self.replica_root
    }

    /// Pause between the end of one cycle and the start of the next.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// File names ignored at every directory level of both trees.
    #[must_use]
    pub fn excluded(&self) -> &ExcludedNames {
        &self.excluded
    }
}

fn canonical_dir(path: &Path, role: RootRole) -> Result<PathBuf, ConfigError> {
    let canonical = fs::canonicalize(path).map_err(|source| ConfigError::Inaccessible {
        role,
        path: path.to_path_buf(),
        source,
    })?;
    if !canonical.is_dir() {
        return Err(ConfigError::NotADirectory {
            role,
            path: path.to_path_buf(),
        });
    }
    Ok(canonical)
}

/// Identifies which mirror root a configuration error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RootRole {
    /// The tree being mirrored from.
    Source,
    /// The tree being converged onto the source.
    Replica,
}

impl fmt::Display for RootRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Replica => f.write_str("replica"),
        }
    }
}

/// Rejected configuration; raised synchronously before the loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A root path does not exist or cannot be resolved.
    #[error("{role} root '{}' is not accessible: {source}", path.display())]
    Inaccessible {
        /// Which root failed.
        role: RootRole,
        /// Path as supplied by the caller.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A root path resolves to something other than a directory.
    #[error("{role} root '{}' is not a directory", path.display())]
    NotADirectory {
        /// Which root failed.
        role: RootRole,
        /// Path as supplied by the caller.
        path: PathBuf,
    },
    /// The roots are nested within one another (or identical).
    #[error(
        "source root '{}' and replica root '{}' are nested",
        source_root.display(),
        replica_root.display()
    )]
    NestedRoots {
        /// Canonical source root.
        source_root: PathBuf,
        /// Canonical replica root.
        replica_root: PathBuf,
    },
    /// The sync interval was zero.
    #[error("sync interval must be at least one second")]
    ZeroInterval,
}
