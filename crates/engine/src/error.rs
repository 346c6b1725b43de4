use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error produced when a single mirror operation fails.
#[derive(Debug)]
pub struct OpError {
    kind: OpErrorKind,
}

impl OpError {
    fn new(kind: OpErrorKind) -> Self {
        Self { kind }
    }

    /// Constructs an I/O error with action context.
    #[must_use]
    pub fn io(action: &'static str, path: PathBuf, source: io::Error) -> Self {
        Self::new(OpErrorKind::Io {
            action,
            path,
            source,
        })
    }

    /// Constructs an error for a path that does not live under its root.
    #[must_use]
    pub fn outside_root(path: PathBuf, root: PathBuf) -> Self {
        Self::new(OpErrorKind::OutsideRoot { path, root })
    }

    /// Provides access to the underlying error kind.
    #[must_use]
    pub fn kind(&self) -> &OpErrorKind {
        &self.kind
    }
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            OpErrorKind::Io {
                action,
                path,
                source,
            } => {
                write!(f, "failed to {action} '{}': {source}", path.display())
            }
            OpErrorKind::OutsideRoot { path, root } => {
                write!(
                    f,
                    "path '{}' is not inside root '{}'",
                    path.display(),
                    root.display()
                )
            }
        }
    }
}

impl Error for OpError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            OpErrorKind::Io { source, .. } => Some(source),
            OpErrorKind::OutsideRoot { .. } => None,
        }
    }
}

/// Classification of mirror operation failures.
#[derive(Debug)]
pub enum OpErrorKind {
    /// Filesystem interaction failed.
    Io {
        /// Action being performed.
        action: &'static str,
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// A snapshot path fell outside the root it was expected under.
    OutsideRoot {
        /// Path that failed to rebase.
        path: PathBuf,
        /// Root the path was expected under.
        root: PathBuf,
    },
}
