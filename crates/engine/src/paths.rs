use std::path::{Path, PathBuf};

use crate::error::OpError;

/// Maps a path under one mirror root onto the corresponding path under the
/// other root.
///
/// The rebase is component-wise: the known root prefix is stripped and the
/// remainder joined onto the target root, so a root path that happens to be
/// a textual substring of an unrelated path segment can never mis-map.
pub(crate) fn rebase(path: &Path, from_root: &Path, to_root: &Path) -> Result<PathBuf, OpError> {
    let relative = path
        .strip_prefix(from_root)
        .map_err(|_| OpError::outside_root(path.to_path_buf(), from_root.to_path_buf()))?;
    Ok(to_root.join(relative))
}
