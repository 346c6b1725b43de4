#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` captures the structural state of a directory tree as a
//! [`TreeSnapshot`]: one entry per directory, each listing the file names
//! directly inside it. The mirror engine captures one snapshot of the source
//! tree and one of the replica tree at the start of every sync cycle and
//! diffs the pair; snapshots are discarded when the cycle ends.
//!
//! # Design
//!
//! - Traversal is iterative and top-down. Directories are stored in a
//!   [`BTreeMap`] keyed by absolute path, so [`TreeSnapshot::iter`] yields
//!   every directory before any of its descendants and runs are
//!   deterministic across platforms.
//! - Subdirectories are represented solely by their own entries. Whether a
//!   path is a directory in the snapshot is answered by key lookup
//!   ([`TreeSnapshot::contains_dir`]), never by scanning file lists.
//! - File names are recorded sorted. Symlinks are recorded as file entries
//!   and never followed.
//! - Names in the caller's [`ExcludedNames`] set are suppressed at every
//!   directory level, not just the root.
//!
//! # Invariants
//!
//! - Every directory the walk managed to read has exactly one entry,
//!   including empty directories.
//! - A snapshot is immutable once captured.
//!
//! # Errors
//!
//! An unreadable directory is logged at warn level and skipped; the rest of
//! the snapshot is still produced, so one inaccessible subtree cannot blind
//! the reconciler to the remainder of the tree. When even the root cannot be
//! read, the snapshot comes back without its root entry;
//! [`TreeSnapshot::has_root_entry`] lets the orchestrator detect that state
//! before acting on an empty view.

use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Set of file names ignored at every directory level during a walk.
#[derive(Clone, Debug, Default)]
pub struct ExcludedNames {
    names: FxHashSet<OsString>,
}

impl ExcludedNames {
    /// Creates an empty exclusion set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file name to the set.
    pub fn insert(&mut self, name: impl Into<OsString>) {
        self.names.insert(name.into());
    }

    /// Reports whether `name` is excluded.
    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

    /// Reports whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<OsString>> FromIterator<S> for ExcludedNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Point-in-time structural record of one directory tree.
#[derive(Clone, Debug)]
pub struct TreeSnapshot {
    root: PathBuf,
    dirs: BTreeMap<PathBuf, Vec<OsString>>,
}

impl TreeSnapshot {
    /// Walks `root` and records every readable directory with its sorted
    /// file names, minus `excluded` entries.
    #[must_use]
    pub fn capture(root: &Path, excluded: &ExcludedNames) -> Self {
        let mut dirs = BTreeMap::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(error) => {
                    warn!(path = %dir.display(), %error, "skipping unreadable directory");
                    continue;
                }
            };

            let mut files = Vec::new();
            for entry in entries {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(error) => {
                        warn!(path = %dir.display(), %error, "skipping unreadable entry");
                        continue;
                    }
                };
                let file_type = match entry.file_type() {
                    Ok(file_type) => file_type,
                    Err(error) => {
                        warn!(path = %entry.path().display(), %error, "skipping entry without type");
                        continue;
                    }
                };
                if file_type.is_dir() {
                    pending.push(entry.path());
                } else {
                    let name = entry.file_name();
                    if !excluded.contains(&name) {
                        files.push(name);
                    }
                }
            }
            files.sort();
            dirs.insert(dir, files);
        }

        Self {
            root: root.to_path_buf(),
            dirs,
        }
    }

    /// Returns the root the snapshot was captured from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reports whether the walk managed to read the root directory itself.
    #[must_use]
    pub fn has_root_entry(&self) -> bool {
        self.dirs.contains_key(&self.root)
    }

    /// Reports whether `path` was recorded as a directory.
    #[must_use]
    pub fn contains_dir(&self, path: &Path) -> bool {
        self.dirs.contains_key(path)
    }

    /// Number of directories recorded.
    #[must_use]
    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }

    /// Iterates directories parents-first, each with its sorted file names.
    pub fn iter(&self) -> Dirs<'_> {
        Dirs {
            inner: self.dirs.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a TreeSnapshot {
    type Item = (&'a Path, &'a [OsString]);
    type IntoIter = Dirs<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over snapshot directories in parents-first order.
pub struct Dirs<'a> {
    inner: btree_map::Iter<'a, PathBuf, Vec<OsString>>,
}

impl<'a> Iterator for Dirs<'a> {
    type Item = (&'a Path, &'a [OsString]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(path, files)| (path.as_path(), files.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(files: &[OsString]) -> Vec<&str> {
        files.iter().filter_map(|name| name.to_str()).collect()
    }

    #[test]
    fn records_every_directory_including_empty_ones() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        fs::create_dir(&root).expect("create root");
        fs::create_dir(root.join("empty")).expect("create empty");
        fs::create_dir_all(root.join("a/b")).expect("create nested");
        fs::write(root.join("a/b/deep.txt"), b"data").expect("write deep");

        let snapshot = TreeSnapshot::capture(&root, &ExcludedNames::new());

        assert!(snapshot.has_root_entry());
        assert!(snapshot.contains_dir(&root.join("empty")));
        assert!(snapshot.contains_dir(&root.join("a")));
        assert!(snapshot.contains_dir(&root.join("a/b")));
        assert_eq!(snapshot.dir_count(), 4);

        let empty_entry = snapshot
            .iter()
            .find(|(path, _)| *path == root.join("empty"))
            .expect("empty dir entry");
        assert!(empty_entry.1.is_empty());
    }

    #[test]
    fn file_names_are_sorted_and_directories_are_not_listed_as_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        fs::create_dir(&root).expect("create root");
        fs::write(root.join("zeta.txt"), b"z").expect("write");
        fs::write(root.join("alpha.txt"), b"a").expect("write");
        fs::create_dir(root.join("subdir")).expect("create subdir");

        let snapshot = TreeSnapshot::capture(&root, &ExcludedNames::new());
        let (_, files) = snapshot.iter().next().expect("root entry");
        assert_eq!(names(files), vec!["alpha.txt", "zeta.txt"]);
    }

    #[test]
    fn iteration_yields_parents_before_children() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("outer/inner")).expect("create tree");
        fs::create_dir(root.join("outer-sibling")).expect("create sibling");

        let snapshot = TreeSnapshot::capture(&root, &ExcludedNames::new());
        let order: Vec<PathBuf> = snapshot.iter().map(|(path, _)| path.to_path_buf()).collect();

        for (index, path) in order.iter().enumerate() {
            if let Some(parent) = path.parent() {
                if snapshot.contains_dir(parent) {
                    let parent_index = order
                        .iter()
                        .position(|candidate| candidate == parent)
                        .expect("parent present");
                    assert!(parent_index < index, "{} before {}", parent.display(), path.display());
                }
            }
        }
    }

    #[test]
    fn excluded_names_are_suppressed_at_every_level() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        fs::create_dir_all(root.join("nested")).expect("create tree");
        fs::write(root.join("ignore.tmp"), b"x").expect("write");
        fs::write(root.join("keep.txt"), b"x").expect("write");
        fs::write(root.join("nested/ignore.tmp"), b"x").expect("write");
        fs::write(root.join("nested/keep.txt"), b"x").expect("write");

        let excluded: ExcludedNames = ["ignore.tmp"].into_iter().collect();
        let snapshot = TreeSnapshot::capture(&root, &excluded);

        for (_, files) in snapshot.iter() {
            assert_eq!(names(files), vec!["keep.txt"]);
        }
    }

    #[test]
    fn missing_root_leaves_snapshot_without_root_entry() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("absent");

        let snapshot = TreeSnapshot::capture(&root, &ExcludedNames::new());
        assert!(!snapshot.has_root_entry());
        assert_eq!(snapshot.dir_count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_is_skipped_without_blinding_the_rest() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        let locked = root.join("locked");
        fs::create_dir(&root).expect("create root");
        fs::create_dir(&locked).expect("create locked");
        fs::write(root.join("visible.txt"), b"x").expect("write");

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod");
        if fs::read_dir(&locked).is_ok() {
            // Running privileged; the permission barrier does not apply.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");
            return;
        }

        let snapshot = TreeSnapshot::capture(&root, &ExcludedNames::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).expect("chmod back");

        assert!(snapshot.has_root_entry());
        assert!(!snapshot.contains_dir(&locked));
        let (_, files) = snapshot.iter().next().expect("root entry");
        assert_eq!(names(files), vec!["visible.txt"]);
    }
}
