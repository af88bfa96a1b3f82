//! Raw event normalization
//!
//! Turns the best-effort event stream of the watcher into canonical
//! [`SyncOperation`]s. The normalizer keeps no state between events:
//! the same event always yields the same operations.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing::debug;

use crate::filter::IgnoreFilter;

/// What happened to a path, as reported by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventKind {
    /// Path appeared
    Created,
    /// Path content or metadata changed
    Modified,
    /// Path disappeared
    Deleted,
    /// Path was renamed to `dest`
    Moved {
        /// New location
        dest: PathBuf,
    },
}

/// One filesystem notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Event kind
    pub kind: RawEventKind,
    /// Absolute local path (the source for moves)
    pub path: PathBuf,
    /// Whether the path is a directory
    pub is_directory: bool,
    /// When the event was observed
    pub timestamp: DateTime<Local>,
}

impl RawEvent {
    /// Create an event stamped with the current time
    pub fn new(kind: RawEventKind, path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            kind,
            path: path.into(),
            is_directory,
            timestamp: Local::now(),
        }
    }

    /// Shorthand for a `Created` event
    pub fn created(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self::new(RawEventKind::Created, path, is_directory)
    }

    /// Shorthand for a `Modified` event
    pub fn modified(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self::new(RawEventKind::Modified, path, is_directory)
    }

    /// Shorthand for a `Deleted` event
    pub fn deleted(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self::new(RawEventKind::Deleted, path, is_directory)
    }

    /// Shorthand for a `Moved` event
    pub fn moved(src: impl Into<PathBuf>, dest: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self::new(
            RawEventKind::Moved { dest: dest.into() },
            src,
            is_directory,
        )
    }
}

/// Canonical operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Path must be sent to the remote
    Created,
    /// File must be re-sent
    Modified,
    /// Remote counterpart must go
    Deleted,
}

/// Deduplicated unit of work for the action builder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncOperation {
    /// Operation kind
    pub kind: OperationKind,
    /// Absolute local path
    pub local_path: PathBuf,
    /// Whether the path is a directory
    pub is_directory: bool,
}

/// Read-only view of the local tree used by the normalizer
pub trait LocalTree {
    /// Whether `path` currently exists as a directory
    fn is_dir(&self, path: &Path) -> bool;
}

/// The real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskTree;

impl LocalTree for DiskTree {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Converts raw events into sync operations for one root
#[derive(Debug, Clone)]
pub struct EventNormalizer<T = DiskTree> {
    filter: IgnoreFilter,
    tree: T,
}

impl EventNormalizer<DiskTree> {
    /// Normalizer backed by the real filesystem
    #[must_use]
    pub const fn new(filter: IgnoreFilter) -> Self {
        Self {
            filter,
            tree: DiskTree,
        }
    }
}

impl<T: LocalTree> EventNormalizer<T> {
    /// Normalizer backed by a custom tree view
    pub const fn with_tree(filter: IgnoreFilter, tree: T) -> Self {
        Self { filter, tree }
    }

    /// Normalize one raw event. Yields zero, one or two operations.
    #[must_use]
    pub fn normalize(&self, event: &RawEvent) -> Vec<SyncOperation> {
        match &event.kind {
            RawEventKind::Created => self.created(&event.path, event.is_directory).into_iter().collect(),
            RawEventKind::Deleted => self.deleted(&event.path, event.is_directory).into_iter().collect(),
            RawEventKind::Modified => {
                self.modified(&event.path, event.is_directory).into_iter().collect()
            }
            RawEventKind::Moved { dest } => {
                // Both legs, even for a same-directory rename
                self.deleted(&event.path, event.is_directory)
                    .into_iter()
                    .chain(self.created(dest, event.is_directory))
                    .collect()
            }
        }
    }

    fn created(&self, path: &Path, is_directory: bool) -> Option<SyncOperation> {
        if self.filter.should_ignore(path) {
            debug!(path = %path.display(), "Ignored create");
            return None;
        }
        Some(operation(OperationKind::Created, path, is_directory))
    }

    fn deleted(&self, path: &Path, is_directory: bool) -> Option<SyncOperation> {
        if self.filter.should_ignore(path) {
            debug!(path = %path.display(), "Ignored delete");
            return None;
        }

        // The parent's own deletion event covers this path
        let parent_exists = path.parent().is_some_and(|p| self.tree.is_dir(p));
        if !parent_exists {
            debug!(path = %path.display(), "Parent already gone, dropping delete");
            return None;
        }

        Some(operation(OperationKind::Deleted, path, is_directory))
    }

    fn modified(&self, path: &Path, is_directory: bool) -> Option<SyncOperation> {
        if is_directory {
            return None;
        }
        if self.filter.should_ignore(path) {
            debug!(path = %path.display(), "Ignored modify");
            return None;
        }
        Some(operation(OperationKind::Modified, path, false))
    }
}

fn operation(kind: OperationKind, path: &Path, is_directory: bool) -> SyncOperation {
    SyncOperation {
        kind,
        local_path: path.to_path_buf(),
        is_directory,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// Tree where only the listed directories exist
    struct FakeTree(HashSet<PathBuf>);

    impl LocalTree for FakeTree {
        fn is_dir(&self, path: &Path) -> bool {
            self.0.contains(path)
        }
    }

    fn normalizer(ignore: &[&str], dirs: &[&str]) -> EventNormalizer<FakeTree> {
        let patterns: Vec<String> = ignore.iter().map(|p| (*p).to_string()).collect();
        let tree = FakeTree(dirs.iter().map(PathBuf::from).collect());
        EventNormalizer::with_tree(IgnoreFilter::new(&patterns), tree)
    }

    fn op(kind: OperationKind, path: &str, is_directory: bool) -> SyncOperation {
        operation(kind, Path::new(path), is_directory)
    }

    #[test]
    fn test_created_file() {
        let n = normalizer(&[], &["/p"]);
        let ops = n.normalize(&RawEvent::created("/p/a.txt", false));

        assert_eq!(ops, vec![op(OperationKind::Created, "/p/a.txt", false)]);
    }

    #[test]
    fn test_created_ignored() {
        let n = normalizer(&[".git"], &["/p"]);

        assert!(n.normalize(&RawEvent::created("/p/.git/x", false)).is_empty());
    }

    #[test]
    fn test_deleted_with_parent_present() {
        let n = normalizer(&[], &["/p", "/p/a"]);
        let ops = n.normalize(&RawEvent::deleted("/p/a/b.txt", false));

        assert_eq!(ops, vec![op(OperationKind::Deleted, "/p/a/b.txt", false)]);
    }

    #[test]
    fn test_deleted_parent_gone() {
        let n = normalizer(&[], &["/p"]);

        assert!(n.normalize(&RawEvent::deleted("/p/a/b.txt", false)).is_empty());
    }

    #[test]
    fn test_directory_modified_suppressed() {
        let n = normalizer(&[], &["/p", "/p/a"]);

        for dir in ["/p", "/p/a", "/p/a/b", "/p/.git"] {
            assert!(n.normalize(&RawEvent::modified(dir, true)).is_empty());
        }
    }

    #[test]
    fn test_file_modified() {
        let n = normalizer(&["~"], &["/p"]);

        assert_eq!(
            n.normalize(&RawEvent::modified("/p/a.txt", false)),
            vec![op(OperationKind::Modified, "/p/a.txt", false)]
        );
        assert!(n.normalize(&RawEvent::modified("/p/a.txt~", false)).is_empty());
    }

    #[test]
    fn test_rename_in_same_directory_emits_both_legs() {
        let n = normalizer(&[], &["/p"]);
        let ops = n.normalize(&RawEvent::moved("/p/old.txt", "/p/new.txt", false));

        assert_eq!(
            ops,
            vec![
                op(OperationKind::Deleted, "/p/old.txt", false),
                op(OperationKind::Created, "/p/new.txt", false),
            ]
        );
    }

    #[test]
    fn test_move_into_ignored_keeps_delete_leg() {
        let n = normalizer(&["tmp"], &["/p"]);
        let ops = n.normalize(&RawEvent::moved("/p/a.txt", "/p/tmp/a.txt", false));

        assert_eq!(ops, vec![op(OperationKind::Deleted, "/p/a.txt", false)]);
    }

    #[test]
    fn test_move_out_of_ignored_keeps_create_leg() {
        let n = normalizer(&["tmp"], &["/p"]);
        let ops = n.normalize(&RawEvent::moved("/p/tmp/a.txt", "/p/a.txt", false));

        assert_eq!(ops, vec![op(OperationKind::Created, "/p/a.txt", false)]);
    }

    #[test]
    fn test_move_decomposition_law() {
        let n = normalizer(&["skip"], &["/p", "/p/a"]);
        let cases = [
            ("/p/a/x", "/p/b/x"),
            ("/p/gone/x", "/p/a/y"),
            ("/p/skip/x", "/p/a/x"),
            ("/p/a/x", "/p/skip/x"),
            ("/p/a/x", "/p/a/y"),
        ];

        for (src, dest) in cases {
            for is_directory in [false, true] {
                let moved = n.normalize(&RawEvent::moved(src, dest, is_directory));
                let mut expected = n.normalize(&RawEvent::deleted(src, is_directory));
                expected.extend(n.normalize(&RawEvent::created(dest, is_directory)));

                assert_eq!(moved, expected, "{src} -> {dest}");
            }
        }
    }

    #[test]
    fn test_ignore_totality() {
        let n = normalizer(&["node_modules"], &["/p", "/p/node_modules"]);
        let path = "/p/node_modules/pkg/index.js";
        let events = [
            RawEvent::created(path, false),
            RawEvent::modified(path, false),
            RawEvent::deleted(path, false),
            RawEvent::moved(path, "/p/node_modules/pkg/other.js", false),
        ];

        for event in &events {
            assert!(n.normalize(event).is_empty(), "{event:?}");
        }
    }

    #[test]
    fn test_disk_tree_parent_check() {
        let tmp = tempfile::TempDir::new().unwrap();
        let n = EventNormalizer::new(IgnoreFilter::new(&[]));

        let present = tmp.path().join("a.txt");
        let orphan = tmp.path().join("gone").join("b.txt");

        assert_eq!(n.normalize(&RawEvent::deleted(&present, false)).len(), 1);
        assert!(n.normalize(&RawEvent::deleted(&orphan, false)).is_empty());
    }
}
