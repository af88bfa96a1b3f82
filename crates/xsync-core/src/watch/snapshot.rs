//! Initial tree snapshot of a sync root

use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::filter::IgnoreFilter;

/// What a sync root contains when watching starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Regular files and file symlinks
    pub files: usize,
    /// Directories below the root
    pub dirs: usize,
    /// Symlinks to directories, which are never descended into
    pub skipped_links: Vec<PathBuf>,
}

impl TreeSnapshot {
    /// Walk `root` without following symlinks, pruning ignored entries
    #[must_use]
    pub fn take(root: &Path, filter: &IgnoreFilter) -> Self {
        let mut snapshot = Self::default();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|e| !filter.should_ignore(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                snapshot.dirs += 1;
            } else if file_type.is_symlink() && entry.path().is_dir() {
                snapshot.skipped_links.push(entry.into_path());
            } else {
                snapshot.files += 1;
            }
        }

        snapshot
    }
}
