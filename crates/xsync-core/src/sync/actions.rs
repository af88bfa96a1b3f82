//! Remote action planning

use std::path::PathBuf;

use tracing::warn;

use crate::config::SyncRoot;
use crate::error::Result;
use crate::mapper::PathMapper;
use crate::normalizer::{OperationKind, SyncOperation};

/// One step of remote work, in the order it must run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    /// Make sure a remote directory exists
    EnsureDir {
        /// Remote directory
        remote_dir: String,
    },
    /// Send a local file or tree with rsync
    Transfer {
        /// Local file or directory. A trailing separator sends the
        /// directory's contents rather than the directory itself.
        source: PathBuf,
        /// Remote destination
        remote_target: String,
        /// Send the whole subtree
        recursive: bool,
        /// Remove remote entries missing locally
        delete_extraneous: bool,
    },
    /// Remove exactly one remote file or subtree
    Delete {
        /// Remote path, never ending with a separator
        remote_target: String,
    },
}

/// Resolves sync operations into remote actions for one root
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    mapper: PathMapper,
    local_root: PathBuf,
    remote_root: String,
}

impl ActionBuilder {
    /// Create a builder for `root`
    #[must_use]
    pub fn new(root: &SyncRoot) -> Self {
        Self {
            mapper: PathMapper::new(root),
            local_root: root.local_path().to_path_buf(),
            remote_root: root.remote_path().to_string(),
        }
    }

    /// Determine the remote actions for an operation.
    ///
    /// Operations on the root directory itself produce nothing: deleting
    /// or re-creating the whole remote tree is left to a full sync.
    ///
    /// # Errors
    ///
    /// Returns [`crate::XsyncError::Map`] if the path is not under the root.
    pub fn build(&self, op: &SyncOperation) -> Result<Vec<RemoteAction>> {
        if self.mapper.relative(&op.local_path)?.as_os_str().is_empty() {
            warn!(path = %op.local_path.display(), kind = ?op.kind, "Ignoring event on the sync root itself");
            return Ok(Vec::new());
        }

        let actions = match op.kind {
            OperationKind::Created => {
                let mapping = self.mapper.to_remote(&op.local_path, op.is_directory)?;
                vec![
                    RemoteAction::EnsureDir {
                        remote_dir: mapping.parent.clone(),
                    },
                    RemoteAction::Transfer {
                        source: op.local_path.components().collect(),
                        remote_target: directory_target(&mapping.parent),
                        recursive: op.is_directory,
                        delete_extraneous: true,
                    },
                ]
            }
            OperationKind::Modified => {
                let mapping = self.mapper.to_remote(&op.local_path, false)?;
                vec![RemoteAction::Transfer {
                    source: op.local_path.clone(),
                    remote_target: mapping.file,
                    recursive: false,
                    delete_extraneous: true,
                }]
            }
            OperationKind::Deleted => {
                // Mapped as a file so a directory target has no trailing
                // separator, which would make `rm` follow a symlink.
                let mapping = self.mapper.to_remote(&op.local_path, false)?;
                vec![RemoteAction::Delete {
                    remote_target: mapping.file,
                }]
            }
        };

        Ok(actions)
    }

    /// Single transfer that mirrors the whole local root
    #[must_use]
    pub fn full_sync(&self) -> RemoteAction {
        RemoteAction::Transfer {
            source: self.local_root.clone(),
            remote_target: self.remote_root.clone(),
            recursive: true,
            delete_extraneous: true,
        }
    }
}

fn directory_target(dir: &str) -> String {
    if dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn builder() -> ActionBuilder {
        ActionBuilder::new(&SyncRoot::new("/p/", "host", "/r/"))
    }

    fn op(kind: OperationKind, path: &str, is_directory: bool) -> SyncOperation {
        SyncOperation {
            kind,
            local_path: PathBuf::from(path),
            is_directory,
        }
    }

    #[test]
    fn test_created_file() {
        let actions = builder()
            .build(&op(OperationKind::Created, "/p/a/b.txt", false))
            .unwrap();

        assert_eq!(
            actions,
            vec![
                RemoteAction::EnsureDir {
                    remote_dir: "/r/a".to_string()
                },
                RemoteAction::Transfer {
                    source: PathBuf::from("/p/a/b.txt"),
                    remote_target: "/r/a/".to_string(),
                    recursive: false,
                    delete_extraneous: true,
                },
            ]
        );
    }

    #[test]
    fn test_created_directory_sends_tree_into_parent() {
        let actions = builder()
            .build(&op(OperationKind::Created, "/p/dir/", true))
            .unwrap();

        assert_eq!(
            actions,
            vec![
                RemoteAction::EnsureDir {
                    remote_dir: "/r".to_string()
                },
                RemoteAction::Transfer {
                    source: PathBuf::from("/p/dir"),
                    remote_target: "/r/".to_string(),
                    recursive: true,
                    delete_extraneous: true,
                },
            ]
        );
        // The trailing separator is gone, so rsync creates `/r/dir`
        if let RemoteAction::Transfer { source, .. } = &actions[1] {
            assert_eq!(source.to_string_lossy(), "/p/dir");
        }
    }

    #[test]
    fn test_modified_targets_file_itself() {
        let actions = builder()
            .build(&op(OperationKind::Modified, "/p/a/b.txt", false))
            .unwrap();

        assert_eq!(
            actions,
            vec![RemoteAction::Transfer {
                source: PathBuf::from("/p/a/b.txt"),
                remote_target: "/r/a/b.txt".to_string(),
                recursive: false,
                delete_extraneous: true,
            }]
        );
    }

    #[test]
    fn test_deleted_targets_only_that_path() {
        let actions = builder()
            .build(&op(OperationKind::Deleted, "/p/a/b.txt", false))
            .unwrap();

        assert_eq!(
            actions,
            vec![RemoteAction::Delete {
                remote_target: "/r/a/b.txt".to_string()
            }]
        );
    }

    #[test]
    fn test_deleted_directory_has_no_trailing_separator() {
        let actions = builder()
            .build(&op(OperationKind::Deleted, "/p/a/sub", true))
            .unwrap();

        assert_eq!(
            actions,
            vec![RemoteAction::Delete {
                remote_target: "/r/a/sub".to_string()
            }]
        );
    }

    #[test]
    fn test_created_twice_is_identical() {
        let b = builder();
        let created = op(OperationKind::Created, "/p/x/y.rs", false);

        assert_eq!(b.build(&created).unwrap(), b.build(&created).unwrap());
    }

    #[test]
    fn test_root_itself_yields_nothing() {
        let b = builder();
        for kind in [OperationKind::Created, OperationKind::Deleted, OperationKind::Modified] {
            assert!(b.build(&op(kind, "/p/", true)).unwrap().is_empty());
        }
    }

    #[test]
    fn test_outside_root_is_error() {
        assert!(builder()
            .build(&op(OperationKind::Created, "/q/a", false))
            .is_err());
    }

    #[test]
    fn test_full_sync_sends_root_contents() {
        let action = builder().full_sync();

        match action {
            RemoteAction::Transfer {
                source,
                remote_target,
                recursive,
                delete_extraneous,
            } => {
                assert_eq!(source.to_string_lossy(), "/p/");
                assert_eq!(source, Path::new("/p"));
                assert_eq!(remote_target, "/r/");
                assert!(recursive);
                assert!(delete_extraneous);
            }
            other => panic!("expected transfer, got {other:?}"),
        }
    }
}
