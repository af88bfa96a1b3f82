//! Local-to-remote path mapping
//!
//! Remote paths are plain `/`-separated strings: they are only ever
//! rendered into ssh and rsync command lines.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::config::SyncRoot;
use crate::error::{Result, XsyncError};

/// Where a local path lands on the remote side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteMapping {
    /// Remote counterpart of the local path. Ends with `/` for directories.
    pub file: String,
    /// Remote directory containing `file`, without a trailing `/`
    /// (except for the filesystem root itself).
    pub parent: String,
}

/// Maps local paths under one sync root onto the remote tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapper {
    local_root: PathBuf,
    remote_root: String,
}

impl PathMapper {
    /// Create a mapper for `root`
    #[must_use]
    pub fn new(root: &SyncRoot) -> Self {
        Self {
            local_root: root.local_path().to_path_buf(),
            remote_root: root.remote_path().to_string(),
        }
    }

    /// Path of `local` relative to the local root.
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Map`] if `local` is not under the root.
    pub fn relative<'a>(&self, local: &'a Path) -> Result<&'a Path> {
        local.strip_prefix(&self.local_root).map_err(|_| XsyncError::Map {
            path: local.to_path_buf(),
            root: self.local_root.clone(),
        })
    }

    /// Compute the remote file path and remote parent directory of `local`.
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Map`] if `local` is not under the root.
    pub fn to_remote(&self, local: &Path, is_directory: bool) -> Result<RemoteMapping> {
        let rel = self.relative(local)?;
        let parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let mut file = format!("{}{}", self.remote_root, parts.join("/"));
        if is_directory && !file.ends_with('/') {
            file.push('/');
        }

        let parent = match parts.split_last() {
            Some((_, dirs)) if !dirs.is_empty() => {
                format!("{}{}", self.remote_root, dirs.join("/"))
            }
            _ => trim_separator(&self.remote_root),
        };

        Ok(RemoteMapping { file, parent })
    }
}

fn trim_separator(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape a remote path for the remote shell.
///
/// Every character outside a conservative safe set is backslash-escaped,
/// so a space becomes `\ ` and globs, `~` and `$` stay literal. A newline
/// cannot be backslash-escaped and is single-quoted instead. The result
/// still has to be quoted once more with [`quote_local`] for the local
/// shell that runs ssh.
#[must_use]
pub fn escape_remote(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '\n' => escaped.push_str("'\n'"),
            c if c.is_ascii_alphanumeric() || "/._-+,:@%=".contains(c) => escaped.push(c),
            c => {
                escaped.push('\\');
                escaped.push(c);
            }
        }
    }
    escaped
}

/// Single-quote a word for one pass through `sh`
#[must_use]
pub fn quote_local(word: impl AsRef<OsStr>) -> String {
    format!("'{}'", word.as_ref().to_string_lossy().replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn mapper() -> PathMapper {
        PathMapper::new(&SyncRoot::new("/p/", "host", "/r/"))
    }

    #[test]
    fn test_nested_file() {
        let m = mapper().to_remote(Path::new("/p/a/b.txt"), false).unwrap();

        assert_eq!(m.file, "/r/a/b.txt");
        assert_eq!(m.parent, "/r/a");
    }

    #[test]
    fn test_top_level_file() {
        let m = mapper().to_remote(Path::new("/p/new.txt"), false).unwrap();

        assert_eq!(m.file, "/r/new.txt");
        assert_eq!(m.parent, "/r");
    }

    #[test]
    fn test_directory_gets_trailing_separator() {
        let m = mapper().to_remote(Path::new("/p/dir/"), true).unwrap();

        assert_eq!(m.file, "/r/dir/");
        assert_eq!(m.parent, "/r");
    }

    #[test]
    fn test_remote_root_slash() {
        let mapper = PathMapper::new(&SyncRoot::new("/p", "host", "/"));
        let m = mapper.to_remote(Path::new("/p/x"), false).unwrap();

        assert_eq!(m.file, "/x");
        assert_eq!(m.parent, "/");
    }

    #[test]
    fn test_outside_root() {
        let err = mapper().to_remote(Path::new("/other/a.txt"), false).unwrap_err();
        assert!(matches!(err, XsyncError::Map { .. }));
    }

    #[test]
    fn test_prefix_is_component_wise() {
        // `/pp` shares a string prefix with `/p` but is not under it
        assert!(mapper().to_remote(Path::new("/pp/a.txt"), false).is_err());
    }

    #[test]
    fn test_mapping_is_injective() {
        let locals = [
            "/p/a", "/p/a/b", "/p/ab", "/p/a b", "/p/b/a", "/p/a/b/c.txt", "/p/a.b",
        ];
        let m = mapper();
        let remotes: HashSet<String> = locals
            .iter()
            .map(|l| m.to_remote(Path::new(l), false).unwrap().file)
            .collect();

        assert_eq!(remotes.len(), locals.len());
    }

    #[test]
    fn test_escape_remote_spaces() {
        assert_eq!(escape_remote("/r/my dir/a b.txt"), r"/r/my\ dir/a\ b.txt");
        assert_eq!(escape_remote("/r/plain-1.0_x"), "/r/plain-1.0_x");
    }

    #[test]
    fn test_escape_remote_metacharacters() {
        assert_eq!(escape_remote("/r/a/*"), r"/r/a/\*");
        assert_eq!(escape_remote("/r/~x?[y]"), r"/r/\~x\?\[y\]");
        assert_eq!(escape_remote("/r/$(id);`id`"), r"/r/\$\(id\)\;\`id\`");
        assert_eq!(escape_remote("/r/it's \"q\""), r#"/r/it\'s\ \"q\""#);
        assert_eq!(escape_remote("/r/a\nb"), "/r/a'\n'b");
    }

    #[test]
    fn test_quote_local() {
        assert_eq!(quote_local(Path::new("/p/it's here")), r"'/p/it'\''s here'");
    }
}
