//! Error types for xsync

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for xsync operations
pub type Result<T> = std::result::Result<T, XsyncError>;

/// Main error type for xsync
#[derive(Error, Debug)]
pub enum XsyncError {
    /// Missing or malformed configuration. The affected root is skipped.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A path could not be mapped onto its sync root.
    #[error("Path {path} is not under sync root {root}")]
    Map {
        /// Offending local path
        path: PathBuf,
        /// Local root it was expected to live under
        root: PathBuf,
    },

    /// A remote command or transfer exited unsuccessfully.
    #[error("Remote action on {target} failed: {message}")]
    Remote {
        /// Remote path the action targeted
        target: String,
        /// What went wrong
        message: String,
    },

    /// The watch subsystem could not be set up.
    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Local filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XsyncError {
    /// Build a remote-action failure for `target`
    pub fn remote(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            target: target.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_mentions_target() {
        let err = XsyncError::remote("/r/a.txt", "rsync exited with status 23");
        let msg = err.to_string();

        assert!(msg.contains("/r/a.txt"));
        assert!(msg.contains("status 23"));
    }

    #[test]
    fn test_map_error_mentions_root() {
        let err = XsyncError::Map {
            path: PathBuf::from("/elsewhere/x"),
            root: PathBuf::from("/p/"),
        };

        assert_eq!(err.to_string(), "Path /elsewhere/x is not under sync root /p/");
    }
}
