//! Configuration types and structures

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Marker file name, always ignored and used as the default config name
pub const CONFIG_FILE_NAME: &str = ".xsync";

const fn default_preserve_times() -> bool {
    true
}

/// One entry of the configuration file, as written by the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootEntry {
    /// Local directory to watch (defaults to the config file's directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,

    /// Remote host, e.g. `dev@10.0.0.2`
    pub remote_host: String,

    /// Absolute directory on the remote host
    pub remote_path: String,

    /// Substrings; any path containing one of them is not synced
    #[serde(default)]
    pub ignore_list: Vec<String>,

    /// Keep modification times on transferred files
    #[serde(default = "default_preserve_times")]
    pub preserve_times: bool,

    /// Remote shell command, e.g. `ssh -p 2222`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsh: Option<String>,
}

impl RootEntry {
    /// Entry written by `xsync init`
    #[must_use]
    pub fn sample() -> Self {
        Self {
            local_path: None,
            remote_host: "dev@192.168.1.100".to_string(),
            remote_path: "/home/dev/project/".to_string(),
            ignore_list: vec![".git".to_string(), ".svn".to_string(), ".DS_Store".to_string()],
            preserve_times: true,
            rsh: None,
        }
    }
}

/// One configured local-directory-to-remote-directory mapping.
///
/// Both `local_path` and `remote_path` always end with `/`. A root is
/// immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRoot {
    local_path: PathBuf,
    remote_host: String,
    remote_path: String,
    ignore_patterns: Vec<String>,
    preserve_times: bool,
    rsh: Option<String>,
}

impl SyncRoot {
    /// Create a root with no ignore patterns and times preserved
    pub fn new(
        local_path: impl AsRef<Path>,
        remote_host: impl Into<String>,
        remote_path: impl AsRef<str>,
    ) -> Self {
        let local = with_trailing_separator(&local_path.as_ref().to_string_lossy());
        Self {
            local_path: PathBuf::from(local),
            remote_host: remote_host.into(),
            remote_path: with_trailing_separator(remote_path.as_ref()),
            ignore_patterns: Vec::new(),
            preserve_times: true,
            rsh: None,
        }
    }

    /// Replace the ignore patterns
    #[must_use]
    pub fn with_ignore<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Toggle modification-time preservation
    #[must_use]
    pub const fn with_preserve_times(mut self, preserve_times: bool) -> Self {
        self.preserve_times = preserve_times;
        self
    }

    /// Use a custom remote shell command
    #[must_use]
    pub fn with_rsh(mut self, rsh: Option<String>) -> Self {
        self.rsh = rsh;
        self
    }

    /// Local directory, ending with `/`
    #[must_use]
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Remote host connection string
    #[must_use]
    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    /// Remote directory, ending with `/`
    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Configured ignore substrings (without the implicit `.xsync`)
    #[must_use]
    pub fn ignore_patterns(&self) -> &[String] {
        &self.ignore_patterns
    }

    /// Whether transfers keep modification times
    #[must_use]
    pub const fn preserve_times(&self) -> bool {
        self.preserve_times
    }

    /// Remote shell command, if not plain `ssh`
    #[must_use]
    pub fn rsh(&self) -> Option<&str> {
        self.rsh.as_deref()
    }
}

/// Append `/` unless the string already ends with one
#[must_use]
pub fn with_trailing_separator(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}
