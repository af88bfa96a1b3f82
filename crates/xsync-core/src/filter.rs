//! Substring-based ignore filtering
//!
//! A path is ignored when any configured substring occurs anywhere in
//! its string form. There is no glob or regex syntax: `.git` also
//! matches `.github`.

use std::path::Path;

use crate::config::CONFIG_FILE_NAME;

/// Decides which local paths are excluded from syncing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreFilter {
    patterns: Vec<String>,
}

impl IgnoreFilter {
    /// Build a filter from the configured patterns plus `.xsync`
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        let mut patterns: Vec<String> = patterns.to_vec();
        if !patterns.iter().any(|p| p == CONFIG_FILE_NAME) {
            patterns.push(CONFIG_FILE_NAME.to_string());
        }
        Self { patterns }
    }

    /// Filter that matches nothing at all
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Whether `path` contains any ignore substring
    #[must_use]
    pub fn should_ignore(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.patterns.iter().any(|p| path.contains(p.as_str()))
    }

    /// Active patterns, in order
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
