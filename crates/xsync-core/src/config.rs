//! Configuration file parsing, discovery and validation
//!
//! The configuration is the JSON `.xsync` file: either a single root
//! object or an array of them. Every entry is validated on its own, so a
//! broken entry only costs its own root.

mod discovery;
mod types;
mod validation;


use std::fs;
use std::path::{Path, PathBuf};

pub use discovery::ConfigDiscovery;
pub use types::{CONFIG_FILE_NAME, RootEntry, SyncRoot, with_trailing_separator};
pub use validation::ConfigValidator;

use serde_json::Value;
use tracing::warn;

use crate::error::{Result, XsyncError};

/// Outcome of loading a configuration file
#[derive(Debug)]
pub struct LoadedConfig {
    /// File the roots were read from
    pub source: PathBuf,
    /// Usable sync roots, in file order
    pub roots: Vec<SyncRoot>,
    /// Entries that were skipped, with the reason
    pub rejected: Vec<XsyncError>,
}

/// Configuration manager that coordinates discovery, parsing and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Create a new configuration manager
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Discover, read and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Config`] if no file is found or it cannot be
    /// read or parsed. Invalid entries are not errors; they end up in
    /// [`LoadedConfig::rejected`].
    pub fn load(cli_config_path: Option<&Path>) -> Result<LoadedConfig> {
        let Some(source) = ConfigDiscovery::discover(cli_config_path) else {
            return Err(XsyncError::Config(format!(
                "no {CONFIG_FILE_NAME} found in the current directory or its parents"
            )));
        };

        Self::load_file(&source)
    }

    /// Read and validate a specific configuration file
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Config`] if the file is missing or is not JSON.
    pub fn load_file(path: &Path) -> Result<LoadedConfig> {
        if !path.is_file() {
            return Err(XsyncError::Config(format!(
                "config \"{}\" does not exist",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let absolute = std::path::absolute(path)?;
        let base_dir = absolute.parent().unwrap_or_else(|| Path::new("/"));

        let (roots, rejected) = Self::parse_str(&content, base_dir).map_err(|e| {
            XsyncError::Config(format!("couldn't parse config from \"{}\": {e}", path.display()))
        })?;

        for err in &rejected {
            warn!(config = %path.display(), "Skipping sync root: {err}");
        }

        Ok(LoadedConfig {
            source: absolute,
            roots,
            rejected,
        })
    }

    /// Parse configuration text, resolving relative paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error only if `content` is not JSON at all.
    pub fn parse_str(content: &str, base_dir: &Path) -> Result<(Vec<SyncRoot>, Vec<XsyncError>)> {
        let value: Value = serde_json::from_str(content)?;
        let entries = match value {
            Value::Array(items) => items,
            other => vec![other],
        };

        let mut roots = Vec::new();
        let mut rejected = Vec::new();

        for (idx, raw) in entries.into_iter().enumerate() {
            let parsed = serde_json::from_value::<RootEntry>(raw)
                .map_err(|e| XsyncError::Config(format!("entry #{}: {e}", idx + 1)))
                .and_then(|entry| {
                    ConfigValidator::validate(&entry, base_dir).map_err(|e| match e {
                        XsyncError::Config(msg) => {
                            XsyncError::Config(format!("entry #{}: {msg}", idx + 1))
                        }
                        other => other,
                    })
                });

            match parsed {
                Ok(root) => roots.push(root),
                Err(e) => rejected.push(e),
            }
        }

        Ok((roots, rejected))
    }

    /// Write a sample configuration into `dir`.
    ///
    /// # Errors
    ///
    /// Fails if the file already exists and `force` is not set, or on IO
    /// errors.
    pub fn scaffold(dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(XsyncError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let mut content = serde_json::to_string_pretty(&RootEntry::sample())?;
        content.push('\n');
        fs::write(&path, content)?;

        Ok(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
