//! Common types and utilities for command execution

use std::path::Path;

use anyhow::bail;
use tracing::{debug, warn};
use xsync_core::{ConfigManager, SyncRoot};

/// Execution options shared by the sync commands
pub struct SyncOptions<'a> {
    /// Enable verbose output
    pub verbose: bool,
    /// Log commands without running them
    pub dry_run: bool,
    /// Path to custom config file
    pub config_path: Option<&'a Path>,
}

impl<'a> SyncOptions<'a> {
    /// Create new sync options
    #[must_use]
    pub const fn new(verbose: bool, dry_run: bool, config_path: Option<&'a Path>) -> Self {
        Self {
            verbose,
            dry_run,
            config_path,
        }
    }

    /// Load the configured sync roots.
    ///
    /// A missing or broken config file only warns; running out of usable
    /// roots is the one fatal condition.
    pub fn load_roots(&self) -> anyhow::Result<Vec<SyncRoot>> {
        let roots = match ConfigManager::load(self.config_path) {
            Ok(loaded) => {
                debug!(config = %loaded.source.display(), roots = loaded.roots.len(), "Loaded config");
                loaded.roots
            }
            Err(e) => {
                warn!("{e}; skipped");
                Vec::new()
            }
        };

        if roots.is_empty() {
            bail!("No usable sync roots configured");
        }

        if self.verbose {
            for root in &roots {
                debug!(
                    "Root {} -> {}:{} (ignore: {:?})",
                    root.local_path().display(),
                    root.remote_host(),
                    root.remote_path(),
                    root.ignore_patterns()
                );
            }
        }

        Ok(roots)
    }
}
