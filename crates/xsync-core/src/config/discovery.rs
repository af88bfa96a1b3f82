//! Configuration file discovery

use std::path::{Path, PathBuf};

use super::types::CONFIG_FILE_NAME;

/// Config file discovery
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Create a new config discovery instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Locate the configuration file.
    ///
    /// An explicit path is returned as-is, even if it does not exist, so
    /// the caller can report it. Otherwise `.xsync` is searched for in the
    /// current directory and then each parent.
    pub fn discover(cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = cli_path {
            return Some(path.to_path_buf());
        }

        let current = std::env::current_dir().ok()?;
        Self::find_from(&current, CONFIG_FILE_NAME)
    }

    /// Find `name` in `start` or the nearest ancestor containing it
    pub fn find_from(start: &Path, name: &str) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }

            // Move to parent directory
            if !current.pop() {
                break;
            }
        }

        None
    }
}

impl Default for ConfigDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_cli_config() {
        let tmp = TempDir::new().unwrap();
        let cli_config = tmp.path().join("custom.json");
        fs::write(&cli_config, "{}").unwrap();

        let found = ConfigDiscovery::discover(Some(&cli_config));

        assert_eq!(found, Some(cli_config));
    }

    #[test]
    fn test_discover_cli_config_nonexistent_is_kept() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nonexistent.json");

        let found = ConfigDiscovery::discover(Some(&missing));

        assert_eq!(found, Some(missing));
    }

    #[test]
    fn test_find_in_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = ConfigDiscovery::find_from(&nested, CONFIG_FILE_NAME);

        assert_eq!(found, Some(tmp.path().join(CONFIG_FILE_NAME)));
    }

    #[test]
    fn test_find_prefers_nearest() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "{}").unwrap();
        fs::write(nested.join(CONFIG_FILE_NAME), "{}").unwrap();

        let found = ConfigDiscovery::find_from(&nested, CONFIG_FILE_NAME);

        assert_eq!(found, Some(nested.join(CONFIG_FILE_NAME)));
    }
}
