//! Configuration validation and normalization

use std::path::Path;

use super::types::{RootEntry, SyncRoot};
use crate::error::{Result, XsyncError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create a new config validator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validate one entry and turn it into a [`SyncRoot`].
    ///
    /// A missing or relative `local_path` is resolved against `base_dir`,
    /// the directory holding the config file.
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Config`] if the entry cannot describe a usable
    /// root.
    pub fn validate(entry: &RootEntry, base_dir: &Path) -> Result<SyncRoot> {
        let (host, host_rsh) = split_rsh(entry.remote_host.trim())?;
        if host.is_empty() {
            return Err(XsyncError::Config("remote_host cannot be empty".to_string()));
        }
        if host.starts_with('-') || host.contains(char::is_whitespace) {
            return Err(XsyncError::Config(format!(
                "remote_host must be a bare [user@]host, got '{}'; put ssh options in the \"rsh\" field",
                entry.remote_host
            )));
        }
        let rsh = match (host_rsh, &entry.rsh) {
            (Some(_), Some(_)) => {
                return Err(XsyncError::Config(
                    "remote shell given both in remote_host and in \"rsh\"".to_string(),
                ));
            }
            (from_host, from_field) => from_host.or_else(|| from_field.clone()),
        };

        if !entry.remote_path.starts_with('/') {
            return Err(XsyncError::Config(format!(
                "remote_path must be absolute, got '{}'",
                entry.remote_path
            )));
        }

        // An empty substring would match every path
        for pattern in &entry.ignore_list {
            if pattern.is_empty() {
                return Err(XsyncError::Config(
                    "ignore_list entries cannot be empty".to_string(),
                ));
            }
        }

        let local = match entry.local_path.as_deref() {
            Some(path) => base_dir.join(path),
            None => base_dir.to_path_buf(),
        };

        if !local.is_dir() {
            return Err(XsyncError::Config(format!(
                "local_path {} is not a directory",
                local.display()
            )));
        }

        let local = dunce::canonicalize(&local).map_err(|e| {
            XsyncError::Config(format!("cannot resolve local_path {}: {e}", local.display()))
        })?;

        Ok(SyncRoot::new(local, host, &entry.remote_path)
            .with_ignore(entry.ignore_list.iter().cloned())
            .with_preserve_times(entry.preserve_times)
            .with_rsh(rsh))
    }
}

/// Lift a leading `--rsh=CMD`, `--rsh CMD` or `-e CMD` off `remote_host`.
///
/// `CMD` may be wrapped in single or double quotes. Returns the rest of
/// the string and the remote shell, if one was given.
fn split_rsh(remote_host: &str) -> Result<(&str, Option<String>)> {
    let rest = if let Some(rest) = remote_host.strip_prefix("--rsh") {
        rest.strip_prefix('=').unwrap_or(rest)
    } else if let Some(rest) = remote_host.strip_prefix("-e") {
        rest
    } else {
        return Ok((remote_host, None));
    };
    let rest = rest.trim_start();

    let (rsh, host) = match rest.chars().next() {
        Some(quote @ ('\'' | '"')) => {
            let inner = &rest[1..];
            let end = inner.find(quote).ok_or_else(|| {
                XsyncError::Config(format!("unterminated quote in remote_host '{remote_host}'"))
            })?;
            (&inner[..end], &inner[end + 1..])
        }
        _ => rest.split_at(rest.find(char::is_whitespace).unwrap_or(rest.len())),
    };

    if rsh.trim().is_empty() {
        return Err(XsyncError::Config(format!(
            "empty remote shell in remote_host '{remote_host}'"
        )));
    }
    Ok((host.trim(), Some(rsh.to_string())))
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
