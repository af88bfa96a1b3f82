//! Remote action execution over ssh and rsync

use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use super::SyncStats;
use super::actions::RemoteAction;
use crate::config::SyncRoot;
use crate::error::{Result, XsyncError};
use crate::mapper::{escape_remote, quote_local};

/// Mode switches for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferFlags {
    /// Send the whole subtree
    pub recursive: bool,
    /// Remove remote entries missing locally
    pub delete_extraneous: bool,
}

/// Capabilities the sync pipeline needs from the remote side.
///
/// Every call blocks until the remote side effect has finished.
pub trait RemoteExecutor {
    /// Test for `remote_dir` and create it (with parents) if missing
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Remote`] if the remote command fails.
    fn ensure_remote_dir(&self, remote_dir: &str) -> Result<()>;

    /// Send `source` to `remote_target`
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Remote`] if the transfer fails.
    fn transfer(&self, source: &Path, remote_target: &str, flags: TransferFlags) -> Result<()>;

    /// Remove `remote_target` and everything below it
    ///
    /// # Errors
    ///
    /// Returns [`XsyncError::Remote`] if the remote command fails.
    fn remote_delete(&self, remote_target: &str) -> Result<()>;
}

/// Dispatches remote actions to a [`RemoteExecutor`] and keeps count
pub struct ActionExecutor<E> {
    remote: E,
}

impl<E: RemoteExecutor> ActionExecutor<E> {
    /// Wrap a remote executor
    pub const fn new(remote: E) -> Self {
        Self { remote }
    }

    /// Execute one action, recording the outcome in `stats`
    ///
    /// # Errors
    ///
    /// Returns the executor's error if the action fails.
    pub fn execute(&self, action: &RemoteAction, stats: &mut SyncStats) -> Result<()> {
        let outcome = match action {
            RemoteAction::EnsureDir { remote_dir } => self
                .remote
                .ensure_remote_dir(remote_dir)
                .map(|()| stats.dirs_ensured += 1),
            RemoteAction::Transfer {
                source,
                remote_target,
                recursive,
                delete_extraneous,
            } => self
                .remote
                .transfer(
                    source,
                    remote_target,
                    TransferFlags {
                        recursive: *recursive,
                        delete_extraneous: *delete_extraneous,
                    },
                )
                .map(|()| stats.transferred += 1),
            RemoteAction::Delete { remote_target } => self
                .remote
                .remote_delete(remote_target)
                .map(|()| stats.deleted += 1),
        };

        if let Err(e) = &outcome {
            stats.errors.push(e.to_string());
        }
        outcome
    }

    /// The wrapped remote executor
    pub const fn remote(&self) -> &E {
        &self.remote
    }
}

/// Runs remote actions as `ssh`/`rsync` command lines through `sh -c`
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    remote_host: String,
    rsh: Option<String>,
    preserve_times: bool,
    dry_run: bool,
}

impl ShellExecutor {
    /// Create an executor for `root`
    #[must_use]
    pub fn new(root: &SyncRoot, dry_run: bool) -> Self {
        Self {
            remote_host: root.remote_host().to_string(),
            rsh: root.rsh().map(str::to_string),
            preserve_times: root.preserve_times(),
            dry_run,
        }
    }

    /// Command line for [`RemoteExecutor::ensure_remote_dir`]
    #[must_use]
    pub fn ensure_dir_command(&self, remote_dir: &str) -> String {
        let dir = escape_remote(remote_dir);
        self.ssh_command(&format!("test -d {dir} || mkdir -p {dir}"))
    }

    /// Command line for [`RemoteExecutor::remote_delete`]
    #[must_use]
    pub fn delete_command(&self, remote_target: &str) -> String {
        self.ssh_command(&format!("rm -rf {}", escape_remote(remote_target)))
    }

    /// Command line for [`RemoteExecutor::transfer`].
    ///
    /// Checksums are always compared, and links, permissions, owner,
    /// group and devices are always preserved. Non-recursive transfers
    /// use `-d` because rsync refuses `--delete` without `-r` or `-d`.
    ///
    /// `RSYNC_OLD_ARGS=1` makes rsync 3.2.4+ hand the remote path to the
    /// remote shell untouched, like older releases do, so
    /// [`escape_remote`] is the only remote escaping on every version.
    #[must_use]
    pub fn transfer_command(&self, source: &Path, remote_target: &str, flags: TransferFlags) -> String {
        let mut opts = String::from("-clpgoDzq");
        if self.preserve_times {
            opts.push('t');
        }
        opts.push(if flags.recursive { 'r' } else { 'd' });

        let mut words = vec!["RSYNC_OLD_ARGS=1".to_string(), "rsync".to_string(), opts];
        if flags.delete_extraneous {
            words.push("--delete".to_string());
        }
        if let Some(rsh) = &self.rsh {
            words.push("-e".to_string());
            words.push(quote_local(rsh));
        }
        words.push(quote_local(source));
        words.push(quote_local(format!(
            "{}:{}",
            self.remote_host,
            escape_remote(remote_target)
        )));
        words.join(" ")
    }

    /// `remote_cmd` is parsed by the remote shell only: it travels as a
    /// single quoted word through the local one.
    fn ssh_command(&self, remote_cmd: &str) -> String {
        let rsh = self.rsh.as_deref().unwrap_or("ssh");
        format!("{rsh} {} {}", quote_local(&self.remote_host), quote_local(remote_cmd))
    }

    fn run(&self, command: &str, target: &str) -> Result<()> {
        if self.dry_run {
            info!("[DRY RUN] {command}");
            return Ok(());
        }

        debug!("Running: {command}");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|e| XsyncError::remote(target, format!("failed to spawn sh: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(XsyncError::remote(target, format!("`{command}` exited with {status}")))
        }
    }
}

impl RemoteExecutor for ShellExecutor {
    fn ensure_remote_dir(&self, remote_dir: &str) -> Result<()> {
        self.run(&self.ensure_dir_command(remote_dir), remote_dir)
    }

    fn transfer(&self, source: &Path, remote_target: &str, flags: TransferFlags) -> Result<()> {
        self.run(&self.transfer_command(source, remote_target, flags), remote_target)
    }

    fn remote_delete(&self, remote_target: &str) -> Result<()> {
        self.run(&self.delete_command(remote_target), remote_target)
    }
}
