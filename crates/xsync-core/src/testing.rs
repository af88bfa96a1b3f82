//! Test doubles shared across modules

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{Result, XsyncError};
use crate::sync::{RemoteExecutor, TransferFlags};

/// Remote side that records every call and can fail on one target
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    calls: Arc<Mutex<Vec<String>>>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(target: &str) -> Self {
        Self {
            fail_on: Some(target.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, target: &str, call: String) -> Result<()> {
        if self.fail_on.as_deref() == Some(target) {
            return Err(XsyncError::remote(target, "exit status: 255"));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

impl RemoteExecutor for RecordingExecutor {
    fn ensure_remote_dir(&self, remote_dir: &str) -> Result<()> {
        self.record(remote_dir, format!("mkdir {remote_dir}"))
    }

    fn transfer(&self, source: &Path, remote_target: &str, _flags: TransferFlags) -> Result<()> {
        self.record(
            remote_target,
            format!("send {} {remote_target}", source.display()),
        )
    }

    fn remote_delete(&self, remote_target: &str) -> Result<()> {
        self.record(remote_target, format!("rm {remote_target}"))
    }
}
