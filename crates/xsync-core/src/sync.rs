//! Remote action planning and execution
//!
//! [`ActionBuilder`] turns each normalized operation into an ordered list
//! of [`RemoteAction`]s; [`ActionExecutor`] runs them through a
//! [`RemoteExecutor`] and keeps per-root statistics.

mod actions;
mod executor;
mod reporting;

pub use actions::{ActionBuilder, RemoteAction};
pub use executor::{ActionExecutor, RemoteExecutor, ShellExecutor, TransferFlags};
pub use reporting::SyncReporter;

/// Statistics for one root, or several merged together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Raw events received
    pub events: usize,
    /// Sync operations produced by the normalizer
    pub operations: usize,
    /// Remote directories checked or created
    pub dirs_ensured: usize,
    /// Successful transfers
    pub transferred: usize,
    /// Successful remote deletes
    pub deleted: usize,
    /// Failed actions, in the order they happened
    pub errors: Vec<String>,
}

impl SyncStats {
    /// Total successful remote actions
    #[must_use]
    pub const fn total_actions(&self) -> usize {
        self.dirs_ensured + self.transferred + self.deleted
    }

    /// Whether every action succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold another root's statistics into this one
    pub fn merge(&mut self, other: Self) {
        self.events += other.events;
        self.operations += other.operations;
        self.dirs_ensured += other.dirs_ensured;
        self.transferred += other.transferred;
        self.deleted += other.deleted;
        self.errors.extend(other.errors);
    }
}
