//! Per-root event pipeline: normalize, plan, execute

use tracing::{error, info};

use crate::config::SyncRoot;
use crate::error::Result;
use crate::filter::IgnoreFilter;
use crate::normalizer::{EventNormalizer, RawEvent, SyncOperation};
use crate::sync::{ActionBuilder, ActionExecutor, RemoteAction, RemoteExecutor, SyncStats};

/// Everything one sync root needs to turn events into remote changes.
///
/// Events are handled strictly one at a time: [`RootPipeline::handle`]
/// returns only after every remote action for the event has run.
pub struct RootPipeline<E> {
    root: SyncRoot,
    normalizer: EventNormalizer,
    builder: ActionBuilder,
    executor: ActionExecutor<E>,
    stats: SyncStats,
}

impl<E: RemoteExecutor> RootPipeline<E> {
    /// Build the pipeline for `root` on top of `remote`
    pub fn new(root: SyncRoot, remote: E) -> Self {
        Self {
            normalizer: EventNormalizer::new(IgnoreFilter::new(root.ignore_patterns())),
            builder: ActionBuilder::new(&root),
            executor: ActionExecutor::new(remote),
            stats: SyncStats::default(),
            root,
        }
    }

    /// The root this pipeline serves
    pub const fn root(&self) -> &SyncRoot {
        &self.root
    }

    /// Remote actions for one event, in execution order
    ///
    /// # Errors
    ///
    /// Returns [`crate::XsyncError::Map`] if a path is outside the root.
    pub fn plan(&self, event: &RawEvent) -> Result<Vec<RemoteAction>> {
        let mut actions = Vec::new();
        for (_, planned) in self.plan_operations(event) {
            actions.extend(planned?);
        }
        Ok(actions)
    }

    /// Normalize, plan and execute one event.
    ///
    /// A failed action is logged and abandons the rest of its operation;
    /// nothing is retried.
    pub fn handle(&mut self, event: &RawEvent) {
        self.stats.events += 1;

        for (op, planned) in self.plan_operations(event) {
            self.stats.operations += 1;

            let actions = match planned {
                Ok(actions) => actions,
                Err(e) => {
                    error!(path = %op.local_path.display(), "Cannot plan sync: {e}");
                    continue;
                }
            };

            if !actions.is_empty() {
                info!("Syncing {}", op.local_path.display());
            }

            for action in &actions {
                if let Err(e) = self.executor.execute(action, &mut self.stats) {
                    error!(
                        path = %op.local_path.display(),
                        observed_at = %event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        "Sync failed: {e}"
                    );
                    break;
                }
            }
        }
    }

    /// Each operation of `event` with its own plan, so one unmappable
    /// operation does not hide the others
    fn plan_operations(&self, event: &RawEvent) -> Vec<(SyncOperation, Result<Vec<RemoteAction>>)> {
        self.normalizer
            .normalize(event)
            .into_iter()
            .map(|op| {
                let planned = self.builder.build(&op);
                (op, planned)
            })
            .collect()
    }

    /// Mirror the whole local root in one transfer
    ///
    /// # Errors
    ///
    /// Returns the executor's error if the transfer fails.
    pub fn full_sync(&mut self) -> Result<()> {
        info!(
            "Full sync from '{}' to {}:{}",
            self.root.local_path().display(),
            self.root.remote_host(),
            self.root.remote_path()
        );
        let action = self.builder.full_sync();
        self.executor.execute(&action, &mut self.stats)
    }

    /// Statistics so far
    pub const fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Consume the pipeline, keeping its statistics
    pub fn into_stats(self) -> SyncStats {
        self.stats
    }
}
