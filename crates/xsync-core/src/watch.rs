//! Filesystem watching and per-root pipelines
//!
//! The [`WatchCoordinator`] runs one thread per sync root. Each thread
//! owns its own `notify` watcher, event translator and [`RootPipeline`],
//! so roots share no state and a stalled transfer only blocks its own
//! root.

mod pipeline;
mod snapshot;
mod translate;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

pub use pipeline::RootPipeline;
pub use snapshot::TreeSnapshot;
pub use translate::EventTranslator;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{error, info, warn};

use crate::config::SyncRoot;
use crate::error::Result;
use crate::filter::IgnoreFilter;
use crate::sync::{RemoteExecutor, ShellExecutor, SyncStats};

/// How the watcher treats symlinked directories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkTraversal {
    /// Never descend into them; cycles through links cannot form
    #[default]
    Skip,
    /// Descend into them like regular directories
    Follow,
}

/// Coordinator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Symlinked directory handling
    pub symlinks: SymlinkTraversal,
    /// Log commands instead of running them
    pub dry_run: bool,
    /// How long to wait for an event before checking for shutdown and
    /// releasing held rename legs
    pub poll_interval: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            symlinks: SymlinkTraversal::Skip,
            dry_run: false,
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Watches every sync root and keeps its remote copy current
pub struct WatchCoordinator {
    roots: Vec<SyncRoot>,
    options: WatchOptions,
}

impl WatchCoordinator {
    /// Create a coordinator for `roots`
    #[must_use]
    pub const fn new(roots: Vec<SyncRoot>, options: WatchOptions) -> Self {
        Self { roots, options }
    }

    /// Watch with the ssh/rsync executor until `shutdown` is set
    ///
    /// # Errors
    ///
    /// Returns an error only if no root could be watched at all.
    pub fn run(&self, shutdown: &Arc<AtomicBool>) -> Result<SyncStats> {
        let dry_run = self.options.dry_run;
        self.run_with(shutdown, |root| ShellExecutor::new(root, dry_run))
    }

    /// Watch with executors built by `make_executor`, one per root.
    ///
    /// Returns once `shutdown` is set and every root has finished the
    /// event it was handling.
    ///
    /// # Errors
    ///
    /// Returns an error only if no root could be watched at all.
    pub fn run_with<E, F>(&self, shutdown: &Arc<AtomicBool>, make_executor: F) -> Result<SyncStats>
    where
        E: RemoteExecutor + Send + 'static,
        F: Fn(&SyncRoot) -> E,
    {
        let mut handles = Vec::with_capacity(self.roots.len());

        for (idx, root) in self.roots.iter().enumerate() {
            let pipeline = RootPipeline::new(root.clone(), make_executor(root));
            let options = self.options;
            let shutdown = Arc::clone(shutdown);

            let handle = thread::Builder::new()
                .name(format!("xsync-root-{idx}"))
                .spawn(move || watch_root(pipeline, options, &shutdown))?;
            handles.push((root.local_path().to_path_buf(), handle));
        }

        let mut stats = SyncStats::default();
        let mut first_error = None;
        let mut watched = 0;

        for (path, handle) in handles {
            match handle.join() {
                Ok(Ok(root_stats)) => {
                    watched += 1;
                    stats.merge(root_stats);
                }
                Ok(Err(e)) => {
                    error!(root = %path.display(), "Could not watch sync root: {e}");
                    first_error.get_or_insert(e);
                }
                Err(_) => {
                    error!(root = %path.display(), "Watch thread panicked");
                }
            }
        }

        match first_error {
            Some(e) if watched == 0 => Err(e),
            _ => Ok(stats),
        }
    }
}

fn watch_root<E: RemoteExecutor>(
    mut pipeline: RootPipeline<E>,
    options: WatchOptions,
    shutdown: &AtomicBool,
) -> Result<SyncStats> {
    let local_path = pipeline.root().local_path().to_path_buf();

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let config = notify::Config::default()
        .with_follow_symlinks(options.symlinks == SymlinkTraversal::Follow);
    let mut watcher = RecommendedWatcher::new(tx, config)?;
    watcher.watch(&local_path, RecursiveMode::Recursive)?;

    let filter = IgnoreFilter::new(pipeline.root().ignore_patterns());
    let snapshot = TreeSnapshot::take(&local_path, &filter);
    for link in &snapshot.skipped_links {
        info!(link = %link.display(), "Not descending into symlinked directory");
    }
    info!(
        files = snapshot.files,
        dirs = snapshot.dirs,
        "Watching for local path \"{}\"",
        local_path.display()
    );

    let mut translator = EventTranslator::new();

    while !shutdown.load(Ordering::SeqCst) {
        let raw_events = match rx.recv_timeout(options.poll_interval) {
            Ok(Ok(event)) => translator.translate(event),
            Ok(Err(e)) => {
                error!(root = %local_path.display(), "Watch error: {e}");
                continue;
            }
            Err(RecvTimeoutError::Timeout) => translator.flush(),
            Err(RecvTimeoutError::Disconnected) => {
                warn!(root = %local_path.display(), "Watcher channel closed");
                break;
            }
        };

        for raw in &raw_events {
            pipeline.handle(raw);
        }
    }

    drop(watcher);
    for raw in &translator.flush() {
        pipeline.handle(raw);
    }

    info!("Stopped watching \"{}\"", local_path.display());
    Ok(pipeline.into_stats())
}
