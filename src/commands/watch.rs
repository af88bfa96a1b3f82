use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use xsync_core::sync::SyncReporter;
use xsync_core::watch::{WatchCoordinator, WatchOptions};

use super::SyncOptions;

pub struct Watch;

impl Watch {
    pub fn execute(options: &SyncOptions) -> anyhow::Result<()> {
        let roots = options.load_roots()?;

        // Ctrl+C stops the watchers; in-flight transfers still finish
        let shutdown = Arc::new(AtomicBool::new(false));
        {
            let shutdown = Arc::clone(&shutdown);
            ctrlc::set_handler(move || {
                eprintln!("\nInterrupted, finishing in-flight syncs...");
                shutdown.store(true, Ordering::SeqCst);
            })
            .context("Failed to set Ctrl+C handler")?;
        }

        let coordinator = WatchCoordinator::new(
            roots,
            WatchOptions {
                dry_run: options.dry_run,
                ..WatchOptions::default()
            },
        );
        let stats = coordinator
            .run(&shutdown)
            .context("Could not watch any sync root")?;

        println!("{}", SyncReporter::generate_summary(&stats));
        Ok(())
    }
}
