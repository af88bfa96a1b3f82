use tracing::error;
use xsync_core::sync::{ShellExecutor, SyncReporter, SyncStats};
use xsync_core::watch::RootPipeline;

use super::SyncOptions;

pub struct Full;

impl Full {
    pub fn execute(options: &SyncOptions) -> anyhow::Result<()> {
        let roots = options.load_roots()?;
        let mut stats = SyncStats::default();

        for root in roots {
            let executor = ShellExecutor::new(&root, options.dry_run);
            let mut pipeline = RootPipeline::new(root, executor);
            if let Err(e) = pipeline.full_sync() {
                error!(root = %pipeline.root().local_path().display(), "Full sync failed: {e}");
            }
            stats.merge(pipeline.into_stats());
        }

        println!("{}", SyncReporter::generate_summary(&stats));

        if !stats.is_success() {
            anyhow::bail!("{} sync root(s) failed", stats.errors.len());
        }
        Ok(())
    }
}
