//! Sync statistics reporting

use super::SyncStats;

/// Sync operation reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Create a new reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(stats: &SyncStats) -> String {
        let mut output = String::new();

        output.push_str("\n=== Sync Summary ===\n");
        output.push_str(&format!("Events:       {}\n", stats.events));
        output.push_str(&format!("Operations:   {}\n", stats.operations));
        output.push_str(&format!("Dirs ensured: {}\n", stats.dirs_ensured));
        output.push_str(&format!("Transferred:  {}\n", stats.transferred));
        output.push_str(&format!("Deleted:      {}\n", stats.deleted));

        if !stats.errors.is_empty() {
            output.push_str(&format!("\nErrors ({}):\n", stats.errors.len()));
            for error in &stats.errors {
                output.push_str(&format!("  - {error}\n"));
            }
        }

        output.push_str(&format!("\nTotal remote actions: {}\n", stats.total_actions()));

        if stats.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}

impl Default for SyncReporter {
    fn default() -> Self {
        Self::new()
    }
}
