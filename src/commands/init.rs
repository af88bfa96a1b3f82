use anyhow::Context;
use xsync_core::ConfigManager;

pub struct Init;

impl Init {
    pub fn execute(force: bool, verbose: bool) -> anyhow::Result<()> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        if verbose {
            println!("Writing config into {}", current_dir.display());
        }

        let path = ConfigManager::scaffold(&current_dir, force)?;
        println!("Created {}", path.display());
        println!("Edit remote_host and remote_path, then run `xsync` to start watching.");
        Ok(())
    }
}
