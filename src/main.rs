mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use commands::SyncOptions;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = SyncOptions::new(cli.verbose, cli.dry_run, cli.conf.as_deref());

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            commands::Watch::execute(&options).context("Failed to execute watch command")?;
        }
        Commands::Full => {
            commands::Full::execute(&options).context("Failed to execute full sync")?;
        }
        Commands::Init { force } => {
            commands::Init::execute(force, cli.verbose).context("Failed to execute init command")?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
