use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Watch a local directory and mirror every change to remote hosts
///
/// Each configured sync root is pushed with rsync over ssh as soon as something changes locally.
#[derive(Parser, Debug)]
#[command(name = "xsync")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log the ssh/rsync commands without running them (dry-run)
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Use specific config file (default: nearest .xsync)
    #[arg(long, global = true, value_name = "PATH", env = "XSYNC_CONF")]
    pub conf: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch every sync root and push changes as they happen (default)
    Watch,

    /// Do a one-shot full sync of every sync root, then exit
    Full,

    /// Write a sample .xsync config into the current directory
    Init {
        /// Overwrite an existing .xsync
        #[arg(long)]
        force: bool,
    },
}
