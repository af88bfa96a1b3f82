//! # xsync-core
//!
//! Core library for xsync.
//!
//! This library turns local filesystem change events into an ordered
//! plan of remote actions (ensure a directory, transfer a file or tree,
//! delete a remote path) and runs that plan through an rsync/ssh
//! executor, one pipeline per configured sync root.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for the xsync library
pub mod error;

/// Configuration file parsing, discovery and validation
pub mod config;

/// Substring-based ignore filtering
pub mod filter;

/// Local-to-remote path mapping
pub mod mapper;

/// Raw event normalization into sync operations
pub mod normalizer;

/// Remote action planning and execution
pub mod sync;

/// Filesystem watching and per-root pipelines
pub mod watch;

pub use config::{ConfigManager, SyncRoot};
pub use error::{Result, XsyncError};

#[cfg(test)]
pub(crate) mod testing;
