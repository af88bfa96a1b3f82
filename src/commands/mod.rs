pub mod common;
pub mod full;
pub mod init;
pub mod watch;

pub use common::SyncOptions;
pub use full::Full;
pub use init::Init;
pub use watch::Watch;
