// notify-migrate - moves inline notification state in App.tsx into the
// useNotifications hook

pub mod config;
pub mod diff;
pub mod error;
pub mod file;
pub mod logging;
pub mod migration;
pub mod patcher;

pub use error::{MigrateError, MigrateResult};
pub use patcher::{patch_file, PatchOptions, PatchSummary};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
