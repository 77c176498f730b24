// Configuration module for notify-migrate
// Defaults, then an optional TOML file, then command-line flags

pub mod config_loader;

pub use config_loader::{ConfigLoader, MigrateConfig, Overrides};
