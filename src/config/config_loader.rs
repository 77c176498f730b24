use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::{MigrateError, MigrateResult};
use crate::migration::StepOrder;

/// Main configuration structure for notify-migrate
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    /// Order of the hook call relative to the state deletions
    pub order: StepOrder,

    /// Keep a `.bak` copy of the original file
    pub backup: bool,

    /// Fail when a required rule does not apply
    pub strict: bool,

    /// Print a unified diff of the change
    pub show_diff: bool,
}

/// Command-line values layered over the loaded configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides {
    pub order: Option<StepOrder>,
    pub backup: bool,
    pub strict: bool,
    pub show_diff: bool,
}

impl MigrateConfig {
    /// Apply command-line values; a flag can switch a setting on but never off
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(order) = overrides.order {
            self.order = order;
        }
        self.backup |= overrides.backup;
        self.strict |= overrides.strict;
        self.show_diff |= overrides.show_diff;
        self
    }
}

pub const CONFIG_FILE_NAME: &str = "notify-migrate.toml";

/// The configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    explicit: bool,
}

impl ConfigLoader {
    /// Create a new config loader reading from the user config directory
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            explicit: false,
        }
    }

    /// Set a custom config path; a missing file is then an error
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(path.into()),
            explicit: true,
        }
    }

    /// Get the default config path
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|config| config.join(CONFIG_FILE_NAME))
    }

    /// Load the configuration
    pub fn load(&self) -> MigrateResult<MigrateConfig> {
        let Some(path) = self.config_path.as_deref() else {
            return Ok(MigrateConfig::default());
        };

        if !path.exists() {
            if self.explicit {
                return Err(MigrateError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(MigrateConfig::default());
        }

        let content = fs::read_to_string(path).map_err(|e| MigrateError::io_error(e, path))?;
        let config = toml::from_str(&content).map_err(|e| {
            MigrateError::config_error(format!("failed to parse {}: {}", path.display(), e))
        })?;

        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_default_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let loader = ConfigLoader {
            config_path: Some(dir.path().join("config.toml")),
            explicit: false,
        };

        let config = loader.load()?;
        assert_eq!(config, MigrateConfig::default());
        assert_eq!(config.order, StepOrder::HookFirst);
        assert!(!config.backup);

        Ok(())
    }

    #[test]
    fn test_default_path_is_in_config_dir() {
        let loader = ConfigLoader::new();
        assert_eq!(
            loader.config_path,
            dirs::config_dir().map(|dir| dir.join("notify-migrate.toml"))
        );
        assert!(!loader.explicit);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::with_path(dir.path().join("absent.toml"));
        assert!(matches!(loader.load(), Err(MigrateError::Config { .. })));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "order = \"original\"\nbackup = true\n")?;

        let config = ConfigLoader::with_path(&path).load()?;
        assert_eq!(config.order, StepOrder::Original);
        assert!(config.backup);
        assert!(!config.strict);
        assert!(!config.show_diff);

        Ok(())
    }

    #[test]
    fn test_unknown_key_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "dry_run = true\n")?;

        let err = ConfigLoader::with_path(&path).load().unwrap_err();
        assert!(err.to_string().contains("dry_run"));

        Ok(())
    }

    #[test]
    fn test_flags_override_file_values() {
        let file = MigrateConfig {
            order: StepOrder::Original,
            backup: true,
            ..MigrateConfig::default()
        };

        let merged = file.clone().with_overrides(Overrides {
            order: Some(StepOrder::HookFirst),
            strict: true,
            show_diff: true,
            ..Overrides::default()
        });
        assert_eq!(merged.order, StepOrder::HookFirst);
        assert!(merged.backup);
        assert!(merged.strict);
        assert!(merged.show_diff);

        // Absent flags keep what the file said
        assert_eq!(file.clone().with_overrides(Overrides::default()), file);
    }
}
