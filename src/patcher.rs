use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::MigrateConfig;
use crate::error::{MigrateError, MigrateResult};
use crate::file::{read_source, write_source, WriteOptions};
use crate::migration::{notification_migration, MigrationReport, StepOrder};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    pub order: StepOrder,
    pub backup: bool,
    pub strict: bool,
    pub dry_run: bool,
}

impl From<&MigrateConfig> for PatchOptions {
    fn from(config: &MigrateConfig) -> Self {
        Self {
            order: config.order,
            backup: config.backup,
            strict: config.strict,
            dry_run: false,
        }
    }
}

/// Result of patching one file
#[derive(Debug, Clone)]
pub struct PatchSummary {
    pub path: PathBuf,
    pub before: String,
    pub after: String,
    pub report: MigrationReport,
    pub written: bool,
}

impl PatchSummary {
    /// One-line completion message for the terminal
    pub fn message(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());

        if self.written {
            format!("{} updated successfully.", name)
        } else if self.report.changed {
            format!("{}: dry run, no changes written.", name)
        } else {
            format!("{} unchanged.", name)
        }
    }
}

/// Migrate the file at `path` in place.
///
/// Unchanged text is never written back. In strict mode a missed required rule
/// fails the run before anything touches the disk.
pub fn patch_file(path: impl AsRef<Path>, options: &PatchOptions) -> MigrateResult<PatchSummary> {
    let path = path.as_ref();
    info!("Migrating {} ({:?} order)", path.display(), options.order);

    let source = read_source(path)?;
    let migration = notification_migration(options.order)?;
    let (after, report) = migration.run(&source.content);

    let missed = report.missed_required();
    if !missed.is_empty() {
        for name in &missed {
            warn!("Required rule did not apply: {}", name);
        }
        if options.strict {
            return Err(MigrateError::RequiredRuleMissed { rules: missed });
        }
    }

    let written = report.changed && !options.dry_run;
    if written {
        write_source(&source, &after, WriteOptions { backup: options.backup })?;
        info!("Wrote migrated content to {}", path.display());
    }

    Ok(PatchSummary {
        path: path.to_path_buf(),
        before: source.content,
        after,
        report,
        written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::backup_path;
    use crate::migration::notifications::{HOOK_CALL, HOOK_IMPORT, SCHEDULED_STATE_LINE, TYPES_IMPORT};
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    fn component() -> String {
        format!(
            "{}\n\nfunction App() {{\n{}\n  const showNotification = (message: string) => {{\n    alert(message);\n  }};\n  return null;\n}}\n",
            TYPES_IMPORT, SCHEDULED_STATE_LINE
        )
    }

    #[test]
    fn test_patch_rewrites_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("App.tsx");
        fs::write(&path, component())?;

        let summary = patch_file(&path, &PatchOptions::default())?;
        let on_disk = fs::read_to_string(&path)?;

        assert!(summary.written);
        assert_eq!(on_disk, summary.after);
        assert!(on_disk.contains(HOOK_IMPORT));
        assert!(on_disk.contains(HOOK_CALL));
        assert!(!on_disk.contains("const showNotification"));
        assert!(on_disk.contains("  return null;\n}\n"));
        assert_eq!(summary.message(), "App.tsx updated successfully.");

        Ok(())
    }

    #[test]
    fn test_dry_run_leaves_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("App.tsx");
        fs::write(&path, component())?;

        let options = PatchOptions {
            dry_run: true,
            ..PatchOptions::default()
        };
        let summary = patch_file(&path, &options)?;

        assert!(!summary.written);
        assert!(summary.report.changed);
        assert_eq!(fs::read_to_string(&path)?, component());
        assert_eq!(summary.message(), "App.tsx: dry run, no changes written.");

        Ok(())
    }

    #[test]
    fn test_unchanged_file_is_not_rewritten() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("App.tsx");
        fs::write(&path, "export {};\n")?;

        let options = PatchOptions {
            backup: true,
            ..PatchOptions::default()
        };
        let summary = patch_file(&path, &options)?;

        assert!(!summary.written);
        assert!(!backup_path(&path).exists());
        assert_eq!(summary.message(), "App.tsx unchanged.");

        Ok(())
    }

    #[test]
    fn test_strict_mode_refuses_partial_migration() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("App.tsx");
        fs::write(&path, component())?;

        let options = PatchOptions {
            strict: true,
            ..PatchOptions::default()
        };
        let err = patch_file(&path, &options).unwrap_err();

        match err {
            MigrateError::RequiredRuleMissed { rules } => {
                assert!(rules.contains(&"remove-status-state".to_string()));
                assert!(rules.contains(&"remove-request-permission".to_string()));
                assert!(!rules.contains(&"add-hook-import".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_to_string(&path)?, component());

        Ok(())
    }

    #[test]
    fn test_backup_written_for_change() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("App.tsx");
        fs::write(&path, component())?;

        let config = MigrateConfig {
            backup: true,
            ..MigrateConfig::default()
        };
        patch_file(&path, &PatchOptions::from(&config))?;

        assert_eq!(fs::read_to_string(backup_path(&path))?, component());
        Ok(())
    }
}
