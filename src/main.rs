use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

use notify_migrate::{
    config::{ConfigLoader, Overrides},
    diff::{change_counts, unified_diff},
    migration::StepOrder,
    patch_file, PatchOptions,
};

/// Replace inline notification state in App.tsx with the useNotifications hook
#[derive(Parser, Debug)]
#[command(name = "notify-migrate", version, about)]
struct Cli {
    /// File to migrate
    path: PathBuf,

    /// Run the migration without writing the result
    #[arg(long)]
    dry_run: bool,

    /// Print a unified diff of the change
    #[arg(long)]
    diff: bool,

    /// Keep a copy of the original as <PATH>.bak
    #[arg(long)]
    backup: bool,

    /// Fail if a required rule does not apply
    #[arg(long)]
    strict: bool,

    /// Where the hook call goes relative to the state deletions
    #[arg(long, value_enum)]
    order: Option<StepOrder>,

    /// Print the rule report as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    notify_migrate::logging::init_logging(cli.verbose)?;

    info!("Starting notify-migrate v{}", notify_migrate::version());

    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let config = loader
        .load()
        .context("Failed to load configuration")?
        .with_overrides(Overrides {
            order: cli.order,
            backup: cli.backup,
            strict: cli.strict,
            show_diff: cli.diff,
        });
    debug!("Effective configuration: {:?}", config);

    let mut options = PatchOptions::from(&config);
    options.dry_run = cli.dry_run;

    let summary = patch_file(&cli.path, &options)
        .with_context(|| format!("Failed to migrate {}", cli.path.display()))?;

    if config.show_diff {
        print!("{}", unified_diff(&summary.before, &summary.after, &summary.path));
    }

    if cli.json {
        let report = serde_json::to_string_pretty(&summary.report)
            .context("Failed to serialize report")?;
        println!("{}", report);
    } else if cli.verbose {
        print!("{}", summary.report);
    }

    let (removed, added) = change_counts(&summary.before, &summary.after);
    debug!("{} lines removed, {} lines added", removed, added);

    println!("{}", summary.message());
    Ok(())
}
