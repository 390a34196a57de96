//! yagcil CLI
//!
//! Local entry point for syncing and inspecting storage. The read API is
//! served by `yagcil-server`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use yagcil::{
    error::Result,
    models::{Config, SyncMode},
    pipeline,
    services::MelangeFeed,
    storage::LocalStorage,
};

/// yagcil - contest task tracker
#[derive(Parser, Debug)]
#[command(name = "yagcil", version, about = "Contest task tracker")]
struct Cli {
    /// Path to storage directory holding records and config.toml
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Config file (default: {storage_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge upstream organizations and tasks into storage
    Sync {
        /// Which configured years to merge
        #[arg(long, value_enum, default_value_t = SyncMode::Active)]
        mode: SyncMode,
    },

    /// Validate the configuration file
    Validate,

    /// Show configured years and stored record counts
    Info,
}

/// Initialize logging based on verbosity flags.
fn init_logging(verbose: bool, quiet: bool) {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (_, true) => "warn",
        _ => "info",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.storage_dir.join("config.toml"));

    match cli.command {
        Command::Sync { mode } => {
            let config = Config::load_or_default(&config_path);
            config.validate()?;

            let store = Arc::new(LocalStorage::open(&cli.storage_dir).await?);
            let feed = Arc::new(MelangeFeed::new(config.feed.clone())?);
            let report = pipeline::run_sync(&config, store, feed, mode).await?;

            if !report.is_success() {
                log::error!("{} year(s) failed to sync", report.failures.len());
                return Ok(ExitCode::FAILURE);
            }
        }

        Command::Validate => {
            pipeline::run_validate(&config_path)?;
            log::info!("All validations passed!");
        }

        Command::Info => {
            let config = Config::load_or_default(&config_path);
            let store = LocalStorage::open(&cli.storage_dir).await?;
            log::info!("Storage directory: {}", store.root_dir().display());
            pipeline::run_info(&config, &store).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
