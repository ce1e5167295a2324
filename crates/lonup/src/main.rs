//! Lon Updater - verified, atomic self-update for the Lon application
//!
//! Downloads the latest release, verifies its SHA-256 checksum against a
//! published reference, stops any running instance, backs up the
//! installed executable and replaces it atomically, rolling back from
//! the backup on failure.

use clap::Parser;
use lonup::config::{UpdaterConfig, DEFAULT_CONFIG_FILE};
use lonup::confirm::{AssumeYes, Confirm, ConsolePrompt};
use lonup::errors::EXIT_CONFIG;
use lonup::fetch::HttpFetcher;
use lonup::logging::UpdateLog;
use lonup::orchestrator::Orchestrator;
use lonup::process_guard::{ProcessGuard, SystemProcessControl};
use std::path::PathBuf;
use tracing::{error, Level};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "lonup")]
#[command(about = "Lon Updater - verified, atomic self-update for Lon.exe", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Path to the updater configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory for the append-only update log
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Proceed without asking for confirmation
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let log = UpdateLog::open(&cli.log_dir);
    log.log("========== Starting Lon Updater ==========");

    let config = match UpdaterConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            log.log(&format!("Update aborted: {}", e));
            std::process::exit(EXIT_CONFIG);
        }
    };
    log.log(&format!("Using config: {}", cli.config.display()));

    let fetcher = Box::new(HttpFetcher::new(config.fetch_timeout()));
    let guard = ProcessGuard::new(Box::new(SystemProcessControl::new()));
    let confirmer: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(ConsolePrompt)
    };

    let mut orchestrator = Orchestrator::new(config, fetcher, guard, confirmer, &log);
    let outcome = orchestrator.run().await;

    log.log("==========================================");
    std::process::exit(outcome.exit_code());
}
