//! rerate - movie ratings migration
//!
//! Reads IMDb and Kinopoisk rating exports, merges them, and rates each film
//! on Criticker, asking on the terminal when a search result is ambiguous.

use anyhow::{Context, Result};
use clap::Parser;
use rerate_common::config::{resolve_root_folder, AppConfig, CRITICKER_COOKIES_ENV_VAR, ROOT_ENV_VAR};
use rerate_common::logging::init_logging;
use rerate_sync::matching::TerminalPrompt;
use rerate_sync::ratings::{load_ratings, print_ratings, MovieRating};
use rerate_sync::site::{CritickerClient, DryRun, RatingsSite};
use rerate_sync::sync::{SyncDriver, SyncReport};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "rerate", version, about = "Migrate IMDb and Kinopoisk ratings to Criticker")]
struct Cli {
    /// Root folder holding rerate.toml, .env, data and logs
    #[arg(long)]
    root: Option<PathBuf>,

    /// Config file (default: <root>/rerate.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// IMDb ratings export, overrides the configured path
    #[arg(long)]
    imdb: Option<PathBuf>,

    /// Kinopoisk ratings export, overrides the configured path
    #[arg(long)]
    kinopoisk: Option<PathBuf>,

    /// Print the merged ratings and exit
    #[arg(long)]
    list: bool,

    /// Match and choose, but do not submit ratings
    #[arg(long)]
    dry_run: bool,

    /// Log filter (overrides [logging] level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let root_folder = resolve_root_folder(cli.root.as_deref(), ROOT_ENV_VAR)?;
    let mut config = AppConfig::load(&root_folder, cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(path) = cli.imdb {
        config.imdb_ratings_path = path;
    }
    if let Some(path) = cli.kinopoisk {
        config.kinopoisk_ratings_path = path;
    }

    init_logging(&config.logging)?;

    info!("Starting rerate v{}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", root_folder.display());

    let ingest = load_ratings(
        Some(config.imdb_ratings_path.as_path()),
        Some(config.kinopoisk_ratings_path.as_path()),
    );
    info!(
        "{} ratings ready from {} source(s), {} rows rejected",
        ingest.ratings.len(),
        ingest.sources_loaded,
        ingest.rejected.len()
    );

    if cli.list {
        print_ratings(&ingest.ratings);
        return Ok(());
    }

    if !config.criticker.has_cookies() {
        error!(
            "Cookies for Criticker are not set. Please set {} in {}/.env or [criticker] cookies in rerate.toml",
            CRITICKER_COOKIES_ENV_VAR,
            root_folder.display()
        );
        return Ok(());
    }

    info!("Initializing Criticker session");
    let client = CritickerClient::new(&config.criticker).context("Failed to create Criticker client")?;
    let timeout = Duration::from_secs(config.criticker.request_timeout_secs);

    let report = if cli.dry_run {
        info!("Dry run: ratings will not be submitted");
        run_sync(DryRun::new(client), timeout, &ingest.ratings).await
    } else {
        run_sync(client, timeout, &ingest.ratings).await
    };

    report.log_summary();
    Ok(())
}

async fn run_sync<S: RatingsSite>(site: S, timeout: Duration, ratings: &[MovieRating]) -> SyncReport {
    let mut driver = SyncDriver::new(site, TerminalPrompt).with_timeout(timeout);
    driver.run(ratings).await
}
