//! Tracing subscriber setup
//!
//! Two outputs: human-readable stderr and an append-only `rerate.log` inside
//! the configured log directory. `RUST_LOG` overrides the configured level.

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "rerate.log";

/// Initialize the global tracing subscriber
///
/// If the log file cannot be opened, logging continues on stderr only and a
/// warning is emitted once the subscriber is installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let (file_layer, file_error) = match open_log_file(&config.log_dir) {
        Ok(file) => (
            Some(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false)),
            None,
        ),
        Err(e) => (None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))?;

    match file_error {
        Some(e) => warn!("File logging disabled: {}", e),
        None => info!(
            "Logging to {}",
            log_file_path(&config.log_dir).display()
        ),
    }

    Ok(())
}

/// Path of the log file for a log directory
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    log_dir.join(LOG_FILE_NAME)
}

fn open_log_file(log_dir: &Path) -> Result<File> {
    fs::create_dir_all(log_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path(log_dir))?;
    Ok(file)
}
