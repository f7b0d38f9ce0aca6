pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{Config, DataConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, ConfigError, DataError, LocationError, NetworkError, WeatherError};

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};

/// Log file name, created inside the directory handed to [`init`].
pub const LOG_FILE_NAME: &str = "skycast.log";

/// Initialize the core application.
///
/// The terminal belongs to the UI, so tracing output is written to
/// `<log_dir>/skycast.log` instead of stdout.
pub fn init(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let log_path = log_dir.join(LOG_FILE_NAME);
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("SkyCast core initialized (log: {})", log_path.display());
    Ok(())
}
