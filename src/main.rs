use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Terminal weather dashboard: current conditions and a 5-day forecast.
#[derive(Parser, Debug)]
#[command(name = "skycast", version, about)]
struct Cli {
    /// Show this city on startup instead of detecting the location
    #[arg(long)]
    city: Option<String>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in the light theme
    #[arg(long)]
    light: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Create application and initialize core
    let mut app = skycast_core::App::new(cli.config.as_deref())?;
    skycast_core::init(&app.config().config_dir)?;
    app.initialize()?;

    tracing::info!("SkyCast application started");

    if !app.config().weather.has_api_key() {
        eprintln!(
            "No OpenWeatherMap API key configured. Set {} or `weather.api_key` in the config file.",
            skycast_core::config::API_KEY_ENV
        );
    }

    let options = skycast_ui::RunOptions {
        initial_city: cli.city.filter(|c| !c.trim().is_empty()),
        light_theme: cli.light,
    };
    let result = skycast_ui::run(app.shared_config(), options);

    // Graceful shutdown
    app.shutdown()?;

    result
}
