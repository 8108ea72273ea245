//! Skycast Service - weather lookup web front end.
//!
//! Run with: `cargo run -p skycast-service`

use std::path::PathBuf;

use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use skycast_service::{AppState, Config};

/// Skycast Service - look up weather forecasts by city name.
#[derive(Parser, Debug)]
#[command(name = "skycast-service")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,

    /// Search history file (overrides config).
    #[arg(long)]
    history: Option<PathBuf>,

    /// Button color for the search page (overrides config).
    #[arg(long, env = "BG_COLOR")]
    bg_color: Option<String>,

    /// Weather API key (overrides config).
    #[arg(long, env = "SKYCAST_WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skycast_service=info".parse()?)
                .add_directive("skycast_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    // Override config with CLI args and environment
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(path) = args.history {
        config.storage.history_path = path;
    }
    if let Some(color) = args.bg_color {
        config.appearance.button_color = color;
    }
    if let Some(key) = args.weather_api_key {
        config.api.weather_api_key = key;
    }
    config.validate()?;

    if config.api.weather_api_key.is_empty() {
        warn!("No weather API key configured; forecasts will be unavailable");
    }
    info!("Search history at {}", config.storage.history_path.display());

    let listener = skycast_service::listen(&config.server).await?;
    let state = AppState::from_config(config)?;
    let app = skycast_service::app(state).layer(TraceLayer::new_for_http());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
