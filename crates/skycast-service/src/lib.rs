//! Web front end for looking up city weather forecasts.
//!
//! This crate provides a service that:
//! - Resolves a city name through a geocoding API
//! - Fetches its 7-day forecast from a weather API
//! - Renders both as an HTML page
//! - Logs every successful lookup to a JSON history file
//!
//! # Routes
//!
//! - `GET /` - Search form
//! - `GET /get_info?city=<name>` - Forecast page for a city
//! - `GET /history` - Every past search, oldest first
//! - `GET /download_history` - The raw history file (404 if there is none)
//! - `GET /api/health` - Service health check
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/skycast/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:5000"
//!
//! [storage]
//! history_path = "search_history.json"
//!
//! [appearance]
//! button_color = "#007BFF"   # overridden by BG_COLOR
//!
//! [api]
//! weather_api_key = "..."    # or SKYCAST_WEATHER_API_KEY
//! timeout_secs = 10
//! ```

pub mod api;
pub mod config;
pub mod pages;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub use api::AppError;
pub use config::{
    ApiConfig, AppearanceConfig, Config, ConfigError, ServerConfig, StorageConfig,
    ValidationError,
};
pub use state::AppState;

/// Build the full application router.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(pages::router())
        .merge(api::router())
        .with_state(state)
}

/// Bind the listening socket for `server.bind`.
///
/// Host names such as `localhost` are resolved, so any address that passes
/// [`ServerConfig::validate`] can be bound.
pub async fn listen(server: &ServerConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(server.bind.as_str()).await?;
    info!("Starting server on {}", listener.local_addr()?);
    Ok(listener)
}
