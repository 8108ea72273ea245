//! Application state shared across handlers.

use std::sync::Arc;

use skycast_core::{ClientError, WeatherClient};
use skycast_store::HistoryStore;
use tokio::sync::Mutex;

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// Search history. The mutex makes each read-modify-write append exclusive,
    /// so concurrent lookups cannot drop each other's records.
    pub history: Mutex<HistoryStore>,
    /// Geocoding and forecast client.
    pub client: WeatherClient,
    /// Effective configuration (file, then CLI/env overrides).
    pub config: Config,
}

impl AppState {
    /// Create new application state.
    pub fn new(history: HistoryStore, client: WeatherClient, config: Config) -> Arc<Self> {
        Arc::new(Self {
            history: Mutex::new(history),
            client,
            config,
        })
    }

    /// Build the history store and API client described by `config`.
    pub fn from_config(config: Config) -> Result<Arc<Self>, ClientError> {
        let client = WeatherClient::new(config.client_config())?;
        let history = HistoryStore::open(&config.storage.history_path);
        Ok(Self::new(history, client, config))
    }

    /// Button color handed to the page templates.
    pub fn button_color(&self) -> &str {
        &self.config.appearance.button_color
    }
}
