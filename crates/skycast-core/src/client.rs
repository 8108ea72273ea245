//! Geocoding and forecast client.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use skycast_types::{Forecast, GeocodingResponse};

use crate::error::{ClientError, Result};

/// Open-Meteo geocoding API.
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com";
/// Visual Crossing weather API.
pub const DEFAULT_WEATHER_URL: &str = "https://weather.visualcrossing.com";
/// Request timeout applied to both APIs unless configured otherwise.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const USER_AGENT: &str = concat!("skycast/", env!("CARGO_PKG_VERSION"));
const GEOCODING_PATH: [&str; 2] = ["v1", "search"];
const TIMELINE_PATH: [&str; 4] = ["VisualCrossingWebServices", "rest", "services", "timeline"];
const FORECAST_RANGE: &str = "next7days";
const FORECAST_ELEMENTS: &str = "datetime,tempmax,tempmin,humidity";

/// Endpoints and credentials for [`WeatherClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the geocoding service.
    pub geocoding_url: String,
    /// Base URL of the weather service.
    pub weather_url: String,
    /// Key sent in the `key` query parameter of forecast requests.
    pub weather_api_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            weather_api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for the geocoding and weather APIs.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    geocoding_url: Url,
    weather_url: Url,
    api_key: String,
}

impl WeatherClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(config, client)
    }

    /// Create a client with a custom reqwest Client.
    pub fn with_client(config: ClientConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            geocoding_url: parse_base_url(&config.geocoding_url)?,
            weather_url: parse_base_url(&config.weather_url)?,
            api_key: config.weather_api_key,
        })
    }

    /// Resolve a city name, returning `None` on any failure.
    ///
    /// A `Some` response can still contain no places; check
    /// [`GeocodingResponse::is_found`].
    pub async fn resolve_city(&self, name: &str) -> Option<GeocodingResponse> {
        match self.try_resolve_city(name).await {
            Ok(response) => Some(response),
            Err(e) => {
                warn!("Geocoding lookup for {:?} failed: {}", name, e);
                None
            }
        }
    }

    /// Fetch the 7-day forecast for a city, returning `None` on any failure.
    pub async fn fetch_forecast(&self, name: &str) -> Option<Forecast> {
        match self.try_fetch_forecast(name).await {
            Ok(forecast) => Some(forecast),
            Err(e) => {
                warn!("Forecast lookup for {:?} failed: {}", name, e);
                None
            }
        }
    }

    /// Resolve a city name through the geocoding search endpoint.
    pub async fn try_resolve_city(&self, name: &str) -> Result<GeocodingResponse> {
        let url = self.geocoding_request_url(name)?;
        self.get_json(url).await
    }

    /// Fetch the 7-day forecast for a city from the timeline endpoint.
    pub async fn try_fetch_forecast(&self, name: &str) -> Result<Forecast> {
        let url = self.forecast_request_url(name)?;
        self.get_json(url).await
    }

    fn geocoding_request_url(&self, name: &str) -> Result<Url> {
        let mut url = self.geocoding_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.geocoding_url.to_string()))?
            .pop_if_empty()
            .extend(GEOCODING_PATH);
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("count", "1")
            .append_pair("language", "en")
            .append_pair("format", "json");
        Ok(url)
    }

    fn forecast_request_url(&self, name: &str) -> Result<Url> {
        let mut url = self.weather_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.weather_url.to_string()))?
            .pop_if_empty()
            .extend(TIMELINE_PATH)
            .push(name)
            .push(FORECAST_RANGE);
        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("elements", FORECAST_ELEMENTS)
            .append_pair("include", "days")
            .append_pair("key", &self.api_key)
            .append_pair("contentType", "json");
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // Query strings may carry the API key, keep them out of logs and errors.
        let shown = without_query(&url);
        debug!("GET {}", shown);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Network {
                url: shown.clone(),
                source: e.without_url(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::Status {
                url: shown,
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            url: shown,
            source: e.without_url(),
        })
    }
}

fn parse_base_url(url: &str) -> Result<Url> {
    let trimmed = url.trim_end_matches('/');
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ClientError::InvalidUrl(format!(
            "URL must start with http:// or https://, got: {}",
            url
        )));
    }
    Url::parse(trimmed).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", url, e)))
}

fn without_query(url: &Url) -> String {
    let mut shown = url.clone();
    shown.set_query(None);
    shown.to_string()
}
