//! HTTP clients for the Skycast weather lookup service.
//!
//! [`WeatherClient`] talks to two third-party APIs:
//!
//! - the Open-Meteo geocoding search, which resolves a city name to a place
//! - the Visual Crossing timeline API, which returns a 7-day forecast
//!
//! Each lookup comes in two flavours. The `try_*` methods return a
//! [`ClientError`] describing what went wrong; the plain methods collapse every
//! failure to `None` after logging it, which is what the web handlers want.
//!
//! # Example
//!
//! ```no_run
//! use skycast_core::{ClientConfig, WeatherClient};
//!
//! # async fn example() -> Result<(), skycast_core::ClientError> {
//! let client = WeatherClient::new(ClientConfig::default())?;
//!
//! if let Some(names) = client.resolve_city("Lisbon").await {
//!     println!("found: {}", names.is_found());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{
    ClientConfig, DEFAULT_GEOCODING_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_WEATHER_URL, WeatherClient,
};
pub use error::{ClientError, Result};
