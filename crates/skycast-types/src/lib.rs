//! Shared data types for the Skycast weather lookup service.
//!
//! These types describe the payloads exchanged with the geocoding and
//! weather APIs and the records persisted in the search history file.
//!
//! # Example
//!
//! ```
//! use skycast_types::{GeocodingResponse, SearchRecord};
//!
//! let response: GeocodingResponse = serde_json::from_str(r#"{"results": null}"#).unwrap();
//! assert!(!response.is_found());
//!
//! let record = SearchRecord::new("Berlin", "2024-05-01 12:00:00");
//! assert_eq!(record.city, "Berlin");
//! ```

pub mod types;

pub use types::{DayForecast, Forecast, GeocodingResponse, HISTORY_DATE_FORMAT, Place, SearchRecord};
