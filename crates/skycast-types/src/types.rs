//! Core types for geocoding, forecast and history data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Timestamp layout used by history records (`YYYY-MM-DD HH:MM:SS`).
pub const HISTORY_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One logged city lookup.
///
/// Records are only ever appended to the history file, so two lookups for the
/// same city produce two records.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchRecord {
    /// City name exactly as the user entered it.
    pub city: String,
    /// Local time of the lookup, formatted with [`HISTORY_DATE_FORMAT`].
    pub date: String,
}

impl SearchRecord {
    /// Create a record with an explicit date string.
    pub fn new(city: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            date: date.into(),
        }
    }

    /// Create a record stamped with the current local time.
    ///
    /// Falls back to UTC when the local offset cannot be determined, which
    /// happens on some platforms once the process is multi-threaded.
    pub fn now(city: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self::at(city, now)
    }

    /// Create a record stamped with the given instant.
    pub fn at(city: impl Into<String>, when: OffsetDateTime) -> Self {
        // The format description only uses components every OffsetDateTime has.
        let date = when.format(HISTORY_DATE_FORMAT).unwrap_or_default();
        Self::new(city, date)
    }
}

impl fmt::Display for SearchRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.city, self.date)
    }
}

/// Response body of the geocoding search endpoint.
///
/// A missing or `null` `results` field is how the geocoder reports that no
/// place matched the query.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeocodingResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub results: Option<Vec<Place>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub generationtime_ms: Option<f64>,
}

impl GeocodingResponse {
    /// Whether the geocoder returned at least one place.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.first_place().is_some()
    }

    /// The best (first) match, if any.
    #[must_use]
    pub fn first_place(&self) -> Option<&Place> {
        self.results.as_ref().and_then(|r| r.first())
    }
}

/// A place returned by the geocoder.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Place {
    pub id: Option<u64>,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    /// First-level administrative area (state, province, region).
    pub admin1: Option<String>,
    pub timezone: Option<String>,
    pub population: Option<u64>,
}

impl Place {
    /// Human readable name such as `"Paris, Île-de-France, France"`.
    ///
    /// Blank parts and parts equal to the place name are skipped.
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        for part in [self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
        {
            let part = part.trim();
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}

/// Response body of the weather timeline endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Forecast {
    pub resolved_address: Option<String>,
    pub address: Option<String>,
    pub timezone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub days: Vec<DayForecast>,
}

/// One day of the forecast, in metric units.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DayForecast {
    /// Calendar date, `YYYY-MM-DD`.
    pub datetime: String,
    /// Maximum temperature in °C.
    pub tempmax: Option<f64>,
    /// Minimum temperature in °C.
    pub tempmin: Option<f64>,
    /// Mean relative humidity in percent.
    pub humidity: Option<f64>,
}
