//! HTML page templates.
//!
//! Templates live in `templates/` and are compiled in by askama. The structs
//! here hold display-ready strings so the templates stay free of formatting
//! logic.

use askama::Template;
use skycast_types::{DayForecast, Forecast, Place, SearchRecord};

/// Error shown on the welcome page when a lookup finds nothing.
pub const CITY_NOT_FOUND: &str = "The city was not found. Enter a city";
/// Message shown on the history page when no history file exists.
pub const NO_HISTORY: &str = "No search history found.";

const MISSING: &str = "n/a";

/// Search form, optionally with an error message.
#[derive(Debug, Template)]
#[template(path = "welcome.html")]
pub struct WelcomePage {
    pub error: Option<String>,
    pub button_color: String,
}

impl WelcomePage {
    pub fn new(button_color: &str) -> Self {
        Self {
            error: None,
            button_color: button_color.to_string(),
        }
    }

    pub fn city_not_found(button_color: &str) -> Self {
        Self {
            error: Some(CITY_NOT_FOUND.to_string()),
            button_color: button_color.to_string(),
        }
    }
}

/// Lookup results combining the geocoding and forecast payloads.
#[derive(Debug, Template)]
#[template(path = "show_weather.html")]
pub struct WeatherPage {
    /// City name as the user typed it.
    pub city: String,
    pub place: PlaceView,
    /// `None` when the weather service could not be reached.
    pub forecast: Option<ForecastView>,
    pub button_color: String,
}

impl WeatherPage {
    pub fn new(city: &str, place: &Place, forecast: Option<&Forecast>, button_color: &str) -> Self {
        Self {
            city: city.to_string(),
            place: PlaceView::from(place),
            forecast: forecast.map(ForecastView::from),
            button_color: button_color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceView {
    pub name: String,
    pub coordinates: String,
    pub timezone: String,
}

impl From<&Place> for PlaceView {
    fn from(place: &Place) -> Self {
        Self {
            name: place.display_name(),
            coordinates: format!("{:.4}, {:.4}", place.latitude, place.longitude),
            timezone: place.timezone.clone().unwrap_or_else(|| MISSING.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastView {
    /// Address as resolved by the weather service; empty if not reported.
    pub address: String,
    pub days: Vec<DayRow>,
}

impl From<&Forecast> for ForecastView {
    fn from(forecast: &Forecast) -> Self {
        Self {
            address: forecast.resolved_address.clone().unwrap_or_default(),
            days: forecast.days.iter().map(DayRow::from).collect(),
        }
    }
}

/// One table row of the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub date: String,
    pub high: String,
    pub low: String,
    pub humidity: String,
}

impl From<&DayForecast> for DayRow {
    fn from(day: &DayForecast) -> Self {
        Self {
            date: day.datetime.clone(),
            high: format_celsius(day.tempmax),
            low: format_celsius(day.tempmin),
            humidity: day
                .humidity
                .map_or_else(|| MISSING.to_string(), |h| format!("{:.0}%", h)),
        }
    }
}

fn format_celsius(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |t| format!("{:.1} °C", t))
}

/// Every logged search, oldest first.
#[derive(Debug, Template)]
#[template(path = "history.html")]
pub struct HistoryPage {
    pub records: Vec<SearchRecord>,
    pub error: Option<String>,
    pub button_color: String,
}

impl HistoryPage {
    pub fn new(records: Vec<SearchRecord>, button_color: &str) -> Self {
        Self {
            records,
            error: None,
            button_color: button_color.to_string(),
        }
    }

    pub fn missing(button_color: &str) -> Self {
        Self {
            records: Vec::new(),
            error: Some(NO_HISTORY.to_string()),
            button_color: button_color.to_string(),
        }
    }
}

/// Fixed page served for one special city name.
#[derive(Debug, Template)]
#[template(path = "georgie_image.html")]
pub struct GeorgiePage {
    pub button_color: String,
}
