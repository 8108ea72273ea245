//! HTML routes: search form, lookup, history view and history download.
//!
//! Handlers hold the history lock only around file access, never across the
//! outbound API calls.

use std::sync::Arc;

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use skycast_types::GeocodingResponse;
use tracing::{debug, info};

use crate::api::AppError;
use crate::state::AppState;
use crate::views::{GeorgiePage, HistoryPage, WeatherPage, WelcomePage};

/// City name that always gets the fixed Georgie page instead of a lookup.
pub const EASTER_EGG_CITY: &str = "georgie";

/// Body of the 404 returned by `/download_history` when there is no history.
pub const NO_HISTORY_FILE: &str = "No history file found";

/// Create the page router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/get_info", get(get_info))
        .route("/history", get(history))
        .route("/download_history", get(download_history))
}

fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

/// Search form.
async fn home(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render(&WelcomePage::new(state.button_color()))
}

/// Query parameters for `/get_info`.
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    pub city: Option<String>,
}

/// Look up a city and render its forecast.
///
/// Only successful geocoding lookups are logged to the history. A forecast
/// failure still renders the page (without the table) and is still logged.
async fn get_info(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LookupQuery>,
) -> Result<Html<String>, AppError> {
    let city = query.city.unwrap_or_default();

    if city == EASTER_EGG_CITY {
        debug!("Serving the {} page", EASTER_EGG_CITY);
        return render(&GeorgiePage {
            button_color: state.button_color().to_string(),
        });
    }

    if city.trim().is_empty() {
        return render(&WelcomePage::city_not_found(state.button_color()));
    }

    info!("Looking up weather for {:?}", city);

    let names = state.client.resolve_city(&city).await;
    let Some(place) = names.as_ref().and_then(GeocodingResponse::first_place) else {
        info!("No place found for {:?}", city);
        return render(&WelcomePage::city_not_found(state.button_color()));
    };

    let forecast = state.client.fetch_forecast(&city).await;

    state.history.lock().await.append_record(&city)?;

    render(&WeatherPage::new(
        &city,
        place,
        forecast.as_ref(),
        state.button_color(),
    ))
}

/// Every logged search, oldest first.
async fn history(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let records = state.history.lock().await.load()?;

    let page = match records {
        Some(records) => HistoryPage::new(records, state.button_color()),
        None => HistoryPage::missing(state.button_color()),
    };
    render(&page)
}

/// The raw history file as an attachment.
async fn download_history(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let (bytes, file_name) = {
        let history = state.history.lock().await;
        let file_name = history
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(skycast_store::HISTORY_FILE_NAME)
            .to_string();
        (history.raw_bytes()?, file_name)
    };

    let Some(bytes) = bytes else {
        return Ok((StatusCode::NOT_FOUND, NO_HISTORY_FILE).into_response());
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
        .into_response())
}
