//! End-to-end lookup tests against mock geocoding and weather APIs.
//!
//! Run with:
//! ```
//! cargo test --package skycast-service --test lookup_flow
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use http_body_util::BodyExt;
use tower::ServiceExt;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast_service::{AppState, Config};
use skycast_store::HistoryStore;

const TIMELINE: &str = "/VisualCrossingWebServices/rest/services/timeline";

struct TestApp {
    state: Arc<AppState>,
    server: MockServer,
    _dir: tempfile::TempDir,
}

impl TestApp {
    async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();

        let mut config = Config::default();
        config.storage.history_path = dir.path().join("search_history.json");
        config.api.geocoding_url = server.uri();
        config.api.weather_url = server.uri();
        config.api.weather_api_key = "test-key".to_string();

        let state = AppState::from_config(config).unwrap();
        Self {
            state,
            server,
            _dir: dir,
        }
    }

    async fn get(&self, uri: &str) -> Response {
        skycast_service::app(Arc::clone(&self.state))
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn history(&self) -> Vec<String> {
        let store: HistoryStore = self.state.history.lock().await.clone();
        store
            .load()
            .unwrap()
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.city)
            .collect()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn geocoding_hit(name: &str, country: &str) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": 1,
            "name": name,
            "latitude": 48.85341,
            "longitude": 2.3488,
            "country": country,
            "timezone": "CET"
        }],
        "generationtime_ms": 0.5
    })
}

fn forecast(address: &str) -> serde_json::Value {
    serde_json::json!({
        "resolvedAddress": address,
        "timezone": "CET",
        "days": [
            {"datetime": "2024-07-01", "tempmax": 27.3, "tempmin": 16.8, "humidity": 55.0},
            {"datetime": "2024-07-02", "tempmax": 25.0, "tempmin": 15.1, "humidity": 62.0},
            {"datetime": "2024-07-03", "tempmax": 22.9, "tempmin": 14.0, "humidity": 70.0}
        ]
    })
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_hit("Paris", "France")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{}/Paris/next7days", TIMELINE)))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast("Paris, Île-de-France, France")))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_lookup_renders_both_payloads_and_logs_once() {
    let app = TestApp::start().await;
    mount_paris(&app.server).await;

    let response = app.get("/get_info?city=Paris").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    // Geocoding payload
    assert!(body.contains("Paris, France"));
    assert!(body.contains("48.8534, 2.3488"));
    // Forecast payload
    assert!(body.contains("Paris, Île-de-France, France"));
    assert!(body.contains("2024-07-03"));
    assert!(body.contains("27.3 °C"));
    assert_eq!(body.matches("<tr class=\"day\">").count(), 3);

    assert_eq!(app.history().await, vec!["Paris"]);
}

#[tokio::test]
async fn test_lookup_not_found_logs_nothing() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.2
        })))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(format!("^{}/.*", TIMELINE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast("nowhere")))
        .expect(0)
        .mount(&app.server)
        .await;

    let body = body_text(app.get("/get_info?city=Atlantis").await).await;
    assert!(body.contains("The city was not found. Enter a city"));
    assert!(app.history().await.is_empty());
    assert!(!app.state.history.lock().await.exists());
}

#[tokio::test]
async fn test_lookup_null_results_is_not_found() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": null
        })))
        .mount(&app.server)
        .await;

    let body = body_text(app.get("/get_info?city=Nowhere").await).await;
    assert!(body.contains("The city was not found"));
    assert!(app.history().await.is_empty());
}

#[tokio::test]
async fn test_lookup_geocoder_error_is_not_found() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.server)
        .await;

    let response = app.get("/get_info?city=Paris").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("The city was not found"));
    assert!(app.history().await.is_empty());
}

#[tokio::test]
async fn test_lookup_with_forecast_failure_still_logs() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_hit("Paris", "France")))
        .mount(&app.server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(format!("^{}/.*", TIMELINE)))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    let body = body_text(app.get("/get_info?city=Paris").await).await;
    assert!(body.contains("Paris, France"));
    assert!(body.contains("Forecast unavailable"));
    assert_eq!(app.history().await, vec!["Paris"]);
}

#[tokio::test]
async fn test_repeated_lookups_are_not_deduplicated() {
    let app = TestApp::start().await;
    mount_paris(&app.server).await;

    for _ in 0..3 {
        let response = app.get("/get_info?city=Paris").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.history().await, vec!["Paris", "Paris", "Paris"]);

    let body = body_text(app.get("/history").await).await;
    assert_eq!(body.matches("<tr class=\"record\">").count(), 3);
}

#[tokio::test]
async fn test_concurrent_lookups_keep_every_record() {
    let app = TestApp::start().await;
    mount_paris(&app.server).await;

    let mut set = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let router = skycast_service::app(Arc::clone(&app.state));
        set.spawn(async move {
            let request = Request::builder()
                .uri("/get_info?city=Paris")
                .body(Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        });
    }
    while let Some(status) = set.join_next().await {
        assert_eq!(status.unwrap(), StatusCode::OK);
    }

    assert_eq!(app.history().await.len(), 10);
}

#[tokio::test]
async fn test_easter_egg_skips_both_apis() {
    let app = TestApp::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(geocoding_hit("x", "y")))
        .expect(0)
        .mount(&app.server)
        .await;

    let body = body_text(app.get("/get_info?city=georgie").await).await;
    assert!(body.contains("Hello, Georgie!"));
    assert!(app.history().await.is_empty());
}

#[tokio::test]
async fn test_download_after_lookup_matches_file() {
    let app = TestApp::start().await;
    mount_paris(&app.server).await;

    app.get("/get_info?city=Paris").await;

    let response = app.get("/download_history").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;

    let on_disk = std::fs::read_to_string(app.state.config.storage.history_path.clone()).unwrap();
    assert_eq!(body, on_disk);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json[0]["city"], "Paris");
    assert!(json[0]["date"].is_string());
}

#[tokio::test]
async fn test_health_is_served_by_app() {
    let app = TestApp::start().await;
    let response = app.get("/api/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}
