use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use life_in_weeks::{AppConfig, AppState, InMemorySnapshotStore, LifeExpectancyTable, build_router};
use serde_json::{Value, json};
use tower::ServiceExt;

const PAYLOAD: &str = "data:image/png;base64,AAA";

fn app_with(config: &AppConfig) -> axum::Router {
    let store = Arc::new(InMemorySnapshotStore::with_ttl(config.snapshot_ttl));
    let countries = Arc::new(LifeExpectancyTable::builtin());
    build_router(AppState::new(store, countries), config)
}

fn app() -> axum::Router {
    app_with(&AppConfig::default())
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("response expected");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body should be readable");
    (status, content_type, body.to_vec())
}

async fn send_json(app: &axum::Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build");

    let (status, _, body) = send(app, request).await;
    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    send(app, request).await
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(app, uri).await;
    let json = serde_json::from_slice::<Value>(&body).expect("body should be valid JSON");
    (status, json)
}

#[tokio::test]
async fn save_and_view_image() {
    let app = app();

    let (status, body) = send_json(&app, "/api/images", json!({ "imageData": PAYLOAD })).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().expect("response should have id");
    assert!(!id.is_empty());

    let (status, content_type, body) = get(&app, &format!("/api/images/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));

    let html = String::from_utf8(body).expect("page should be utf-8");
    assert!(html.contains(&format!(r#"<meta property="og:image" content="{PAYLOAD}" />"#)));
    assert!(html.contains(&format!(r#"<img src="{PAYLOAD}""#)));
}

#[tokio::test]
async fn repeated_saves_get_distinct_ids() {
    let app = app();
    let mut ids = Vec::new();
    for _ in 0..20 {
        let (_, body) = send_json(&app, "/api/images", json!({ "imageData": PAYLOAD })).await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 20);

    let (status, health) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({ "status": "ok", "snapshots": 20 }));
}

#[tokio::test]
async fn missing_image_data_is_rejected() {
    let app = app();

    for payload in [json!({}), json!({ "imageData": "" }), json!({ "imageData": null })] {
        let (status, body) = send_json(&app, "/api/images", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No image data provided" }));
    }
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/images")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "No image data provided" }));

    let (status, body) = send_json(&app, "/api/images", json!({ "imageData": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No image data provided" }));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/images")
        .header("content-type", "text/plain")
        .body(Body::from(PAYLOAD))
        .unwrap();
    let (status, _, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body, json!({ "error": "No image data provided" }));
}

#[tokio::test]
async fn whitespace_image_data_is_stored() {
    let app = app();

    let (status, body) = send_json(&app, "/api/images", json!({ "imageData": " " })).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["id"].as_str().expect("id should be a string");

    let (status, _, _) = get(&app, &format!("/api/images/{id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = AppConfig {
        max_body_bytes: 1024,
        ..AppConfig::default()
    };
    let app = app_with(&config);

    let big = "A".repeat(4096);
    let (status, body) = send_json(&app, "/api/images", json!({ "imageData": big })).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_image_is_not_found() {
    let app = app();
    let (status, body) = get_json(&app, "/api/images/nonexistent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Image not found" }));
}

#[tokio::test(start_paused = true)]
async fn shared_link_dies_after_ttl() {
    let config = AppConfig {
        snapshot_ttl: Duration::from_secs(3600),
        ..AppConfig::default()
    };
    let app = app_with(&config);

    let (_, body) = send_json(&app, "/api/images", json!({ "imageData": PAYLOAD })).await;
    let uri = format!("/api/images/{}", body["id"].as_str().unwrap());

    tokio::time::sleep(Duration::from_secs(3599)).await;
    let (status, _, _) = get(&app, &uri).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let (status, body) = get_json(&app, &uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Image not found");
}

#[tokio::test]
async fn weeks_endpoint_with_explicit_expectancy() {
    let app = app();
    let (status, body) = get_json(&app, "/api/weeks?age=30&lifeExpectancy=70").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weeksLived"], 1560);
    assert_eq!(body["totalWeeks"], 3640);
    assert_eq!(body["remainingWeeks"], 2080);
    assert_eq!(body["sleepWeeks"], 686);
    assert_eq!(body["awakeWeeks"], 1394);
    assert!(body.get("country").is_none());
    assert!(
        body["summary"]
            .as_str()
            .unwrap()
            .starts_with("You've lived 42.9%")
    );
}

#[tokio::test]
async fn weeks_endpoint_uses_country_table() {
    let app = app();

    let (status, body) = get_json(&app, "/api/weeks?age=0&country=japan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "Japan");
    assert_eq!(body["lifeExpectancy"], 84.7);
    assert_eq!(body["totalWeeks"], 4404);

    let (status, body) = get_json(&app, "/api/weeks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "India");
    assert_eq!(body["age"], 30.0);
}

#[tokio::test]
async fn weeks_endpoint_rejects_bad_input() {
    let app = app();

    let (status, body) = get_json(&app, "/api/weeks?age=-1&lifeExpectancy=80").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "age must not be negative (got -1)");

    let (status, _) = get_json(&app, "/api/weeks?age=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&app, "/api/weeks?country=Atlantis").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown country: Atlantis");
}

#[tokio::test]
async fn countries_endpoint_searches() {
    let app = app();

    let (status, body) = get_json(&app, "/api/countries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 26);

    let (status, body) = get_json(&app, "/api/countries?search=KING").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{ "country": "United Kingdom", "life_expectancy": 80.9, "year": 2021 }])
    );
}

#[tokio::test]
async fn unmatched_paths_serve_app_shell() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();

    let config = AppConfig {
        static_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let app = app_with(&config);

    let (status, _, body) = get(&app, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"console.log('hi')");

    let (status, content_type, body) = get(&app, "/some/client/route").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
    assert_eq!(body, b"<div id=\"root\"></div>");
}

#[tokio::test]
async fn image_collection_get_serves_app_shell() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<div id=\"root\"></div>").unwrap();

    let config = AppConfig {
        static_dir: dir.path().to_path_buf(),
        ..AppConfig::default()
    };
    let app = app_with(&config);

    let (status, content_type, body) = get(&app, "/api/images").await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap_or_default().starts_with("text/html"));
    assert_eq!(body, b"<div id=\"root\"></div>");

    let (status, body) = send_json(&app, "/api/images", json!({ "imageData": PAYLOAD })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].is_string());
}
