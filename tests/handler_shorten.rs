mod common;

use axum::{Router, http::StatusCode, routing::post};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use url_shortener::api::handlers::shorten_handler;
use url_shortener::domain::repositories::ShortLinkStore;
use url_shortener::domain::short_code::ShortCode;
use url_shortener::infrastructure::cache::NullCache;
use url_shortener::infrastructure::persistence::InMemoryStore;
use url_shortener::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/shorten", post(shorten_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_shorten_via_query_param() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .add_query_param("url", "https://example.com/some/long/path")
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let code = json["shortCode"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));

    let stored = store
        .lookup(&ShortCode::parse(code).unwrap())
        .await
        .unwrap();
    assert_eq!(stored.as_deref(), Some("https://example.com/some/long/path"));
}

#[tokio::test]
async fn test_shorten_via_json_body() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/json" }))
        .await;

    response.assert_status_ok();
    assert!(response.json::<serde_json::Value>()["shortCode"].is_string());
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let first = server
        .post("/shorten")
        .add_query_param("url", "https://example.com/dup")
        .await
        .json::<serde_json::Value>();
    let second = server
        .post("/shorten")
        .add_query_param("url", "https://example.com/dup")
        .await
        .json::<serde_json::Value>();

    assert_ne!(first["shortCode"], second["shortCode"]);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_shorten_rejects_relative_url() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .add_query_param("url", "not a url")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_missing_url() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server.post("/shorten").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_blank_url() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server.post("/shorten").add_query_param("url", "   ").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_rejects_malformed_body() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    let response = server.post("/shorten").text("{not json").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_store_failure_returns_503() {
    let ctx = common::create_state_with(Arc::new(common::FailingStore), Arc::new(NullCache::new()));
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .add_query_param("url", "https://example.com")
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "store_unavailable");
    assert!(
        !json.to_string().contains("connection refused"),
        "backend details must not leak"
    );
}

#[tokio::test]
async fn test_shorten_exhausted_retries_returns_500() {
    let ctx = common::create_state_with(
        Arc::new(common::CollidingStore),
        Arc::new(NullCache::new()),
    );
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state);

    let response = server
        .post("/shorten")
        .add_query_param("url", "https://example.com")
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "code_space_exhausted");
    assert_eq!(json["error"]["details"]["attempts"], 3);
    assert_eq!(metrics.shorten_conflicts(), 3);
}

#[tokio::test]
async fn test_shorten_rejects_control_characters() {
    let store = Arc::new(InMemoryStore::new());
    let ctx = common::create_test_state(store.clone());
    let server = server(ctx.state);

    for url in [
        "https://example.com/a\u{1}b",
        "https://example.com/a\nb",
        "https://example.com/a\u{7f}b",
    ] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert!(store.is_empty());
}
