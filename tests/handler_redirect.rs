mod common;

use axum::{
    Router,
    http::{HeaderValue, StatusCode, header},
    routing::get,
};
use axum_test::TestServer;
use std::sync::Arc;
use url_shortener::api::handlers::redirect_handler;
use url_shortener::infrastructure::cache::{CacheService, NullCache};
use url_shortener::infrastructure::persistence::InMemoryStore;
use url_shortener::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_existing_code() {
    let store = Arc::new(InMemoryStore::new());
    common::create_test_link(&store, "aZ3kQ9x", "https://example.com/target").await;
    let ctx = common::create_test_state(store);
    let server = server(ctx.state);

    let response = server.get("/aZ3kQ9x").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.header(header::LOCATION).to_str().unwrap(),
        "https://example.com/target"
    );
}

#[tokio::test]
async fn test_redirect_unknown_code_returns_404() {
    let store = Arc::new(InMemoryStore::new());
    let mut ctx = common::create_test_state(store);
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state.clone());

    let response = server.get("/nope123").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
    assert_eq!(metrics.failed_redirects(), 1);
    assert!(ctx.visits.try_recv().is_err(), "no visit for unknown code");
}

#[tokio::test]
async fn test_redirect_malformed_code_returns_404() {
    let store = Arc::new(InMemoryStore::new());
    let mut ctx = common::create_test_state(store);
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state.clone());

    for path in ["/short", "/waytoolongcode", "/abc-123"] {
        server.get(path).await.assert_status(StatusCode::NOT_FOUND);
    }

    assert_eq!(metrics.failed_redirects(), 3);
    assert!(ctx.visits.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_queues_visit_with_client_headers() {
    let store = Arc::new(InMemoryStore::new());
    common::create_test_link(&store, "visit01", "https://example.com/v").await;
    let mut ctx = common::create_test_state(store);
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state.clone());

    let response = server
        .get("/visit01")
        .add_header(header::USER_AGENT, HeaderValue::from_static("Mozilla/5.0"))
        .add_header(
            header::REFERER,
            HeaderValue::from_static("https://google.com"),
        )
        .await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);

    let event = ctx.visits.try_recv().expect("visit should be queued");
    assert_eq!(event.short_code, "visit01");
    assert_eq!(event.user_agent.as_deref(), Some("Mozilla/5.0"));
    assert_eq!(event.referer.as_deref(), Some("https://google.com"));

    assert_eq!(metrics.redirects_for("visit01"), 1);
}

#[tokio::test]
async fn test_redirect_without_headers_still_queues_visit() {
    let store = Arc::new(InMemoryStore::new());
    common::create_test_link(&store, "plain01", "https://example.com/p").await;
    let mut ctx = common::create_test_state(store);
    let server = server(ctx.state.clone());

    server
        .get("/plain01")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    let event = ctx.visits.try_recv().expect("visit should be queued");
    assert!(event.user_agent.is_none());
    assert!(event.referer.is_none());
}

#[tokio::test]
async fn test_redirect_served_from_cache_after_first_hit() {
    let store = Arc::new(InMemoryStore::new());
    common::create_test_link(&store, "cache01", "https://example.com/c").await;
    let mut ctx = common::create_cached_test_state(store);
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state.clone());

    server
        .get("/cache01")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    let cached = ctx.state.cache.get_url("cache01").await.unwrap();
    assert_eq!(cached.as_deref(), Some("https://example.com/c"));

    server
        .get("/cache01")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);

    // Cache hits still count and still log a visit.
    assert_eq!(metrics.redirects_for("cache01"), 2);
    assert!(ctx.visits.try_recv().is_ok());
    assert!(ctx.visits.try_recv().is_ok());
}

#[tokio::test]
async fn test_redirect_store_failure_returns_503() {
    let ctx = common::create_state_with(Arc::new(common::FailingStore), Arc::new(NullCache::new()));
    let metrics = ctx.metrics.clone();
    let server = server(ctx.state);

    let response = server.get("/abc1234").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(metrics.resolve_errors(), 1);
    assert_eq!(metrics.failed_redirects(), 0);
}
