#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use paycode_core::NotificationRegistry;
use paycode_db::DbPool;
use paycode_events::EventBus;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use paycode_api::config::ServerConfig;
use paycode_api::router::build_app_router;
use paycode_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        event_bus_capacity: 64,
        webhook_urls: Vec::new(),
    }
}

/// Build the full application router over a fresh in-memory registry.
///
/// Returns the state alongside the router so tests can reach the registry
/// and the event bus directly.
pub fn build_test_app() -> (Router, AppState) {
    let config = test_config();
    let event_bus = Arc::new(EventBus::new(config.event_bus_capacity));
    let registry = Arc::new(NotificationRegistry::in_memory().with_sink(event_bus.clone()));

    let state = AppState {
        registry,
        config: Arc::new(config.clone()),
        event_bus,
        pool: None,
        shutdown: CancellationToken::new(),
    };

    (build_app_router(state.clone(), &config), state)
}

/// Build the application router with a database pool attached, so the
/// ledger endpoint is available. The registry itself stays in memory.
pub fn build_test_app_with_pool(pool: DbPool) -> (Router, AppState) {
    let (_, mut state) = build_test_app();
    state.pool = Some(pool);
    (build_app_router(state.clone(), &test_config()), state)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// POST /api/v1/codes for each code, asserting 204.
pub async fn register_all(app: &Router, codes: &[&str]) {
    for code in codes {
        let response = post_json(
            app.clone(),
            "/api/v1/codes",
            serde_json::json!({ "payment_code": code }),
        )
        .await;
        assert_eq!(response.status(), axum::http::StatusCode::NO_CONTENT);
    }
}

pub async fn notify(app: &Router, sender: &str, recipient: &str) -> Response<Body> {
    post_json(
        app.clone(),
        "/api/v1/notifications",
        serde_json::json!({ "sender": sender, "recipient": recipient }),
    )
    .await
}
