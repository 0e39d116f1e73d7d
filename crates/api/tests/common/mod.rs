#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use checkout_api::config::{ServerConfig, SheetsConfig};
use checkout_api::router::build_app_router;
use checkout_api::state::AppState;
use checkout_sheets::testing::FakeSheets;
use checkout_sheets::{CredentialError, RetryPolicy, ServiceAccountKey};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const SPREADSHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";

/// Build a test `ServerConfig` pointing at `fake`, with a working
/// credential.
pub fn test_config(fake: &FakeSheets) -> ServerConfig {
    let credentials = ServiceAccountKey::from_json(&fake.service_account_json());
    config_with_credentials(fake.api_url(), credentials)
}

/// Build a test `ServerConfig` whose credential is missing.
pub fn config_without_credentials(api_url: &str) -> ServerConfig {
    config_with_credentials(api_url, Err(CredentialError::Missing))
}

fn config_with_credentials(
    api_url: &str,
    credentials: Result<ServiceAccountKey, CredentialError>,
) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        sheets: SheetsConfig {
            credentials,
            api_url: api_url.to_string(),
            token_url: None,
            retry: RetryPolicy::none(),
        },
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(config: ServerConfig) -> Router {
    let state = AppState::new(config.clone());
    build_app_router(state, &config)
}

/// App with no credential and an unreachable upstream; enough for every
/// request that must fail before the upstream is contacted.
pub fn offline_app() -> Router {
    build_test_app(config_without_credentials("http://127.0.0.1:9/v4/spreadsheets"))
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(body)
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, Body::empty()).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Assert the three fixed CORS headers are present.
pub fn assert_cors_headers(response: &Response) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}
