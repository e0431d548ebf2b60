//! Shared utilities for integration tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use triplog::config::AppConfig;
use triplog::http::HttpServer;
use triplog::lifecycle::build_application;

pub const ADMIN_KEY: &str = "test-admin-key";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.admin.api_key = ADMIN_KEY.to_string();
    config
}

/// Fully layered application, as the server would serve it.
pub fn app(config: AppConfig) -> Router {
    let application = build_application(&config).unwrap();
    HttpServer::new(config, application.router).router()
}

/// Drive one request through `router` and decode the JSON body, if any.
pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
