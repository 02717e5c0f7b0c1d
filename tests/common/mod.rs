//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use generic_server::{create_app, Settings};

/// Fresh application built with the testing configuration.
pub fn app() -> Router {
    create_app(Settings::testing()).expect("testing settings build an app")
}

/// Send a request without a body.
pub async fn send(app: Router, method: Method, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a JSON body.
pub async fn send_json(app: Router, method: Method, uri: &str, body: &Value) -> Response {
    send_raw(app, method, uri, "application/json", body.to_string()).await
}

/// Send an arbitrary body with the given content type.
pub async fn send_raw(
    app: Router,
    method: Method,
    uri: &str,
    content_type: &str,
    body: impl Into<Body>,
) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Status plus parsed JSON body.
pub async fn json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).expect("response body is JSON");
    (status, value)
}

/// Status plus the raw body text.
pub async fn text(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).expect("response body is UTF-8");
    (status, body)
}
