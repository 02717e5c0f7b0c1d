//! End-to-end tests of the HTTP surface, driven through the router.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;
use tower::ServiceExt;

use common::{app, json, send, send_json, send_raw, text};
use generic_server::config::{Config, Environment};
use generic_server::{create_app, Settings};

#[tokio::test]
async fn health_check() {
    let (status, body) = json(send(app(), Method::GET, "/health").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "generic-server");
}

#[tokio::test]
async fn root_endpoint() {
    let (status, body) = json(send(app(), Method::GET, "/").await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn api_index_with_and_without_slash() {
    for uri in ["/api/", "/api"] {
        let (status, body) = json(send(app(), Method::GET, uri).await).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(body["message"].is_string());
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn get_examples() {
    let (status, body) = json(send(app(), Method::GET, "/api/examples").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_example_by_id() {
    let (status, body) = json(send(app(), Method::GET, "/api/examples/1").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 1);
}

#[tokio::test]
async fn get_unknown_example() {
    let (status, body) = json(send(app(), Method::GET, "/api/examples/999").await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Example 999 not found");
}

#[tokio::test]
async fn non_numeric_id_is_bad_request() {
    let (status, body) = json(send(app(), Method::GET, "/api/examples/abc").await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn create_example() {
    let payload = json!({"name": "Test Example", "description": "This is a test"});
    let (status, body) =
        json(send_json(app(), Method::POST, "/api/examples", &payload).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Test Example");
    assert_eq!(body["data"]["id"], 3);
}

#[tokio::test]
async fn created_example_is_listed() {
    let app = app();
    let payload = json!({"name": "Listed", "description": "shows up"});
    send_json(app.clone(), Method::POST, "/api/examples", &payload).await;

    let (_, body) = json(send(app, Method::GET, "/api/examples").await).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Example 1", "Example 2", "Listed"]);
}

#[tokio::test]
async fn create_example_missing_fields() {
    let payload = json!({"name": "Test Example"});
    let (status, body) =
        json(send_json(app(), Method::POST, "/api/examples", &payload).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    assert_eq!(body["missing_fields"], json!(["description"]));
}

#[tokio::test]
async fn create_example_wrong_type() {
    let payload = json!({"name": 12, "description": "numbers are not names"});
    let (status, body) =
        json(send_json(app(), Method::POST, "/api/examples", &payload).await).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Field 'name' must be a string");
}

#[tokio::test]
async fn create_example_requires_json_content_type() {
    let response = send_raw(
        app(),
        Method::POST,
        "/api/examples",
        "text/plain",
        r#"{"name":"a","description":"b"}"#,
    )
    .await;
    let (status, body) = json(response).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 415);
    assert_eq!(body["error"], "Unsupported Media Type");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let response = send_raw(
        app(),
        Method::POST,
        "/api/examples",
        "application/json",
        "{not json",
    )
    .await;
    let (status, body) = json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode JSON object"));
}

#[tokio::test]
async fn update_example() {
    let payload = json!({"name": "Updated Name", "description": "Updated description"});
    let (status, body) =
        json(send_json(app(), Method::PUT, "/api/examples/1", &payload).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Updated Name");
    assert_eq!(body["data"]["description"], "Updated description");
}

#[tokio::test]
async fn partial_update_keeps_other_fields() {
    let app = app();
    let payload = json!({"description": "only this"});
    let (status, body) =
        json(send_json(app.clone(), Method::PUT, "/api/examples/2", &payload).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Example 2");
    assert_eq!(body["data"]["description"], "only this");

    let (_, body) = json(send(app, Method::GET, "/api/examples/2").await).await;
    assert_eq!(body["data"]["description"], "only this");
}

#[tokio::test]
async fn update_unknown_and_empty() {
    let payload = json!({"name": "x"});
    let (status, _) =
        json(send_json(app(), Method::PUT, "/api/examples/404", &payload).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
        json(send_json(app(), Method::PUT, "/api/examples/1", &json!({})).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No fields to update");
}

#[tokio::test]
async fn delete_example() {
    let app = app();
    let (status, body) = json(send(app.clone(), Method::DELETE, "/api/examples/1").await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = json(send(app.clone(), Method::GET, "/api/examples/1").await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json(send(app, Method::DELETE, "/api/examples/1").await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn echo_endpoint() {
    let payload = json!({
        "message": "Hello, World!",
        "nested": {"z": 1, "a": [true, null, 2.5]}
    });
    let (status, body) = json(send_json(app(), Method::POST, "/api/echo", &payload).await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["echo"], payload);
}

#[tokio::test]
async fn echo_accepts_non_object_json() {
    let payload = json!([1, "two", 3]);
    let (status, body) = json(send_json(app(), Method::POST, "/api/echo", &payload).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["echo"], payload);
}

#[tokio::test]
async fn echo_preserves_large_integers() {
    let response = send_raw(
        app(),
        Method::POST,
        "/api/echo",
        "application/json",
        r#"{"n":123456789012345678901234567890,"f":0.1}"#,
    )
    .await;
    let (status, body) = text(response).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("123456789012345678901234567890"), "{body}");
    assert!(body.contains(r#""f":0.1"#), "{body}");
}

#[tokio::test]
async fn not_found_error() {
    let (status, body) = json(send(app(), Method::GET, "/nonexistent").await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": "Not Found",
            "message": "The requested resource was not found",
            "status": 404
        })
    );
}

#[tokio::test]
async fn method_not_allowed_error() {
    let response = send(app(), Method::DELETE, "/health").await;
    assert!(response.headers().contains_key(header::ALLOW));

    let (status, body) = json(response).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "Method Not Allowed");
    assert_eq!(body["status"], 405);
}

#[tokio::test]
async fn options_outside_api_is_method_not_allowed() {
    let response = send(app(), Method::OPTIONS, "/health").await;
    assert!(response.headers().contains_key(header::ALLOW));

    let (status, body) = json(response).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["status"], 405);
}

#[tokio::test]
async fn oversized_body_rejected() {
    let big = format!("\"{}\"", "x".repeat(17 * 1024 * 1024));
    let (status, body) = json(
        send_raw(app(), Method::POST, "/api/echo", "application/json", big).await,
    )
    .await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["status"], 413);
}

#[tokio::test]
async fn cors_headers_only_on_api_routes() {
    let request = |uri: &str| {
        Request::builder()
            .uri(uri)
            .header(header::ORIGIN, "https://client.example")
            .body(Body::empty())
            .unwrap()
    };

    let api = app().oneshot(request("/api/examples")).await.unwrap();
    assert_eq!(api.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let health = app().oneshot(request("/health")).await.unwrap();
    assert!(!health
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn cors_respects_configured_origins() {
    let mut config = Config::for_environment(Environment::Testing);
    config.cors_origins = "https://allowed.example".to_string();
    let app = create_app(Settings::from_config(config).unwrap()).unwrap();

    let request = |origin: &str| {
        Request::builder()
            .uri("/api/examples")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(request("https://allowed.example"))
        .await
        .unwrap();
    assert_eq!(
        allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://allowed.example"
    );

    let denied = app.oneshot(request("https://evil.example")).await.unwrap();
    assert!(!denied
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn cors_preflight_succeeds() {
    let response = app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/examples")
                .header(header::ORIGIN, "https://client.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}
