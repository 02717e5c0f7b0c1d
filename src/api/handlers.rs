//! HTTP API handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;

use super::error::ErrorEnvelope;
use super::extract::JsonBody;
use crate::config::Settings;
use crate::store::ExampleStore;

/// Name reported by the health check.
pub const SERVICE_NAME: &str = "generic-server";

/// Version reported by the index routes.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resolved settings.
    pub settings: Arc<Settings>,
    /// Example resource storage.
    pub store: ExampleStore,
    /// Prometheus handle, present when the exporter is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state with a freshly seeded store.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            store: ExampleStore::seeded(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` route.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"`.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
}

/// Root index response.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

/// Entry points listed by the root index.
#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub api: &'static str,
    pub examples: &'static str,
}

/// API index response.
#[derive(Debug, Serialize)]
pub struct ApiIndexResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// Echo response.
#[derive(Debug, Serialize)]
pub struct EchoResponse {
    pub success: bool,
    pub echo: Value,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
    })
}

/// Root index.
pub async fn index() -> impl IntoResponse {
    Json(IndexResponse {
        message: "Welcome to the generic server",
        version: VERSION,
        endpoints: Endpoints {
            health: "/health",
            api: "/api",
            examples: "/api/examples",
        },
    })
}

/// API index.
pub async fn api_index() -> impl IntoResponse {
    Json(ApiIndexResponse {
        message: "API is running",
        version: VERSION,
    })
}

/// Return the request body unchanged.
pub async fn echo(JsonBody(body): JsonBody) -> impl IntoResponse {
    Json(EchoResponse {
        success: true,
        echo: body,
    })
}

/// Prometheus text exposition, or 404 when metrics are disabled.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => ErrorEnvelope::for_status(StatusCode::NOT_FOUND).into_response(),
    }
}
