//! Prometheus metrics for request tracking.
//!
//! Recording is a no-op until a recorder is installed, so the router can be
//! exercised in tests without touching global state.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP requests counter metric name.
pub const METRIC_HTTP_REQUESTS: &str = "http_requests_total";
/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Examples created counter metric name.
pub const METRIC_EXAMPLES_CREATED: &str = "examples_created_total";
/// Examples deleted counter metric name.
pub const METRIC_EXAMPLES_DELETED: &str = "examples_deleted_total";
/// Unhandled errors counter metric name.
pub const METRIC_UNHANDLED_ERRORS: &str = "unhandled_errors_total";

/// Install the global Prometheus recorder and describe all metrics.
pub fn install_exporter() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_counter!(METRIC_HTTP_REQUESTS, "Total number of HTTP requests served");
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );
    describe_counter!(METRIC_EXAMPLES_CREATED, "Total number of examples created");
    describe_counter!(METRIC_EXAMPLES_DELETED, "Total number of examples deleted");
    describe_counter!(
        METRIC_UNHANDLED_ERRORS,
        "Total number of requests that ended in an unhandled error"
    );

    debug!("Metrics initialized");
}

/// Record HTTP request latency.
pub fn record_http_latency(start: Instant, method: &str, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .record(latency_ms);
}

/// Increment the HTTP request counter.
pub fn inc_http_requests(method: &str, endpoint: &str, status: u16) {
    counter!(
        METRIC_HTTP_REQUESTS,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Increment examples created counter.
pub fn inc_examples_created() {
    counter!(METRIC_EXAMPLES_CREATED).increment(1);
}

/// Increment examples deleted counter.
pub fn inc_examples_deleted() {
    counter!(METRIC_EXAMPLES_DELETED).increment(1);
}

/// Increment unhandled errors counter.
pub fn inc_unhandled_errors() {
    counter!(METRIC_UNHANDLED_ERRORS).increment(1);
}

/// Middleware recording count and latency per matched route.
///
/// Unmatched requests are grouped under `"unmatched"` to keep label
/// cardinality bounded.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    record_http_latency(start, &method, &endpoint);
    inc_http_requests(&method, &endpoint, response.status().as_u16());
    response
}
