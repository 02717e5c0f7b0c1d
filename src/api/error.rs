//! JSON error responses.
//!
//! Two shapes reach clients. Framework-level failures (unknown route, wrong
//! method, oversized or malformed bodies, panics) use the envelope
//! `{error, message, status}`. Resource-level failures from the example
//! routes use `{success: false, error}`.

use std::any::Any;

use axum::extract::rejection::BytesRejection;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::metrics;

/// Generic error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    /// Reason phrase, e.g. `"Not Found"`.
    pub error: String,
    /// Human-readable description.
    pub message: String,
    /// HTTP status code.
    pub status: u16,
}

impl ErrorEnvelope {
    /// Envelope with an explicit message.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: message.into(),
            status: status.as_u16(),
        }
    }

    /// Envelope with the standard description for `status`.
    pub fn for_status(status: StatusCode) -> Self {
        Self::new(status, describe(status))
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Standard client-facing description of a status code.
pub fn describe(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => {
            "The browser (or proxy) sent a request that this server could not understand."
        }
        StatusCode::NOT_FOUND => "The requested resource was not found",
        StatusCode::METHOD_NOT_ALLOWED => "The method is not allowed for the requested URL",
        StatusCode::PAYLOAD_TOO_LARGE => "The data value transmitted exceeds the capacity limit.",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            "The server does not support the media type transmitted in the request."
        }
        StatusCode::UNPROCESSABLE_ENTITY => {
            "The request was well-formed but was unable to be followed due to semantic errors."
        }
        s if s.is_server_error() => "An unexpected error occurred",
        _ => "The request could not be completed",
    }
}

/// Errors returned by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Required fields absent from the request body.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// A field is present but has the wrong JSON type.
    #[error("Field '{0}' must be a string")]
    InvalidField(&'static str),

    /// Update body carried no recognised field.
    #[error("No fields to update")]
    EmptyUpdate,

    /// No example with this id.
    #[error("Example {0} not found")]
    ExampleNotFound(u64),

    /// Framework-level failure rendered as the generic envelope.
    #[error("{message}")]
    Http {
        /// Status to respond with.
        status: StatusCode,
        /// Client-facing message.
        message: String,
    },
}

impl ApiError {
    /// 400 with a specific message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Http {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Status code this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingFields(_) | Self::InvalidField(_) | Self::EmptyUpdate => {
                StatusCode::BAD_REQUEST
            }
            Self::ExampleNotFound(_) => StatusCode::NOT_FOUND,
            Self::Http { status, .. } => *status,
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        Self::Http {
            status: rejection.status(),
            message: describe(rejection.status()).to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            Self::MissingFields(ref missing) => (
                status,
                Json(json!({
                    "success": false,
                    "error": self.to_string(),
                    "missing_fields": missing,
                })),
            )
                .into_response(),
            Self::InvalidField(_) | Self::EmptyUpdate | Self::ExampleNotFound(_) => (
                status,
                Json(json!({
                    "success": false,
                    "error": self.to_string(),
                })),
            )
                .into_response(),
            Self::Http { status, message } => ErrorEnvelope::new(status, message).into_response(),
        }
    }
}

/// Fallback for unmatched routes.
pub async fn not_found() -> ErrorEnvelope {
    ErrorEnvelope::for_status(StatusCode::NOT_FOUND)
}

/// Rewrite any non-JSON error response into the envelope.
///
/// Catches what the framework produces on its own: 405 from method routing,
/// 413 from the body limit, 400 from path extraction. Headers such as
/// `Allow` are preserved.
pub async fn json_error_responses(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(response.headers()) {
        return response;
    }

    let (parts, _body) = response.into_parts();
    let mut rewritten = ErrorEnvelope::for_status(status).into_response();
    for (name, value) in parts.headers.iter() {
        if *name != CONTENT_TYPE && *name != CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}

/// Convert a handler panic into a 500 envelope.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Unhandled exception");
    metrics::inc_unhandled_errors();
    ErrorEnvelope::for_status(StatusCode::INTERNAL_SERVER_ERROR).into_response()
}

/// Whether the headers declare a JSON body.
pub(crate) fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let mime = value.split(';').next().unwrap_or_default().trim();
            mime.eq_ignore_ascii_case("application/json") || mime.ends_with("+json")
        })
        .unwrap_or(false)
}
