//! Request extractors.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use serde_json::Value;

use super::error::{is_json, ApiError};

/// Raw JSON request body.
///
/// Unlike [`axum::Json`] this keeps the body as an untyped [`Value`] so
/// handlers can report every missing field at once, and its rejections use
/// the API's error envelope.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json(req.headers()) {
            return Err(ApiError::Http {
                status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
                message: "Did not attempt to load JSON data because the request \
                          Content-Type was not 'application/json'."
                    .to_string(),
            });
        }

        let bytes = Bytes::from_request(req, state).await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::bad_request(format!("Failed to decode JSON object: {e}"))
        })?;
        Ok(Self(value))
    }
}
