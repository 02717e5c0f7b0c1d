//! CRUD handlers for the example resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::error::ApiError;
use super::extract::JsonBody;
use super::handlers::AppState;
use crate::metrics;
use crate::store::{Example, ExampleUpdate, NewExample};
use crate::utils::{sanitize_string, validate_required_fields};

/// Longest accepted name, in characters. Longer input is truncated.
pub const NAME_MAX_LEN: usize = 100;
/// Longest accepted description, in characters. Longer input is truncated.
pub const DESCRIPTION_MAX_LEN: usize = 1000;

const REQUIRED_FIELDS: &[&str] = &["name", "description"];

/// Successful response carrying data.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> DataResponse<T> {
    fn new(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// Successful response with only a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /api/examples`
pub async fn list_examples(State(state): State<AppState>) -> Json<DataResponse<Vec<Example>>> {
    Json(DataResponse::new(state.store.list()))
}

/// `GET /api/examples/:id`
pub async fn get_example(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DataResponse<Example>>, ApiError> {
    let example = state.store.get(id).ok_or(ApiError::ExampleNotFound(id))?;
    Ok(Json(DataResponse::new(example)))
}

/// `POST /api/examples`
pub async fn create_example(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, ApiError> {
    validate_required_fields(&body, REQUIRED_FIELDS).map_err(ApiError::MissingFields)?;
    let object = as_object(&body)?;

    let new = NewExample {
        name: string_field(object, "name", NAME_MAX_LEN)?.unwrap_or_default(),
        description: string_field(object, "description", DESCRIPTION_MAX_LEN)?
            .unwrap_or_default(),
    };

    let example = state.store.create(new);
    metrics::inc_examples_created();
    info!(id = example.id, "created example");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_message(
            example,
            "Example created successfully",
        )),
    ))
}

/// `PUT /api/examples/:id`
pub async fn update_example(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    JsonBody(body): JsonBody,
) -> Result<Json<DataResponse<Example>>, ApiError> {
    let object = as_object(&body)?;

    let update = ExampleUpdate {
        name: string_field(object, "name", NAME_MAX_LEN)?,
        description: string_field(object, "description", DESCRIPTION_MAX_LEN)?,
    };
    if update.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }

    let example = state
        .store
        .update(id, update)
        .ok_or(ApiError::ExampleNotFound(id))?;
    info!(id, "updated example");

    Ok(Json(DataResponse::with_message(
        example,
        "Example updated successfully",
    )))
}

/// `DELETE /api/examples/:id`
pub async fn delete_example(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    state
        .store
        .delete(id)
        .ok_or(ApiError::ExampleNotFound(id))?;
    metrics::inc_examples_deleted();
    info!(id, "deleted example");

    Ok(Json(MessageResponse {
        success: true,
        message: format!("Example {id} deleted successfully"),
    }))
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ApiError> {
    body.as_object()
        .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))
}

/// Read an optional string field, sanitized. Present non-strings are rejected.
fn string_field(
    object: &Map<String, Value>,
    field: &'static str,
    max_len: usize,
) -> Result<Option<String>, ApiError> {
    match object.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(sanitize_string(s, Some(max_len)))),
        Some(_) => Err(ApiError::InvalidField(field)),
    }
}
