//! HTTP API route definitions and the application factory.

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::error::{handle_panic, json_error_responses, not_found};
use super::examples::{create_example, delete_example, get_example, list_examples, update_example};
use super::handlers::{api_index, echo, health, index, metrics, AppState};
use crate::config::Settings;
use crate::error::ConfigError;

/// Build the application for the given settings with a fresh store.
pub fn create_app(settings: Settings) -> Result<Router, ConfigError> {
    create_router(AppState::new(settings))
}

/// Create the full router from prepared state.
pub fn create_router(state: AppState) -> Result<Router, ConfigError> {
    let settings = state.settings.clone();

    let routes = Router::new()
        .merge(health_router())
        .merge(api_router(&settings)?);
    let router = with_common_layers(routes, &settings).with_state(state);

    info!(
        "app created with {} configuration",
        settings.environment
    );
    Ok(router)
}

/// Fallback plus the middleware every route shares.
///
/// Layer order matters: the panic handler sits outside the error rewriter so
/// its 500 envelope passes through untouched.
fn with_common_layers(router: Router<AppState>, settings: &Settings) -> Router<AppState> {
    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(settings.max_content_length))
        .layer(middleware::from_fn(crate::metrics::track_requests))
        .layer(middleware::map_response(json_error_responses))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Health and index routes.
pub fn health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}

/// Routes under `/api`, with CORS applied.
pub fn api_router(settings: &Settings) -> Result<Router<AppState>, ConfigError> {
    let router = Router::new()
        .route("/api", get(api_index))
        .route("/api/", get(api_index))
        .route("/api/examples", get(list_examples).post(create_example))
        .route(
            "/api/examples/:id",
            get(get_example).put(update_example).delete(delete_example),
        )
        .route("/api/echo", post(echo))
        .layer(cors_layer(settings)?);
    Ok(router)
}

/// CORS policy for the configured origins.
pub fn cors_layer(settings: &Settings) -> Result<CorsLayer, ConfigError> {
    let origin = if settings.allows_any_origin() {
        AllowOrigin::any()
    } else {
        let origins = settings
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidCorsOrigin(origin.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
