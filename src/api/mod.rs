//! HTTP API: health, index, example CRUD and echo endpoints.

pub mod error;
pub mod examples;
pub mod extract;
pub mod handlers;
pub mod routes;

pub use error::{ApiError, ErrorEnvelope};
pub use handlers::AppState;
pub use routes::{create_app, create_router};
