//! Generic JSON HTTP server skeleton.
//!
//! An application factory builds an [`axum::Router`] from per-environment
//! [`Settings`](config::Settings): health and index routes, a placeholder
//! CRUD resource kept in memory, an echo endpoint, CORS on `/api/*`, and
//! uniform JSON error responses.
//!
//! ```text
//! GET    /health              {status: "healthy", service}
//! GET    /                    {message, version, endpoints}
//! GET    /api/                {message, version}
//! GET    /api/examples        {success, data: [Example]}
//! POST   /api/examples        201 {success, data: Example}
//! GET    /api/examples/:id    {success, data: Example}
//! PUT    /api/examples/:id    {success, data: Example}
//! DELETE /api/examples/:id    {success, message}
//! POST   /api/echo            {success, echo: <body>}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Startup and CLI error types
//! - [`api`]: Routes, handlers and the application factory
//! - [`store`]: In-memory example storage
//! - [`db`]: Database handle for table management commands
//! - [`metrics`]: Prometheus request metrics
//! - [`server`]: Binding and serving
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod server;
pub mod store;
pub mod utils;

pub use api::{create_app, create_router, AppState};
pub use config::{Config, Environment, Settings};
pub use error::{Result, ServerError};
