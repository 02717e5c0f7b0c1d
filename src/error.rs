//! Unified error types for the server.

use thiserror::Error;

/// Unified error type for startup, CLI and serving.
#[derive(Error, Debug)]
pub enum ServerError {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// HOST/PORT do not form a socket address.
    #[error("invalid bind address: {0}")]
    InvalidAddress(String),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variables could not be deserialized.
    #[error("failed to read environment: {0}")]
    Env(#[from] envy::Error),

    /// Production was selected without a secret.
    #[error("SECRET_KEY environment variable must be set in production")]
    MissingSecretKey,

    /// `CORS_ORIGINS` contained no usable entry.
    #[error("CORS_ORIGINS must list at least one origin")]
    NoCorsOrigins,

    /// A configured origin is not a valid header value.
    #[error("invalid CORS origin: {0}")]
    InvalidCorsOrigin(String),
}

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// The URL scheme names no supported backend.
    #[error("unsupported database url scheme: {0}")]
    UnsupportedScheme(String),

    /// Driver error.
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServerError>;
