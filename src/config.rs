//! Application configuration loaded from environment variables.
//!
//! Loading happens in two steps. [`Config`] is the raw view of the process
//! environment (and `.env`), [`Settings`] is what the application actually
//! runs with once the per-environment defaults have been applied.

use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::ConfigError;

/// Secret used when none is configured outside production.
pub const DEV_SECRET_KEY: &str = "dev-secret-key-change-in-production";

/// Maximum accepted request body size (16 MiB).
pub const MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Named configuration the application is built with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Environment {
    /// Local development: debug on, SQL echo on.
    #[default]
    #[serde(alias = "default")]
    #[strum(to_string = "development", serialize = "default")]
    Development,
    /// Production deployment.
    #[strum(serialize = "production")]
    Production,
    /// Test runs: in-memory database, no log subscriber.
    #[strum(serialize = "testing")]
    Testing,
}

/// Raw configuration read from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Configuration name (`FLASK_ENV`).
    #[serde(default)]
    pub flask_env: Environment,

    /// Secret key. Mandatory in production.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Comma-separated allowed origins for `/api/*`.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    /// Database connection URL.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Display timezone.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Configuration with every variable unset.
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            flask_env: environment,
            secret_key: None,
            cors_origins: default_cors_origins(),
            database_url: None,
            timezone: default_timezone(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Resolved settings the application runs with.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Which named configuration these settings came from.
    pub environment: Environment,
    /// Verbose logging and developer-friendly output.
    pub debug: bool,
    /// Running under the test suite.
    pub testing: bool,
    /// Application secret.
    pub secret_key: String,
    /// Allowed CORS origins for `/api/*`. `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Database connection URL.
    pub database_url: String,
    /// Log every SQL statement.
    pub sql_echo: bool,
    /// Request body limit in bytes.
    pub max_content_length: usize,
    /// Display timezone.
    pub timezone: String,
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Settings {
    /// Apply the per-environment defaults to a raw [`Config`].
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let environment = config.flask_env;

        let secret_key = match (environment, config.secret_key) {
            (_, Some(key)) if !key.is_empty() => key,
            (Environment::Production, _) => return Err(ConfigError::MissingSecretKey),
            _ => DEV_SECRET_KEY.to_string(),
        };

        let database_url = match environment {
            Environment::Development => config
                .database_url
                .unwrap_or_else(|| "sqlite://dev.db?mode=rwc".to_string()),
            Environment::Production => config
                .database_url
                .unwrap_or_else(|| "postgres://localhost/prod_db".to_string()),
            Environment::Testing => "sqlite::memory:".to_string(),
        };

        let cors_origins = parse_origins(&config.cors_origins);
        if cors_origins.is_empty() {
            return Err(ConfigError::NoCorsOrigins);
        }

        Ok(Self {
            environment,
            debug: environment == Environment::Development,
            testing: environment == Environment::Testing,
            secret_key,
            cors_origins,
            database_url,
            sql_echo: environment == Environment::Development,
            max_content_length: MAX_CONTENT_LENGTH,
            timezone: config.timezone,
            host: config.host,
            port: config.port,
        })
    }

    /// Load from the environment and resolve, optionally forcing the
    /// configuration name.
    pub fn load(environment: Option<Environment>) -> Result<Self, ConfigError> {
        let mut config = Config::load()?;
        if let Some(environment) = environment {
            config.flask_env = environment;
        }
        Self::from_config(config)
    }

    /// Settings for the test suite, independent of the process environment.
    pub fn testing() -> Self {
        Self::from_config(Config::for_environment(Environment::Testing))
            .unwrap_or_else(|_| unreachable!("testing settings need no secret"))
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }

    /// Secret key with all but the first four characters masked.
    pub fn masked_secret(&self) -> String {
        let visible: String = self.secret_key.chars().take(4).collect();
        format!("{visible}****")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
