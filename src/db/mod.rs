//! Database handle used by the `init-db` and `drop-db` commands.

pub mod schema;

use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use strum::Display;
use tracing::{debug, info};

use crate::config::Settings;
use crate::error::DbError;

use schema::TABLES;

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    /// Determine the backend from a connection URL's scheme.
    pub fn from_url(url: &str) -> Result<Self, DbError> {
        let scheme = url.split(':').next().unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(DbError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Connection pool plus the backend it talks to.
#[derive(Debug, Clone)]
pub struct Database {
    pool: AnyPool,
    backend: Backend,
    echo: bool,
}

impl Database {
    /// Connect using the resolved settings.
    pub async fn connect(settings: &Settings) -> Result<Self, DbError> {
        Self::connect_url(&settings.database_url, settings.sql_echo).await
    }

    /// Connect to an explicit URL.
    pub async fn connect_url(url: &str, echo: bool) -> Result<Self, DbError> {
        let backend = Backend::from_url(url)?;
        sqlx::any::install_default_drivers();

        // A single connection keeps `sqlite::memory:` one database.
        let max_connections = match backend {
            Backend::Sqlite => 1,
            Backend::Postgres => 5,
        };

        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        info!(%backend, "connected to database");
        Ok(Self {
            pool,
            backend,
            echo,
        })
    }

    /// Backend in use.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Create every registered table that does not exist yet.
    pub async fn create_all(&self) -> Result<Vec<&'static str>, DbError> {
        let mut created = Vec::with_capacity(TABLES.len());
        for table in TABLES {
            self.execute(table.create_sql(self.backend)).await?;
            created.push(table.name);
        }
        info!(tables = ?created, "tables created");
        Ok(created)
    }

    /// Drop every registered table, in reverse creation order.
    pub async fn drop_all(&self) -> Result<Vec<&'static str>, DbError> {
        let mut dropped = Vec::with_capacity(TABLES.len());
        for table in TABLES.iter().rev() {
            self.execute(&table.drop_sql()).await?;
            dropped.push(table.name);
        }
        info!(tables = ?dropped, "tables dropped");
        Ok(dropped)
    }

    /// Whether a table with this name exists.
    pub async fn table_exists(&self, name: &str) -> Result<bool, DbError> {
        let sql = self.table_exists_sql(name);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    /// Close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn table_exists_sql(&self, name: &str) -> String {
        let name = name.replace('\'', "''");
        match self.backend {
            Backend::Sqlite => format!(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '{name}'"
            ),
            Backend::Postgres => format!(
                "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = '{name}'"
            ),
        }
    }

    async fn execute(&self, sql: &str) -> Result<(), DbError> {
        if self.echo {
            debug!(target: "generic_server::sql", "{}", sql);
        }
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}
