use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

use crate::config;

/// Idempotent DDL for every table the service touches
pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Errors from DatabaseManager and the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// SQLSTATE of the underlying Postgres error, if any
    pub fn sqlstate(&self) -> Option<String> {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    pub fn is_row_not_found(&self) -> bool {
        matches!(self, DatabaseError::Sqlx(sqlx::Error::RowNotFound))
    }
}

/// Owner of the process-wide connection pool
pub struct DatabaseManager;

impl DatabaseManager {
    fn cell() -> &'static OnceCell<PgPool> {
        static POOL: OnceCell<PgPool> = OnceCell::const_new();
        &POOL
    }

    /// Get the shared pool, connecting on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = Self::cell()
            .get_or_try_init(|| async {
                let url = Self::database_url()?;
                Self::connect(&url).await
            })
            .await?;
        Ok(pool.clone())
    }

    /// Build a pool against an explicit URL using the configured limits
    pub async fn connect(database_url: &str) -> Result<PgPool, DatabaseError> {
        let settings = &config::config().database;
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(database_url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        info!("Created database pool for {}", Self::redact(database_url)?);
        Ok(pool)
    }

    fn database_url() -> Result<String, DatabaseError> {
        let raw = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        // Reject garbage early instead of surfacing a driver parse error
        url::Url::parse(&raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        Ok(raw)
    }

    /// Strip the password from a connection string for logging
    pub fn redact(database_url: &str) -> Result<String, DatabaseError> {
        let mut url = url::Url::parse(database_url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***")).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }

    /// Apply the bootstrap schema. Runs as a simple query so the file may hold many statements.
    pub async fn bootstrap(pool: &PgPool) -> Result<(), DatabaseError> {
        pool.execute(SCHEMA_SQL).await?;
        info!("Database schema bootstrapped");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = Self::cell().get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}
