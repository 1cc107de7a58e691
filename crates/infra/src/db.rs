//! Postgres pool lifecycle.
//!
//! The pool is built once at process start, handed to every repository
//! constructor, and closed at shutdown.

use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{info, instrument};

use stockroom_core::StoreError;

use crate::config::DbConfig;
use crate::postgres::map_sqlx_error;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Owned handle to the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Applies pending migrations from `migrations/`.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        info!("running database migrations");
        MIGRATOR
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Query(format!("migration failed: {e}")))?;
        info!("database migrations completed");
        Ok(())
    }

    #[instrument(skip(self), err)]
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("health_check", e))?;
        Ok(())
    }

    /// Waits for checked-out connections to be returned, then closes the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// Opens the pool described by `config`.
#[instrument(
    skip(config),
    fields(
        max_connections = config.max_connections,
        min_connections = config.min_connections
    ),
    err
)]
pub async fn connect(config: &DbConfig) -> Result<Database, StoreError> {
    info!("connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .max_lifetime(config.max_lifetime)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))?;

    info!("PostgreSQL connection pool established");
    Ok(Database::from_pool(pool))
}
