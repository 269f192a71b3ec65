//! PostgreSQL-backed order store

pub mod order_repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error as log_error, info, warn};

use crate::config::DatabaseConfig;
use crate::orders::StoreError;

pub use order_repository::PgOrderStore;

const MIN_CONNECTIONS: u32 = 1;
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

pub(crate) fn store_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Opens the pool and proves it with one acquired connection.
pub async fn init_pool(database_url: &str, config: &DatabaseConfig) -> Result<PgPool, StoreError> {
    let acquire_timeout = Duration::from_secs(config.connection_timeout);
    info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.connection_timeout,
        "Opening order database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(MIN_CONNECTIONS.min(config.max_connections))
        .acquire_timeout(acquire_timeout)
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
        .connect(database_url)
        .await
        .map_err(|e| {
            log_error!(error = %e, "order database unreachable");
            store_error(e)
        })?;

    if let Err(e) = pool.acquire().await {
        log_error!(error = %e, "order database refused a test connection");
        return Err(store_error(e));
    }

    info!("Order database pool ready");
    Ok(pool)
}

/// `SELECT 1` round trip for the health endpoint.
pub async fn health_check(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "order database health check failed");
            store_error(e)
        })
}
