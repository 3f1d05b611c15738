//! # Database Connection Management
//!
//! One connection-pooled SQLx client per process, constructed at startup
//! from configuration and handed to the web layer by injection. Shutdown
//! closes the pool explicitly.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::Result;

/// Build the process-wide connection pool.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        acquire_timeout = config.acquire_timeout_seconds,
        idle_timeout = config.idle_timeout_seconds,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "database pool ready");
    Ok(pool)
}

/// Close the pool, waiting for in-flight connections to be released.
pub async fn shutdown(pool: PgPool) {
    info!("closing database pool");
    pool.close().await;
}
