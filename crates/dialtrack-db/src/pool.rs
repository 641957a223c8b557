//! Connection pool setup
//!
//! One pool is shared by every handler. Webhook merges hold a connection
//! across a row-lock transaction, so the sizing and timeout knobs come from
//! `DatabaseConfig` instead of being fixed here.

use dialtrack_core::config::DatabaseConfig;
use dialtrack_core::{AppError, AppResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

/// Open a PostgreSQL pool sized and timed per configuration
///
/// Connectivity is verified with a round trip before the pool is handed
/// out, so a bad URL fails at startup rather than on the first request.
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .map_err(|e| {
            warn!("Could not open database pool: {}", e);
            AppError::Pool(format!("Failed to connect to database: {}", e))
        })?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Database round trip failed: {}", e)))?;

    info!(
        "Database pool ready: {} connections max, {}s acquire timeout",
        config.max_connections, config.acquire_timeout_secs
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_create_pool_from_config() {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/dialtrack".to_string());

        let config = DatabaseConfig {
            url,
            max_connections: 5,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 60,
        };

        let pool = create_pool(&config).await.unwrap();
        assert_eq!(pool.options().get_max_connections(), 5);
    }
}
