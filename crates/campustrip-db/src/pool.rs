//! PostgreSQL connection pool management

use campustrip_core::config::DatabaseConfig;
use campustrip_core::{AppError, AppResult};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{info, warn};

/// Create a PostgreSQL connection pool and verify it with a round trip
///
/// ```no_run
/// use campustrip_core::AppConfig;
/// use campustrip_db::create_pool;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = AppConfig::load()?;
///     let pool = create_pool(&config.database).await?;
///     Ok(())
/// }
/// ```
pub async fn create_pool(config: &DatabaseConfig) -> AppResult<PgPool> {
    info!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
        .test_before_acquire(true)
        .connect(&config.url)
        .await
        .map_err(|e| {
            warn!("Failed to create database pool: {}", e);
            AppError::Pool(format!("Failed to connect to database: {}", e))
        })?;

    info!(
        "Database pool created successfully with {} max connections",
        config.max_connections
    );

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Database health check failed: {}", e)))?;

    info!("Database connection verified");

    Ok(pool)
}

/// Apply pending schema migrations from `migrations/`
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!("Running database migrations");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            warn!("Migration failed: {}", e);
            AppError::Database(format!("Migration failed: {}", e))
        })?;

    info!("Database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires database
    async fn test_create_pool() {
        let config = DatabaseConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/campustrip".to_string()),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 60,
            run_migrations: false,
        };

        let result = create_pool(&config).await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_money_columns_keep_full_scale() {
        let schema = include_str!("../../../migrations/20260301000000_initial_schema.sql");
        for column in [
            "discount_value",
            "base_students",
            "base_adults",
            "meals",
            "transport",
            "extras",
            "total",
            "per_student",
        ] {
            let definition = schema
                .lines()
                .map(str::trim)
                .find(|line| line.split_whitespace().next() == Some(column))
                .unwrap_or_else(|| panic!("column {column} missing from schema"));
            assert!(
                definition.contains("NUMERIC ") && !definition.contains("NUMERIC("),
                "{column} must be an unconstrained NUMERIC: {definition}"
            );
        }
    }
}
