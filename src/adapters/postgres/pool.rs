//! Connection pool and schema migrations.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Opens a pool from the database configuration, applying migrations when
/// `run_migrations` is set.
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let url = config
        .connection_url()
        .map_err(|e| DomainError::new(ErrorCode::ValidationFailed, e.to_string()))?;
    let settings = &config.pool;

    let pool = PgPoolOptions::new()
        .min_connections(settings.min_connections)
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout())
        .idle_timeout(settings.idle_timeout())
        .max_lifetime(settings.max_lifetime())
        .connect(url)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::StorageUnavailable,
                format!("Failed to connect to database: {}", e),
            )
        })?;
    tracing::info!(max_connections = settings.max_connections, "database pool opened");

    if config.run_migrations {
        run_migrations(&pool).await?;
    }
    Ok(pool)
}

/// Applies the bundled `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Failed to run migrations", e))?;
    tracing::info!("database migrations applied");
    Ok(())
}
