use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("database pool not initialized")]
    PoolNotInitialized,

    #[error("record not found")]
    NotFound,

    #[error("edit conflict")]
    EditConflict,

    #[error("duplicate email")]
    DuplicateEmail,

    #[error("statement deadline exceeded")]
    Timeout,

    #[error("token generation failed: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

static POOL: OnceLock<PgPool> = OnceLock::new();

/// Build the process-wide connection pool from `DATABASE_URL` and store it.
/// Called once at startup before the server accepts requests.
pub async fn connect(cfg: &DatabaseConfig) -> Result<(), DatabaseError> {
    let dsn = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect(&dsn)
        .await?;

    // Fail at boot rather than on the first request
    sqlx::query("SELECT 1").execute(&pool).await?;

    let _ = POOL.set(pool);
    info!("database connection pool established");
    Ok(())
}

/// The shared pool. Only ever used for the duration of a single call; no
/// cross-request state is retained on it.
pub fn pool() -> Result<PgPool, DatabaseError> {
    POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

pub async fn health_check() -> Result<(), DatabaseError> {
    let pool = pool()?;
    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(())
}

/// Bound every storage call by the configured statement deadline so a
/// stalled connection fails fast instead of holding a worker.
pub async fn with_deadline<T, F>(fut: F) -> Result<T, DatabaseError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let deadline = Duration::from_millis(crate::config::config().database.statement_deadline_ms);
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result.map_err(DatabaseError::from),
        Err(_) => Err(DatabaseError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_before_connect() {
        // Unit tests never call connect(); every path that would touch the
        // pool must surface this instead of panicking.
        assert!(matches!(pool(), Err(DatabaseError::PoolNotInitialized)));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_converts_slow_calls_to_timeout() {
        // Paused time auto-advances to the nearest timer: the deadline
        // fires long before the simulated stalled statement would return.
        let slow = async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<i32, sqlx::Error>(1)
        };

        let result = with_deadline(slow).await;
        assert!(matches!(result, Err(DatabaseError::Timeout)));
    }

    #[tokio::test]
    async fn deadline_passes_fast_results_through() {
        let fast = async { Ok::<i32, sqlx::Error>(42) };
        assert_eq!(with_deadline(fast).await.unwrap(), 42);
    }
}
