use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::{str::FromStr, time::Duration};
use thiserror::Error;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.invalid_url")]
    InvalidUrl,
    #[error("database.connection_error")]
    ConnectionError,
    #[error("database.migration_error")]
    MigrationError,
}

/// Configuration for the on-device cart database
pub struct DatabaseConfig {
    pub connection_string: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default values
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    /// Private in-memory database. A single connection, so every query sees
    /// the same data.
    pub fn in_memory() -> Self {
        Self {
            connection_string: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Creates a SQLite connection pool, creating the file if it is missing
pub async fn create_sqlite_pool(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.connection_string)
        .map_err(|_| DatabaseError::InvalidUrl)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        // An in-memory database lives only as long as its connection.
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(|e| {
            tracing::error!(target: "Cart -- ", "cart database connection failed: {}", e);
            DatabaseError::ConnectionError
        })?;

    Ok(pool)
}

/// Applies the embedded cart schema migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DatabaseError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        tracing::error!(target: "Cart -- ", "cart database migration failed: {}", e);
        DatabaseError::MigrationError
    })
}
