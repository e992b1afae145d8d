use persistence::db::{DatabaseConfig, create_sqlite_pool, run_migrations};
use sqlx::SqlitePool;

use super::Lookup;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://cart.db?mode=rwc";

/// On-device cart database location
#[derive(Debug, Clone)]
pub struct LocalStoreConfig {
    pub database_url: String,
}

impl LocalStoreConfig {
    /// Environment variables:
    /// - CART_DATABASE_URL: SQLite url (default: "sqlite://cart.db?mode=rwc")
    pub fn load(lookup: Lookup) -> Self {
        Self {
            database_url: lookup("CART_DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        }
    }

    /// Opens the pool and applies the cart schema
    pub async fn init_database(&self) -> anyhow::Result<SqlitePool> {
        let pool = create_sqlite_pool(&DatabaseConfig::new(self.database_url.clone())).await?;
        run_migrations(&pool).await?;
        tracing::info!("Cart database ready at {}", self.database_url);
        Ok(pool)
    }
}
