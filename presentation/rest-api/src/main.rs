use dotenvy::dotenv;

mod api;
mod config;
mod setup;
#[cfg(test)]
mod test_support;

use config::app_config::AppConfig;
use setup::{dependency_injection::DependencyContainer, server::Server};

/// Cart Sync Service Entry Point
///
/// Serves an offline-first cart from an on-device SQLite store and mirrors
/// it to Supabase in the background.
///
/// - config/: Application configuration (server, CORS, local store, sync, Supabase)
/// - setup/: Dependency injection and server setup
/// - api/: Route handlers and DTOs
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing with RUST_LOG env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // 2. Load environment variables
    dotenv().ok();

    // 3. Load configuration
    let config = AppConfig::from_env()?;

    // 4. Open the local cart database
    let pool = config.local_store.init_database().await?;

    // 5. Wire dependencies
    let container = DependencyContainer::new(pool, config.sync.clone(), config.supabase.as_ref());

    // 6. Run server until Ctrl-C, then stop background sync
    Server::run(config, container).await?;

    Ok(())
}
