use std::sync::Arc;

use poem::Route;
use poem::test::TestClient;
use serde_json::{Value, json};

use business::application::cart::scheduler::SyncScheduler;
use business::application::cart::synchronizer::SyncConfig;
use business::domain::cart::repository::CartRepository;
use persistence::db::{DatabaseConfig, create_sqlite_pool, run_migrations};

use crate::setup::dependency_injection::DependencyContainer;
use crate::setup::server::Server;

/// Handles that outlive the routes handed to the test client.
pub struct Handles {
    pub cart: Arc<dyn CartRepository>,
    pub scheduler: Arc<SyncScheduler>,
}

/// Full app over an in-memory cart database with sync disabled.
pub async fn local_only_client() -> (TestClient<Route>, Handles) {
    let pool = create_sqlite_pool(&DatabaseConfig::in_memory()).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let sync = SyncConfig {
        enabled: false,
        ..SyncConfig::default()
    };

    let DependencyContainer {
        health_api,
        cart_api,
        session_api,
        cart,
        scheduler,
    } = DependencyContainer::new(pool, sync, None);

    let app = Server::routes(health_api, cart_api, session_api, "http://localhost");
    (TestClient::new(app), Handles { cart, scheduler })
}

pub fn milk(quantity: i64) -> Value {
    json!({
        "product_id": "p-milk",
        "name": "Milk",
        "price": 1.0,
        "quantity": quantity
    })
}
