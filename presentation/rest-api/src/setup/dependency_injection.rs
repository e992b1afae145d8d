use std::sync::Arc;

use logger::TracingLogger;
use persistence::cart::repository::CartStoreSqlite;
use supabase::cart::RemoteCartClientSupabase;
use supabase::client::SupabaseClient;
use supabase::connectivity::HttpConnectivityMonitor;

use business::application::cart::repository::CartRepositoryImpl;
use business::application::cart::scheduler::SyncScheduler;
use business::application::cart::sync_state::SyncState;
use business::application::cart::synchronizer::{CartSynchronizerImpl, SyncConfig};
use business::application::session::{SessionManager, SessionState};
use business::domain::cart::connectivity::{ConnectivityMonitor, Offline};
use business::domain::cart::remote::{RemoteCartClient, Unreachable};
use business::domain::cart::repository::CartRepository;
use business::domain::cart::store::LocalCartStore;
use business::domain::shared::clock::SystemClock;

use crate::config::supabase_config::SupabaseConfig;

pub struct DependencyContainer {
    pub health_api: crate::api::health::routes::Api,
    pub cart_api: crate::api::cart::routes::CartApi,
    pub session_api: crate::api::session::routes::SessionApi,
    pub cart: Arc<dyn CartRepository>,
    pub scheduler: Arc<SyncScheduler>,
}

impl DependencyContainer {
    pub fn new(
        pool: sqlx::SqlitePool,
        sync: SyncConfig,
        supabase: Option<&SupabaseConfig>,
    ) -> Self {
        let store = Arc::new(CartStoreSqlite::new(pool));

        // Infrastructure adapters
        let (remote, connectivity): (Arc<dyn RemoteCartClient>, Arc<dyn ConnectivityMonitor>) =
            match supabase {
                Some(config) if sync.enabled => {
                    let client = SupabaseClient::with_timeout(
                        config.url.clone(),
                        config.anon_key.clone(),
                        sync.remote_call_timeout,
                    );
                    let probe = HttpConnectivityMonitor::new(SupabaseClient::with_timeout(
                        config.url.clone(),
                        config.anon_key.clone(),
                        config.probe_timeout,
                    ));
                    (
                        Arc::new(RemoteCartClientSupabase::new(client)),
                        Arc::new(probe),
                    )
                }
                _ => {
                    tracing::info!("Cart sync disabled, running local-only");
                    (Arc::new(Unreachable), Arc::new(Offline))
                }
            };

        Self::wire(store, remote, connectivity, sync)
    }

    pub fn wire(
        store: Arc<dyn LocalCartStore>,
        remote: Arc<dyn RemoteCartClient>,
        connectivity: Arc<dyn ConnectivityMonitor>,
        sync: SyncConfig,
    ) -> Self {
        let state = Arc::new(SyncState::new());
        let session = Arc::new(SessionState::new());
        let clock = Arc::new(SystemClock);
        let policy = sync.policy.clone();

        let synchronizer = Arc::new(CartSynchronizerImpl {
            store: store.clone(),
            remote,
            connectivity: connectivity.clone(),
            session: session.clone(),
            state: state.clone(),
            clock: clock.clone(),
            config: sync,
            logger: Arc::new(TracingLogger::new("sync")),
        });

        let cart: Arc<dyn CartRepository> = Arc::new(CartRepositoryImpl::new(
            store,
            synchronizer.clone(),
            state.clone(),
            clock.clone(),
            Arc::new(TracingLogger::new("cart")),
        ));

        let scheduler = Arc::new(SyncScheduler {
            synchronizer,
            connectivity,
            state: state.clone(),
            clock,
            policy,
            logger: Arc::new(TracingLogger::new("scheduler")),
        });

        let session_manager = Arc::new(SessionManager {
            session,
            cart: cart.clone(),
            logger: Arc::new(TracingLogger::new("session")),
        });

        Self {
            health_api: crate::api::health::routes::Api::new(state),
            cart_api: crate::api::cart::routes::CartApi::new(cart.clone()),
            session_api: crate::api::session::routes::SessionApi::new(session_manager),
            cart,
            scheduler,
        }
    }
}
