use async_trait::async_trait;

/// Reports whether the backend is reachable right now. Consulted before
/// sync passes; never consulted by local cart writes.
#[async_trait]
pub trait ConnectivityMonitor: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Monitor that always reports offline. Used when sync is disabled.
pub struct Offline;

#[async_trait]
impl ConnectivityMonitor for Offline {
    async fn is_connected(&self) -> bool {
        false
    }
}
