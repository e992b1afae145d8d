use async_trait::async_trait;
use reqwest::RequestBuilder;

use business::domain::cart::connectivity::ConnectivityMonitor;

use crate::client::{SupabaseClient, error_for_status};

/// Reports the device online when the backend answers at all. Any HTTP
/// status counts; only transport failures mean offline.
pub struct HttpConnectivityMonitor {
    client: SupabaseClient,
}

impl HttpConnectivityMonitor {
    /// `client` should carry the short probe timeout, not the call timeout.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    fn probe_request(&self) -> RequestBuilder {
        self.client
            .authorized(self.client.client.get(self.client.rest_root_url()))
    }
}

#[async_trait]
impl ConnectivityMonitor for HttpConnectivityMonitor {
    async fn is_connected(&self) -> bool {
        match self.probe_request().send().await {
            Ok(response) => {
                if !response.status().is_success() {
                    tracing::debug!(
                        target: "Cart -- ",
                        "connectivity probe answered {} ({})",
                        response.status(),
                        error_for_status(response.status())
                    );
                }
                true
            }
            Err(e) => {
                tracing::debug!(target: "Cart -- ", "connectivity probe failed: {}", e);
                false
            }
        }
    }
}
