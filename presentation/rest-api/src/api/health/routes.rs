use std::sync::Arc;

use chrono::{DateTime, Utc};
use poem_openapi::{Object, OpenApi, payload::Json};
use serde::{Deserialize, Serialize};

use business::application::cart::sync_state::{SchedulerPhase, SyncState};

use crate::api::tags::ApiTags;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, Object)]
pub struct HealthCheckResponse {
    /// Service status
    pub status: String,
    /// Current server timestamp
    pub timestamp: String,
    /// Service version
    pub version: String,
    /// Whether periodic cart sync is still running
    pub background_sync_active: bool,
    /// Scheduler phase: idle, evaluating, syncing or stopped
    pub sync_phase: String,
    /// Last completed sync pass
    #[oai(skip_serializing_if_is_none)]
    pub last_sync_time: Option<DateTime<Utc>>,
}

fn phase_name(phase: SchedulerPhase) -> &'static str {
    match phase {
        SchedulerPhase::Idle => "idle",
        SchedulerPhase::Evaluating => "evaluating",
        SchedulerPhase::Syncing => "syncing",
        SchedulerPhase::Stopped => "stopped",
    }
}

pub struct Api {
    state: Arc<SyncState>,
}

impl Api {
    pub fn new(state: Arc<SyncState>) -> Self {
        Self { state }
    }
}

#[OpenApi]
impl Api {
    /// Health check endpoint
    ///
    /// Returns the service status together with the background sync state.
    /// A stale or failing sync never makes the service unhealthy: the cart
    /// keeps working locally.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health_check(&self) -> Json<HealthCheckResponse> {
        let snapshot = self.state.snapshot();
        Json(HealthCheckResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            background_sync_active: snapshot.background_sync_active,
            sync_phase: phase_name(snapshot.phase).to_string(),
            last_sync_time: snapshot.last_sync_time,
        })
    }
}
