use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::application::cart::sync_state::SyncState;
use crate::domain::cart::connectivity::ConnectivityMonitor;
use crate::domain::cart::remote::{RemoteCartClient, RemoteError};
use crate::domain::cart::store::LocalCartStore;
use crate::domain::cart::sync::{
    CartSynchronizer, MigrationOutcome, SkipReason, SyncError, SyncOutcome, SyncPolicy,
};
use crate::domain::logger::Logger;
use crate::domain::session::SessionProvider;
use crate::domain::shared::clock::Clock;
use crate::domain::shared::value_objects::UserId;

/// Sync strategy chosen once at construction. With `enabled == false` the
/// cart runs local-only and every pass is skipped.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub enabled: bool,
    pub policy: SyncPolicy,
    /// Upper bound for each individual remote call.
    pub remote_call_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            policy: SyncPolicy::default(),
            remote_call_timeout: Duration::from_secs(15),
        }
    }
}

pub struct CartSynchronizerImpl {
    pub store: Arc<dyn LocalCartStore>,
    pub remote: Arc<dyn RemoteCartClient>,
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    pub session: Arc<dyn SessionProvider>,
    pub state: Arc<SyncState>,
    pub clock: Arc<dyn Clock>,
    pub config: SyncConfig,
    pub logger: Arc<dyn Logger>,
}

impl CartSynchronizerImpl {
    async fn preconditions(&self) -> Result<UserId, SkipReason> {
        if !self.config.enabled {
            return Err(SkipReason::Disabled);
        }
        if self.state.is_stopped() {
            return Err(SkipReason::Disposed);
        }
        if !self.connectivity.is_connected().await {
            return Err(SkipReason::Offline);
        }
        self.session.current_user().ok_or(SkipReason::Guest)
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, RemoteError>>,
    ) -> Result<T, RemoteError> {
        tokio::time::timeout(self.config.remote_call_timeout, call)
            .await
            .map_err(|_| RemoteError::Timeout)?
    }

    /// Returns (lines pushed, remote lines replaced).
    async fn replace_remote(&self, user_id: &UserId) -> Result<(usize, usize), SyncError> {
        let local = self.store.get_all().await?;
        let remote = self.bounded(self.remote.get_items(user_id)).await?;
        self.logger.debug(&format!(
            "Replacing {} remote cart lines with {} local lines for user {}",
            remote.len(),
            local.len(),
            user_id
        ));

        self.bounded(self.remote.clear(user_id)).await?;
        for item in &local {
            self.bounded(
                self.remote
                    .add_item(user_id, &item.product.id, item.quantity),
            )
            .await?;
        }

        Ok((local.len(), remote.len()))
    }

    fn report_failure(&self, context: &str, error: &SyncError) {
        match error {
            SyncError::Remote(e) if e.is_network() => self
                .logger
                .warn(&format!("{}: backend unreachable ({})", context, e)),
            SyncError::Remote(e) => self
                .logger
                .warn(&format!("{}: backend rejected request ({})", context, e)),
            SyncError::Cache(e) => self
                .logger
                .error(&format!("{}: local cart unreadable ({})", context, e)),
        }
    }
}

#[async_trait]
impl CartSynchronizer for CartSynchronizerImpl {
    async fn sync(&self) -> SyncOutcome {
        let user_id = match self.preconditions().await {
            Ok(user_id) => user_id,
            Err(reason) => {
                self.logger
                    .debug(&format!("Cart sync skipped: {}", reason));
                return SyncOutcome::Skipped(reason);
            }
        };

        let _permit = match self.state.try_begin_sync() {
            Ok(permit) => permit,
            Err(reason) => {
                self.logger
                    .debug(&format!("Cart sync skipped: {}", reason));
                return SyncOutcome::Skipped(reason);
            }
        };

        let revision = self.state.local_revision();
        match self.replace_remote(&user_id).await {
            Ok((pushed, replaced)) => {
                self.state.record_sync(self.clock.now());
                self.state.record_push(&user_id, revision);
                self.logger.info(&format!(
                    "Cart synced for user {}: {} lines pushed, {} replaced",
                    user_id, pushed, replaced
                ));
                SyncOutcome::Completed { pushed, replaced }
            }
            Err(e) => {
                self.report_failure("Cart sync failed", &e);
                SyncOutcome::Failed(e)
            }
        }
    }

    async fn migrate_guest_cart(&self) -> MigrationOutcome {
        let revision = self.state.local_revision();
        let items = match self.store.get_all().await {
            Ok(items) => items,
            Err(e) => {
                let e = SyncError::Cache(e);
                self.report_failure("Guest cart migration failed", &e);
                return MigrationOutcome::Failed(e);
            }
        };

        if items.is_empty() {
            self.logger.info("Guest cart empty, nothing to migrate");
            return MigrationOutcome::Empty;
        }

        let user_id = match self.preconditions().await {
            Ok(user_id) => user_id,
            Err(reason) => {
                self.logger
                    .info(&format!("Guest cart migration deferred: {}", reason));
                return MigrationOutcome::Deferred(reason);
            }
        };

        let _permit = match self.state.try_begin_sync() {
            Ok(permit) => permit,
            Err(reason) => {
                self.logger
                    .info(&format!("Guest cart migration deferred: {}", reason));
                return MigrationOutcome::Deferred(reason);
            }
        };

        if self.state.is_pushed_to(&user_id) {
            self.logger.info(&format!(
                "Cart already pushed to user {}, skipping migration",
                user_id
            ));
            return MigrationOutcome::AlreadyPushed;
        }

        let mut migrated = 0;
        let mut failed = 0;
        for item in &items {
            match self
                .bounded(
                    self.remote
                        .add_item(&user_id, &item.product.id, item.quantity),
                )
                .await
            {
                Ok(_) => migrated += 1,
                Err(e) => {
                    failed += 1;
                    self.logger.warn(&format!(
                        "Failed to migrate cart line {} (product {}): {}",
                        item.id, item.product.id, e
                    ));
                }
            }
        }

        if failed == 0 {
            self.state.record_push(&user_id, revision);
        }
        self.logger.info(&format!(
            "Guest cart migrated to user {}: {} lines migrated, {} failed",
            user_id, migrated, failed
        ));
        MigrationOutcome::Migrated { migrated, failed }
    }
}
