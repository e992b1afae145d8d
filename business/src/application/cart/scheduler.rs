use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::application::cart::sync_state::{SchedulerPhase, SyncState};
use crate::domain::cart::connectivity::ConnectivityMonitor;
use crate::domain::cart::sync::{CartSynchronizer, SyncOutcome, SyncPolicy, SyncReason};
use crate::domain::logger::Logger;
use crate::domain::shared::clock::Clock;

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Stopped,
    Busy,
    Offline,
    NotDue,
    Synced(SyncReason, SyncOutcome),
}

/// Periodic driver for background cart sync.
pub struct SyncScheduler {
    pub synchronizer: Arc<dyn CartSynchronizer>,
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    pub state: Arc<SyncState>,
    pub clock: Arc<dyn Clock>,
    pub policy: SyncPolicy,
    pub logger: Arc<dyn Logger>,
}

impl SyncScheduler {
    /// Evaluates the sync predicate once and runs a pass if it holds.
    pub async fn tick(&self) -> TickOutcome {
        if let Err(phase) = self.state.begin_evaluation() {
            return match phase {
                SchedulerPhase::Stopped => TickOutcome::Stopped,
                _ => TickOutcome::Busy,
            };
        }
        let outcome = self.evaluate().await;
        self.state.end_evaluation();
        outcome
    }

    async fn evaluate(&self) -> TickOutcome {
        if !self.connectivity.is_connected().await {
            return TickOutcome::Offline;
        }

        let snapshot = self.state.snapshot();
        let Some(reason) = self.policy.due_reason(
            self.clock.now(),
            snapshot.last_sync_time,
            snapshot.last_user_activity,
        ) else {
            return TickOutcome::NotDue;
        };

        self.logger
            .debug(&format!("Background cart sync due ({})", reason));
        let outcome = self.synchronizer.sync().await;
        match &outcome {
            SyncOutcome::Completed { pushed, .. } => self.logger.info(&format!(
                "Background cart sync pushed {} lines ({})",
                pushed, reason
            )),
            SyncOutcome::Skipped(skip) => self
                .logger
                .debug(&format!("Background cart sync skipped: {}", skip)),
            SyncOutcome::Failed(e) => self.logger.warn(&format!(
                "Background cart sync failed, retrying on a later tick: {}",
                e
            )),
        }
        TickOutcome::Synced(reason, outcome)
    }

    /// Ticks every `policy.tick_interval` until the shared state is stopped.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    async fn run(&self) {
        let mut shutdown = self.state.subscribe_shutdown();
        let period = self.policy.tick_interval.max(Duration::from_millis(1));
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.logger.info(&format!(
            "Cart sync scheduler started (every {}s)",
            period.as_secs()
        ));
        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = interval.tick() => {
                    if self.tick().await == TickOutcome::Stopped {
                        break;
                    }
                }
            }
        }
        self.logger.info("Cart sync scheduler stopped");
    }
}
