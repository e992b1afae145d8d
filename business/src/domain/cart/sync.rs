use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::remote::RemoteError;
use crate::domain::errors::RepositoryError;

/// Timing policy deciding when a background sync pass is worth running.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncPolicy {
    /// How often the scheduler evaluates the predicate.
    pub tick_interval: Duration,
    /// Sync regardless of activity once the mirror is this old.
    pub max_staleness: Duration,
    /// A user counts as active if they touched the cart this recently.
    pub activity_window: Duration,
    /// Minimum spacing between passes while the user is active.
    pub min_interval: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
            max_staleness: Duration::from_secs(15 * 60),
            activity_window: Duration::from_secs(2 * 60),
            min_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// Why a pass was considered due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncReason {
    FirstSync,
    Stale,
    ActiveUser,
}

impl std::fmt::Display for SyncReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncReason::FirstSync => write!(f, "first_sync"),
            SyncReason::Stale => write!(f, "stale"),
            SyncReason::ActiveUser => write!(f, "active_user"),
        }
    }
}

fn elapsed(now: DateTime<Utc>, since: DateTime<Utc>) -> Duration {
    // A clock that moved backwards counts as no time passing.
    (now - since).to_std().unwrap_or(Duration::ZERO)
}

impl SyncPolicy {
    pub fn due_reason(
        &self,
        now: DateTime<Utc>,
        last_sync: Option<DateTime<Utc>>,
        last_activity: Option<DateTime<Utc>>,
    ) -> Option<SyncReason> {
        let Some(last_sync) = last_sync else {
            return Some(SyncReason::FirstSync);
        };

        let since_sync = elapsed(now, last_sync);
        if since_sync > self.max_staleness {
            return Some(SyncReason::Stale);
        }

        let active = last_activity.is_some_and(|a| elapsed(now, a) <= self.activity_window);
        if active && since_sync > self.min_interval {
            return Some(SyncReason::ActiveUser);
        }

        None
    }
}

/// Why a sync or migration did nothing. Skips are not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Offline,
    Guest,
    AlreadyInProgress,
    Disposed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "sync.disabled"),
            SkipReason::Offline => write!(f, "sync.offline"),
            SkipReason::Guest => write!(f, "sync.guest"),
            SkipReason::AlreadyInProgress => write!(f, "sync.already_in_progress"),
            SkipReason::Disposed => write!(f, "sync.disposed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    #[error("sync.cache: {0}")]
    Cache(RepositoryError),
    #[error("sync.remote: {0}")]
    Remote(RemoteError),
}

impl From<RepositoryError> for SyncError {
    fn from(e: RepositoryError) -> Self {
        SyncError::Cache(e)
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        SyncError::Remote(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Remote now mirrors the local cart. `replaced` is how many remote
    /// lines existed before the pass.
    Completed { pushed: usize, replaced: usize },
    Skipped(SkipReason),
    Failed(SyncError),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SyncOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Nothing to migrate.
    Empty,
    /// Migration postponed; the next sync pass will push the cart instead.
    Deferred(SkipReason),
    /// The local cart already reached this user's remote cart unchanged.
    AlreadyPushed,
    Migrated { migrated: usize, failed: usize },
    Failed(SyncError),
}

impl MigrationOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            MigrationOutcome::Empty
            | MigrationOutcome::Deferred(_)
            | MigrationOutcome::AlreadyPushed => true,
            MigrationOutcome::Migrated { migrated, .. } => *migrated > 0,
            MigrationOutcome::Failed(_) => false,
        }
    }
}

/// Reconciles the remote mirror with the local cart.
#[async_trait]
pub trait CartSynchronizer: Send + Sync {
    /// Full-replace pass: remote becomes exactly the local cart.
    async fn sync(&self) -> SyncOutcome;
    /// Pushes a cart built as a guest into the signed-in user's remote cart.
    async fn migrate_guest_cart(&self) -> MigrationOutcome;
}
