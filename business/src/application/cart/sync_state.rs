use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::domain::cart::sync::SkipReason;
use crate::domain::shared::value_objects::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Evaluating,
    Syncing,
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncSnapshot {
    pub last_sync_time: Option<DateTime<Utc>>,
    pub last_user_activity: Option<DateTime<Utc>>,
    pub background_sync_active: bool,
    pub phase: SchedulerPhase,
}

struct Inner {
    last_sync_time: Option<DateTime<Utc>>,
    last_user_activity: Option<DateTime<Utc>>,
    background_sync_active: bool,
    phase: SchedulerPhase,
    // Bumped on every local cart write.
    local_revision: u64,
    // User whose remote cart last received the local cart, and at which revision.
    last_push: Option<(UserId, u64)>,
}

/// Process-wide sync bookkeeping shared by the facade, the synchronizer and
/// the scheduler. Also the single gate that keeps at most one sync or
/// migration pass in flight.
pub struct SyncState {
    inner: Mutex<Inner>,
    shutdown: watch::Sender<bool>,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncState {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Mutex::new(Inner {
                last_sync_time: None,
                last_user_activity: None,
                background_sync_active: true,
                phase: SchedulerPhase::Idle,
                local_revision: 0,
                last_push: None,
            }),
            shutdown,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        let inner = self.lock();
        SyncSnapshot {
            last_sync_time: inner.last_sync_time,
            last_user_activity: inner.last_user_activity,
            background_sync_active: inner.background_sync_active,
            phase: inner.phase,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.lock().phase
    }

    pub fn record_activity(&self, at: DateTime<Utc>) {
        self.lock().last_user_activity = Some(at);
    }

    pub fn record_sync(&self, at: DateTime<Utc>) {
        self.lock().last_sync_time = Some(at);
    }

    pub fn record_local_change(&self) {
        let mut inner = self.lock();
        inner.local_revision = inner.local_revision.wrapping_add(1);
    }

    pub fn local_revision(&self) -> u64 {
        self.lock().local_revision
    }

    /// Marks the local cart as it was at `revision` as present in the
    /// remote cart of `user_id`.
    pub fn record_push(&self, user_id: &UserId, revision: u64) {
        self.lock().last_push = Some((user_id.clone(), revision));
    }

    /// True when the current local cart already reached `user_id`'s remote
    /// cart and has not been written since.
    pub fn is_pushed_to(&self, user_id: &UserId) -> bool {
        let inner = self.lock();
        matches!(
            &inner.last_push,
            Some((pushed_to, revision)) if pushed_to == user_id && *revision == inner.local_revision
        )
    }

    /// `Idle -> Evaluating`. Returns the blocking phase otherwise.
    pub fn begin_evaluation(&self) -> Result<(), SchedulerPhase> {
        let mut inner = self.lock();
        match inner.phase {
            SchedulerPhase::Idle => {
                inner.phase = SchedulerPhase::Evaluating;
                Ok(())
            }
            other => Err(other),
        }
    }

    /// `Evaluating -> Idle`. No-op if a pass took over or the state stopped.
    pub fn end_evaluation(&self) {
        let mut inner = self.lock();
        if inner.phase == SchedulerPhase::Evaluating {
            inner.phase = SchedulerPhase::Idle;
        }
    }

    /// Enters `Syncing`. The returned permit puts the phase back to `Idle`
    /// when dropped, unless the state was stopped meanwhile.
    pub fn try_begin_sync(&self) -> Result<SyncPermit<'_>, SkipReason> {
        let mut inner = self.lock();
        match inner.phase {
            SchedulerPhase::Stopped => Err(SkipReason::Disposed),
            SchedulerPhase::Syncing => Err(SkipReason::AlreadyInProgress),
            SchedulerPhase::Idle | SchedulerPhase::Evaluating => {
                inner.phase = SchedulerPhase::Syncing;
                Ok(SyncPermit { state: self })
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.phase() == SchedulerPhase::Stopped
    }

    /// Terminal transition. Wakes the scheduler loop so it exits.
    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            inner.phase = SchedulerPhase::Stopped;
            inner.background_sync_active = false;
        }
        self.shutdown.send_replace(true);
    }

    pub fn subscribe_shutdown(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }
}

pub struct SyncPermit<'a> {
    state: &'a SyncState,
}

impl Drop for SyncPermit<'_> {
    fn drop(&mut self) {
        let mut inner = self.state.lock();
        if inner.phase == SchedulerPhase::Syncing {
            inner.phase = SchedulerPhase::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_idle_and_active() {
        let state = SyncState::new();
        let snapshot = state.snapshot();

        assert_eq!(snapshot.phase, SchedulerPhase::Idle);
        assert!(snapshot.background_sync_active);
        assert!(snapshot.last_sync_time.is_none());
        assert!(snapshot.last_user_activity.is_none());
    }

    #[test]
    fn should_allow_only_one_sync_in_flight() {
        let state = SyncState::new();

        let permit = state.try_begin_sync().unwrap();
        assert!(matches!(
            state.try_begin_sync(),
            Err(SkipReason::AlreadyInProgress)
        ));

        drop(permit);
        assert_eq!(state.phase(), SchedulerPhase::Idle);
        assert!(state.try_begin_sync().is_ok());
    }

    #[test]
    fn should_let_sync_take_over_evaluation() {
        let state = SyncState::new();
        state.begin_evaluation().unwrap();

        let permit = state.try_begin_sync().unwrap();
        state.end_evaluation();

        assert_eq!(state.phase(), SchedulerPhase::Syncing);
        drop(permit);
        assert_eq!(state.phase(), SchedulerPhase::Idle);
    }

    #[test]
    fn should_forget_push_after_local_write() {
        let state = SyncState::new();
        let user = UserId::new("user-1");

        state.record_push(&user, state.local_revision());
        assert!(state.is_pushed_to(&user));
        assert!(!state.is_pushed_to(&UserId::new("user-2")));

        state.record_local_change();
        assert!(!state.is_pushed_to(&user));
    }

    #[test]
    fn should_not_count_push_of_an_older_revision() {
        let state = SyncState::new();
        let user = UserId::new("user-1");
        let revision = state.local_revision();

        state.record_local_change();
        state.record_push(&user, revision);

        assert!(!state.is_pushed_to(&user));
    }

    #[test]
    fn should_refuse_evaluation_while_syncing() {
        let state = SyncState::new();
        let _permit = state.try_begin_sync().unwrap();

        assert_eq!(state.begin_evaluation(), Err(SchedulerPhase::Syncing));
    }

    #[test]
    fn should_stay_stopped_after_in_flight_pass_finishes() {
        let state = SyncState::new();
        let permit = state.try_begin_sync().unwrap();

        state.stop();
        drop(permit);

        assert_eq!(state.phase(), SchedulerPhase::Stopped);
        assert!(!state.snapshot().background_sync_active);
        assert!(matches!(state.try_begin_sync(), Err(SkipReason::Disposed)));
    }

    #[test]
    fn should_signal_shutdown_to_late_subscribers() {
        let state = SyncState::new();
        state.stop();

        let receiver = state.subscribe_shutdown();

        assert!(*receiver.borrow());
    }
}
