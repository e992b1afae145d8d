use chrono::{DateTime, Utc};

/// Time source for sync bookkeeping. Injected so the sync predicate can be
/// driven without wall-clock waits.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
