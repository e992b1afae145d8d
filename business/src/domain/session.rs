use crate::domain::cart::sync::MigrationOutcome;
use crate::domain::shared::value_objects::UserId;

/// Identity port. `None` means the app is running as a guest.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<UserId>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignInOutcome {
    pub user_id: UserId,
    /// Present only when signing in replaced a guest session.
    pub migration: Option<MigrationOutcome>,
}
