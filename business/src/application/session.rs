use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::cart::repository::CartRepository;
use crate::domain::logger::Logger;
use crate::domain::session::{SessionProvider, SignInOutcome};
use crate::domain::shared::value_objects::UserId;

/// In-process session holder. Starts as a guest.
#[derive(Default)]
pub struct SessionState {
    user: RwLock<Option<UserId>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `user` and returns the previous value.
    pub fn replace(&self, user: Option<UserId>) -> Option<UserId> {
        let mut current = self.user.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, user)
    }
}

impl SessionProvider for SessionState {
    fn current_user(&self) -> Option<UserId> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct SessionManager {
    pub session: Arc<SessionState>,
    pub cart: Arc<dyn CartRepository>,
    pub logger: Arc<dyn Logger>,
}

impl SessionManager {
    /// Authenticates `user_id`. A guest cart is pushed to the new user's
    /// remote cart exactly once, on the guest to user transition.
    pub async fn sign_in(&self, user_id: UserId) -> SignInOutcome {
        let previous = self.session.replace(Some(user_id.clone()));

        let migration = match previous {
            None => {
                self.logger
                    .info(&format!("Guest signed in as {}, migrating cart", user_id));
                let outcome = self.cart.migrate_guest_cart_to_authenticated_user().await;
                self.logger
                    .info(&format!("Guest cart migration finished: {:?}", outcome));
                Some(outcome)
            }
            Some(previous) if previous == user_id => {
                self.logger
                    .debug(&format!("User {} already signed in", user_id));
                None
            }
            Some(previous) => {
                self.logger.info(&format!(
                    "Session switched from {} to {}",
                    previous, user_id
                ));
                None
            }
        };

        SignInOutcome { user_id, migration }
    }

    /// Back to guest mode. The local cart is kept.
    pub fn sign_out(&self) -> Option<UserId> {
        let previous = self.session.replace(None);
        if let Some(user_id) = &previous {
            self.logger.info(&format!("User {} signed out", user_id));
        }
        previous
    }

    pub fn current_user(&self) -> Option<UserId> {
        self.session.current_user()
    }
}
