use poem_openapi::Object;

use business::domain::session::SignInOutcome;
use business::domain::shared::value_objects::UserId;

use crate::api::cart::dto::MigrationResponse;

#[derive(Debug, Clone, Object)]
pub struct SignInRequest {
    /// Supabase auth user id
    pub user_id: String,
}

#[derive(Debug, Clone, Object)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[oai(skip_serializing_if_is_none)]
    pub user_id: Option<String>,
}

impl From<Option<UserId>> for SessionResponse {
    fn from(user: Option<UserId>) -> Self {
        Self {
            authenticated: user.is_some(),
            user_id: user.map(|u| u.to_string()),
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct SignInResponse {
    pub user_id: String,
    /// Present when a guest cart was pushed to the user's backend cart
    #[oai(skip_serializing_if_is_none)]
    pub migration: Option<MigrationResponse>,
}

impl From<SignInOutcome> for SignInResponse {
    fn from(outcome: SignInOutcome) -> Self {
        Self {
            user_id: outcome.user_id.to_string(),
            migration: outcome.migration.map(Into::into),
        }
    }
}
