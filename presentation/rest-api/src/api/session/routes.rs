use std::sync::Arc;

use poem_openapi::{OpenApi, payload::Json};

use business::application::session::SessionManager;
use business::domain::shared::value_objects::UserId;

use crate::api::error::ErrorResponse;
use crate::api::session::dto::{SessionResponse, SignInRequest, SignInResponse};
use crate::api::tags::ApiTags;

pub struct SessionApi {
    manager: Arc<SessionManager>,
}

impl SessionApi {
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self { manager }
    }
}

/// Session API
///
/// Switches the cart between guest mode and an authenticated user.
#[OpenApi]
impl SessionApi {
    /// Current session
    #[oai(path = "/session", method = "get", tag = "ApiTags::Session")]
    async fn current(&self) -> Json<SessionResponse> {
        Json(self.manager.current_user().into())
    }

    /// Sign in
    ///
    /// Signing in from guest mode pushes the guest cart to the user's
    /// backend cart once. The local cart is never modified.
    #[oai(path = "/session", method = "put", tag = "ApiTags::Session")]
    async fn sign_in(&self, body: Json<SignInRequest>) -> SignInApiResponse {
        let user_id = body.0.user_id.trim();
        if user_id.is_empty() {
            return SignInApiResponse::BadRequest(ErrorResponse::new(
                "ValidationError",
                "session.invalid_user_id",
            ));
        }

        let outcome = self.manager.sign_in(UserId::new(user_id)).await;
        SignInApiResponse::Ok(Json(outcome.into()))
    }

    /// Sign out
    ///
    /// Returns to guest mode and keeps the local cart.
    #[oai(path = "/session", method = "delete", tag = "ApiTags::Session")]
    async fn sign_out(&self) -> Json<SessionResponse> {
        self.manager.sign_out();
        Json(self.manager.current_user().into())
    }
}

#[derive(poem_openapi::ApiResponse)]
pub enum SignInApiResponse {
    #[oai(status = 200)]
    Ok(Json<SignInResponse>),
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),
}
