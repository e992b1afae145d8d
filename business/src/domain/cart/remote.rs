use async_trait::async_trait;

use crate::domain::shared::value_objects::{ProductId, UserId};

/// A cart line as the backend stores it. Only used to mirror local state.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCartItem {
    pub id: String,
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Failures of a remote cart call.
///
/// `Unreachable` and `Timeout` mean the request never got an answer;
/// the other variants mean the backend answered and refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    #[error("remote.unreachable")]
    Unreachable,
    #[error("remote.timeout")]
    Timeout,
    #[error("remote.unauthorized")]
    Unauthorized,
    #[error("remote.rejected ({status})")]
    Rejected { status: u16 },
    #[error("remote.invalid_response")]
    InvalidResponse,
}

impl RemoteError {
    pub fn is_network(&self) -> bool {
        matches!(self, RemoteError::Unreachable | RemoteError::Timeout)
    }
}

/// Backend cart API, scoped per authenticated user.
#[async_trait]
pub trait RemoteCartClient: Send + Sync {
    async fn get_items(&self, user_id: &UserId) -> Result<Vec<RemoteCartItem>, RemoteError>;
    async fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError>;
    async fn remove_item(&self, user_id: &UserId, item_id: &str) -> Result<(), RemoteError>;
    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: &str,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError>;
    async fn clear(&self, user_id: &UserId) -> Result<(), RemoteError>;
}

/// Remote that refuses every call. Stands in for the backend when sync is
/// disabled so the cart runs local-only.
pub struct Unreachable;

#[async_trait]
impl RemoteCartClient for Unreachable {
    async fn get_items(&self, _user_id: &UserId) -> Result<Vec<RemoteCartItem>, RemoteError> {
        Err(RemoteError::Unreachable)
    }

    async fn add_item(
        &self,
        _user_id: &UserId,
        _product_id: &ProductId,
        _quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        Err(RemoteError::Unreachable)
    }

    async fn remove_item(&self, _user_id: &UserId, _item_id: &str) -> Result<(), RemoteError> {
        Err(RemoteError::Unreachable)
    }

    async fn update_quantity(
        &self,
        _user_id: &UserId,
        _item_id: &str,
        _quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        Err(RemoteError::Unreachable)
    }

    async fn clear(&self, _user_id: &UserId) -> Result<(), RemoteError> {
        Err(RemoteError::Unreachable)
    }
}
