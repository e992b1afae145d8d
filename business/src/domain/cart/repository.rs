use async_trait::async_trait;

use crate::domain::shared::value_objects::{CartItemId, ProductId};

use super::errors::CartError;
use super::model::{Cart, CartItem, ProductSnapshot};
use super::sync::{MigrationOutcome, SyncOutcome};

pub struct AddCartItemParams {
    pub product: ProductSnapshot,
    pub quantity: i64,
}

pub struct UpdateQuantityParams {
    pub id: CartItemId,
    pub quantity: i64,
}

/// Cart contract consumed by the UI and state layers.
///
/// Reads and mutations complete against the local store only and never
/// wait on the network. `sync_with_remote` and the guest migration are the
/// only operations that reach the backend, and they report remote trouble
/// through their outcomes rather than as errors.
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn get_items(&self) -> Result<Vec<CartItem>, CartError>;
    async fn get_cart(&self) -> Result<Cart, CartError>;
    async fn add_item(&self, params: AddCartItemParams) -> Result<CartItem, CartError>;
    async fn remove_item(&self, id: &CartItemId) -> Result<bool, CartError>;
    async fn update_quantity(&self, params: UpdateQuantityParams)
    -> Result<CartItem, CartError>;
    async fn clear(&self) -> Result<bool, CartError>;
    async fn get_total_price(&self) -> Result<f64, CartError>;
    /// Sum of unit quantities, not the number of lines.
    async fn get_item_count(&self) -> Result<u64, CartError>;
    async fn is_in_cart(&self, product_id: &ProductId) -> Result<bool, CartError>;
    async fn sync_with_remote(&self) -> SyncOutcome;
    async fn migrate_guest_cart_to_authenticated_user(&self) -> MigrationOutcome;
    /// Stops background sync. Safe to call more than once.
    fn dispose(&self);
}
