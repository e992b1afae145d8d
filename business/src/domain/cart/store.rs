use async_trait::async_trait;

use crate::domain::errors::RepositoryError;
use crate::domain::shared::value_objects::{CartItemId, ProductId};

use super::model::CartItem;

/// On-device cart storage. This is the authoritative copy of the cart;
/// every facade operation completes against it without touching the network.
#[async_trait]
pub trait LocalCartStore: Send + Sync {
    /// All lines, oldest first.
    async fn get_all(&self) -> Result<Vec<CartItem>, RepositoryError>;
    async fn get_by_id(&self, id: &CartItemId) -> Result<Option<CartItem>, RepositoryError>;
    async fn find_by_product_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, RepositoryError>;
    /// Inserts or replaces the line with the same id.
    async fn save(&self, item: &CartItem) -> Result<(), RepositoryError>;
    /// Returns false when no line had this id.
    async fn delete(&self, id: &CartItemId) -> Result<bool, RepositoryError>;
    /// Returns the number of lines removed.
    async fn clear(&self) -> Result<u64, RepositoryError>;
    /// Sum of quantities across lines.
    async fn item_count(&self) -> Result<u64, RepositoryError>;
    async fn total_price(&self) -> Result<f64, RepositoryError>;
    async fn contains_product(&self, product_id: &ProductId) -> Result<bool, RepositoryError>;
}
