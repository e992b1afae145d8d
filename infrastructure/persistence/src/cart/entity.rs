use chrono::{DateTime, Utc};
use sqlx::FromRow;

use business::domain::cart::model::{CartItem, ProductSnapshot};
use business::domain::errors::RepositoryError;
use business::domain::shared::value_objects::{CartItemId, ProductId};

#[derive(Debug, FromRow)]
pub struct CartItemEntity {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub image_url: Option<String>,
    pub stock: Option<i64>,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItemEntity {
    /// Rows that no longer satisfy the cart line invariants are reported as
    /// `Corrupted` instead of being silently repaired.
    pub fn into_domain(self) -> Result<CartItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(RepositoryError::Corrupted)?;
        let stock = self
            .stock
            .map(u32::try_from)
            .transpose()
            .map_err(|_| RepositoryError::Corrupted)?;

        let product = ProductSnapshot {
            id: ProductId::new(self.product_id),
            name: self.product_name,
            price: self.price,
            sale_price: self.sale_price,
            image_url: self.image_url,
            stock,
        };
        product.validate().map_err(|_| RepositoryError::Corrupted)?;

        Ok(CartItem::from_repository(
            CartItemId::new(self.id),
            product,
            quantity,
            self.created_at,
            self.updated_at,
        ))
    }
}
