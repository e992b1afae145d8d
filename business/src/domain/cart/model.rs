use chrono::{DateTime, Utc};

use super::errors::CartError;
use crate::domain::shared::value_objects::{CartItemId, ProductId};

/// Product fields captured when the product is put in the cart, enough to
/// render the line and price it without a catalog lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub sale_price: Option<f64>,
    pub image_url: Option<String>,
    /// Units available when the snapshot was taken, if the catalog reported it.
    pub stock: Option<u32>,
}

impl ProductSnapshot {
    pub fn new(id: ProductId, name: String, price: f64) -> Result<Self, CartError> {
        let snapshot = Self {
            id,
            name,
            price,
            sale_price: None,
            image_url: None,
            stock: None,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn with_sale_price(mut self, sale_price: f64) -> Self {
        self.sale_price = Some(sale_price);
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn validate(&self) -> Result<(), CartError> {
        if self.id.as_str().trim().is_empty() || self.name.trim().is_empty() {
            return Err(CartError::InvalidProduct);
        }
        let valid_price = |p: f64| p.is_finite() && p >= 0.0;
        if !valid_price(self.price) || !self.sale_price.is_none_or(valid_price) {
            return Err(CartError::InvalidProduct);
        }
        Ok(())
    }

    /// Sale price when the product is discounted, list price otherwise.
    pub fn effective_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.price)
    }

    pub fn allows(&self, quantity: u32) -> bool {
        self.stock.is_none_or(|stock| quantity <= stock)
    }
}

/// Validates a caller-supplied quantity. Zero and negatives are rejected;
/// a line that should disappear is removed explicitly.
pub fn validate_quantity(quantity: i64) -> Result<u32, CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity);
    }
    u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: ProductSnapshot,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartItem {
    pub fn new(product: ProductSnapshot, quantity: i64) -> Result<Self, CartError> {
        product.validate()?;
        let quantity = validate_quantity(quantity)?;
        if !product.allows(quantity) {
            return Err(CartError::InsufficientStock);
        }

        let now = Utc::now();
        Ok(Self {
            id: CartItemId::generate(),
            product,
            quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Constructor for data already persisted in the store (no validation).
    pub fn from_repository(
        id: CartItemId,
        product: ProductSnapshot,
        quantity: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            product,
            quantity,
            created_at,
            updated_at,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.product.effective_price() * f64::from(self.quantity)
    }

    /// Adds `extra` units and refreshes the product snapshot with the
    /// caller's newer copy.
    pub fn merged_with(
        &self,
        product: ProductSnapshot,
        extra: u32,
    ) -> Result<Self, CartError> {
        let quantity = self
            .quantity
            .checked_add(extra)
            .ok_or(CartError::InvalidQuantity)?;
        self.with_product_and_quantity(product, quantity)
    }

    pub fn with_quantity(&self, quantity: u32) -> Result<Self, CartError> {
        self.with_product_and_quantity(self.product.clone(), quantity)
    }

    fn with_product_and_quantity(
        &self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<Self, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.allows(quantity) {
            return Err(CartError::InsufficientStock);
        }
        Ok(Self {
            id: self.id.clone(),
            product,
            quantity,
            created_at: self.created_at,
            updated_at: Utc::now(),
        })
    }
}

/// The cart as shown to the user: lines plus derived totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines. Widened so many large lines cannot overflow.
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
