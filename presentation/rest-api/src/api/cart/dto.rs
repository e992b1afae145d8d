use chrono::{DateTime, Utc};
use poem_openapi::Object;

use business::domain::cart::errors::CartError;
use business::domain::cart::model::{Cart, CartItem, ProductSnapshot};
use business::domain::cart::sync::{MigrationOutcome, SyncOutcome};
use business::domain::shared::value_objects::ProductId;

#[derive(Debug, Clone, Object)]
pub struct AddCartItemRequest {
    /// Catalog product identifier
    pub product_id: String,
    /// Product name shown on the cart line
    pub name: String,
    /// List price per unit
    pub price: f64,
    /// Discounted price per unit, if the product is on sale
    #[oai(skip_serializing_if_is_none)]
    pub sale_price: Option<f64>,
    #[oai(skip_serializing_if_is_none)]
    pub image_url: Option<String>,
    /// Units in stock, if known
    #[oai(skip_serializing_if_is_none)]
    pub stock: Option<u32>,
    /// Units to add (must be at least 1)
    pub quantity: i64,
}

impl AddCartItemRequest {
    pub fn into_snapshot(self) -> Result<(ProductSnapshot, i64), CartError> {
        let product = ProductSnapshot {
            id: ProductId::new(self.product_id),
            name: self.name,
            price: self.price,
            sale_price: self.sale_price,
            image_url: self.image_url,
            stock: self.stock,
        };
        product.validate()?;
        Ok((product, self.quantity))
    }
}

#[derive(Debug, Clone, Object)]
pub struct UpdateQuantityRequest {
    /// New quantity (must be at least 1; remove the line instead of zeroing it)
    pub quantity: i64,
}

#[derive(Debug, Clone, Object)]
pub struct CartItemResponse {
    /// Cart line identifier
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    #[oai(skip_serializing_if_is_none)]
    pub sale_price: Option<f64>,
    #[oai(skip_serializing_if_is_none)]
    pub image_url: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub stock: Option<u32>,
    pub quantity: u32,
    /// Effective unit price times quantity
    pub line_total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        let line_total = item.line_total();
        Self {
            id: item.id.to_string(),
            product_id: item.product.id.to_string(),
            name: item.product.name,
            price: item.product.price,
            sale_price: item.product.sale_price,
            image_url: item.product.image_url,
            stock: item.product.stock,
            quantity: item.quantity,
            line_total,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    /// Sum of unit quantities
    pub item_count: u64,
    /// Number of distinct lines
    pub line_count: u32,
    pub total: f64,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        let item_count = cart.unit_count();
        let line_count = u32::try_from(cart.line_count()).unwrap_or(u32::MAX);
        let total = cart.total_price();
        Self {
            items: cart.items.into_iter().map(Into::into).collect(),
            item_count,
            line_count,
            total,
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct TotalResponse {
    pub total: f64,
}

#[derive(Debug, Clone, Object)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Clone, Object)]
pub struct ContainsResponse {
    pub product_id: String,
    pub in_cart: bool,
}

#[derive(Debug, Clone, Object)]
pub struct ClearResponse {
    pub cleared: bool,
}

/// Result of an explicit sync request
#[derive(Debug, Clone, Object)]
pub struct SyncResponse {
    /// completed, skipped or failed
    pub status: String,
    pub success: bool,
    #[oai(skip_serializing_if_is_none)]
    pub pushed: Option<u32>,
    #[oai(skip_serializing_if_is_none)]
    pub replaced: Option<u32>,
    /// Skip reason or failure code
    #[oai(skip_serializing_if_is_none)]
    pub reason: Option<String>,
    /// Set when the request may be retried later
    pub retryable: bool,
}

fn count(n: usize) -> Option<u32> {
    Some(u32::try_from(n).unwrap_or(u32::MAX))
}

impl From<SyncOutcome> for SyncResponse {
    fn from(outcome: SyncOutcome) -> Self {
        let success = outcome.is_success();
        match outcome {
            SyncOutcome::Completed { pushed, replaced } => Self {
                status: "completed".to_string(),
                success,
                pushed: count(pushed),
                replaced: count(replaced),
                reason: None,
                retryable: false,
            },
            SyncOutcome::Skipped(reason) => Self {
                status: "skipped".to_string(),
                success,
                pushed: None,
                replaced: None,
                reason: Some(reason.to_string()),
                retryable: false,
            },
            SyncOutcome::Failed(error) => Self {
                status: "failed".to_string(),
                success,
                pushed: None,
                replaced: None,
                reason: Some(error.to_string()),
                retryable: true,
            },
        }
    }
}

#[derive(Debug, Clone, Object)]
pub struct MigrationResponse {
    /// empty, deferred, already_pushed, migrated or failed
    pub status: String,
    pub success: bool,
    #[oai(skip_serializing_if_is_none)]
    pub migrated: Option<u32>,
    #[oai(skip_serializing_if_is_none)]
    pub failed: Option<u32>,
    #[oai(skip_serializing_if_is_none)]
    pub reason: Option<String>,
}

impl From<MigrationOutcome> for MigrationResponse {
    fn from(outcome: MigrationOutcome) -> Self {
        let success = outcome.is_success();
        let (status, migrated, failed, reason) = match outcome {
            MigrationOutcome::Empty => ("empty", None, None, None),
            MigrationOutcome::Deferred(reason) => ("deferred", None, None, Some(reason.to_string())),
            MigrationOutcome::AlreadyPushed => ("already_pushed", None, None, None),
            MigrationOutcome::Migrated { migrated, failed } => {
                ("migrated", count(migrated), count(failed), None)
            }
            MigrationOutcome::Failed(error) => ("failed", None, None, Some(error.to_string())),
        };
        Self {
            status: status.to_string(),
            success,
            migrated,
            failed,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use business::domain::cart::remote::RemoteError;
    use business::domain::cart::sync::{SkipReason, SyncError};

    fn request(price: f64) -> AddCartItemRequest {
        AddCartItemRequest {
            product_id: "p-1".to_string(),
            name: "Milk".to_string(),
            price,
            sale_price: None,
            image_url: None,
            stock: None,
            quantity: 1,
        }
    }

    #[test]
    fn should_reject_negative_price() {
        assert!(matches!(
            request(-1.0).into_snapshot(),
            Err(CartError::InvalidProduct)
        ));
    }

    #[test]
    fn should_mark_failed_sync_retryable() {
        let response: SyncResponse =
            SyncOutcome::Failed(SyncError::Remote(RemoteError::Timeout)).into();

        assert_eq!(response.status, "failed");
        assert!(!response.success);
        assert!(response.retryable);
        assert_eq!(response.reason.as_deref(), Some("sync.remote: remote.timeout"));
    }

    #[test]
    fn should_describe_skipped_sync() {
        let response: SyncResponse = SyncOutcome::Skipped(SkipReason::Guest).into();

        assert_eq!(response.status, "skipped");
        assert!(response.success);
        assert_eq!(response.reason.as_deref(), Some("sync.guest"));
    }

    #[test]
    fn should_treat_zero_migrated_as_failure() {
        let response: MigrationResponse = MigrationOutcome::Migrated {
            migrated: 0,
            failed: 2,
        }
        .into();

        assert!(!response.success);
        assert_eq!(response.failed, Some(2));
    }

    #[test]
    fn should_report_repeated_migration_as_already_pushed() {
        let response: MigrationResponse = MigrationOutcome::AlreadyPushed.into();

        assert_eq!(response.status, "already_pushed");
        assert!(response.success);
        assert_eq!(response.migrated, None);
    }
}
