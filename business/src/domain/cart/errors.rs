use crate::domain::errors::RepositoryError;

/// Errors surfaced by the local cart path. Remote faults never appear here:
/// they are reported through sync and migration outcomes instead.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("cart.invalid_quantity")]
    InvalidQuantity,
    #[error("cart.invalid_product")]
    InvalidProduct,
    #[error("cart.insufficient_stock")]
    InsufficientStock,
    #[error("cart.not_found")]
    NotFound,
    #[error("cart.cache: {0}")]
    Cache(#[from] RepositoryError),
}

impl CartError {
    /// True for errors rejected before any store was touched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CartError::InvalidQuantity | CartError::InvalidProduct | CartError::InsufficientStock
        )
    }
}
