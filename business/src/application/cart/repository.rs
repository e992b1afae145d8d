use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::cart::sync_state::SyncState;
use crate::domain::cart::errors::CartError;
use crate::domain::cart::model::{Cart, CartItem, validate_quantity};
use crate::domain::cart::repository::{AddCartItemParams, CartRepository, UpdateQuantityParams};
use crate::domain::cart::store::LocalCartStore;
use crate::domain::cart::sync::{CartSynchronizer, MigrationOutcome, SyncOutcome};
use crate::domain::logger::Logger;
use crate::domain::shared::clock::Clock;
use crate::domain::shared::value_objects::{CartItemId, ProductId};

/// Local-first cart. Every call is answered from the local store; the
/// remote mirror is only touched through the synchronizer.
pub struct CartRepositoryImpl {
    store: Arc<dyn LocalCartStore>,
    synchronizer: Arc<dyn CartSynchronizer>,
    state: Arc<SyncState>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Logger>,
    // Serializes read-modify-write sequences on cart lines.
    write_lock: Mutex<()>,
}

impl CartRepositoryImpl {
    pub fn new(
        store: Arc<dyn LocalCartStore>,
        synchronizer: Arc<dyn CartSynchronizer>,
        state: Arc<SyncState>,
        clock: Arc<dyn Clock>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            store,
            synchronizer,
            state,
            clock,
            logger,
            write_lock: Mutex::new(()),
        }
    }

    fn touch(&self) {
        self.state.record_activity(self.clock.now());
    }
}

#[async_trait]
impl CartRepository for CartRepositoryImpl {
    async fn get_items(&self) -> Result<Vec<CartItem>, CartError> {
        self.touch();
        let items = self.store.get_all().await?;
        self.logger
            .debug(&format!("Retrieved {} cart lines", items.len()));
        Ok(items)
    }

    async fn get_cart(&self) -> Result<Cart, CartError> {
        self.touch();
        Ok(Cart::new(self.store.get_all().await?))
    }

    async fn add_item(&self, params: AddCartItemParams) -> Result<CartItem, CartError> {
        self.touch();
        let quantity = validate_quantity(params.quantity)?;
        params.product.validate()?;

        let _guard = self.write_lock.lock().await;
        let item = match self.store.find_by_product_id(&params.product.id).await? {
            Some(existing) => existing.merged_with(params.product, quantity)?,
            None => CartItem::new(params.product, i64::from(quantity))?,
        };
        self.store.save(&item).await?;
        self.state.record_local_change();

        self.logger.info(&format!(
            "Cart line {} now holds {} x {}",
            item.id, item.quantity, item.product.id
        ));
        Ok(item)
    }

    async fn remove_item(&self, id: &CartItemId) -> Result<bool, CartError> {
        self.touch();
        let _guard = self.write_lock.lock().await;
        let removed = self.store.delete(id).await?;
        if removed {
            self.state.record_local_change();
            self.logger.info(&format!("Cart line removed: {}", id));
        } else {
            self.logger
                .debug(&format!("Cart line {} not found, nothing removed", id));
        }
        Ok(removed)
    }

    async fn update_quantity(
        &self,
        params: UpdateQuantityParams,
    ) -> Result<CartItem, CartError> {
        self.touch();
        let quantity = validate_quantity(params.quantity)?;

        let _guard = self.write_lock.lock().await;
        let existing = self
            .store
            .get_by_id(&params.id)
            .await?
            .ok_or(CartError::NotFound)?;
        let updated = existing.with_quantity(quantity)?;
        self.store.save(&updated).await?;
        self.state.record_local_change();

        self.logger.info(&format!(
            "Cart line {} quantity set to {}",
            updated.id, updated.quantity
        ));
        Ok(updated)
    }

    async fn clear(&self) -> Result<bool, CartError> {
        self.touch();
        let _guard = self.write_lock.lock().await;
        let removed = self.store.clear().await?;
        if removed > 0 {
            self.state.record_local_change();
        }
        self.logger
            .info(&format!("Cart cleared ({} lines removed)", removed));
        Ok(true)
    }

    async fn get_total_price(&self) -> Result<f64, CartError> {
        self.touch();
        Ok(self.store.total_price().await?)
    }

    async fn get_item_count(&self) -> Result<u64, CartError> {
        self.touch();
        Ok(self.store.item_count().await?)
    }

    async fn is_in_cart(&self, product_id: &ProductId) -> Result<bool, CartError> {
        self.touch();
        Ok(self.store.contains_product(product_id).await?)
    }

    async fn sync_with_remote(&self) -> SyncOutcome {
        self.touch();
        let outcome = self.synchronizer.sync().await;
        if let SyncOutcome::Failed(e) = &outcome {
            self.logger.warn(&format!(
                "Explicit cart sync failed, local cart still usable: {}",
                e
            ));
        }
        outcome
    }

    async fn migrate_guest_cart_to_authenticated_user(&self) -> MigrationOutcome {
        self.touch();
        self.synchronizer.migrate_guest_cart().await
    }

    fn dispose(&self) {
        if !self.state.is_stopped() {
            self.state.stop();
            self.logger.info("Cart background sync stopped");
        }
    }
}
