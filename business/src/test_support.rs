//! Stateful in-memory doubles for the cart ports, shared by unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::domain::cart::connectivity::ConnectivityMonitor;
use crate::domain::cart::model::{CartItem, ProductSnapshot};
use crate::domain::cart::remote::{RemoteCartClient, RemoteCartItem, RemoteError};
use crate::domain::cart::store::LocalCartStore;
use crate::domain::errors::RepositoryError;
use crate::domain::logger::Logger;
use crate::domain::session::SessionProvider;
use crate::domain::shared::clock::Clock;
use crate::domain::shared::value_objects::{CartItemId, ProductId, UserId};

pub struct NullLogger;

impl Logger for NullLogger {
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
}

pub fn null_logger() -> Arc<dyn Logger> {
    Arc::new(NullLogger)
}

pub fn product(id: &str, name: &str, price: f64) -> ProductSnapshot {
    ProductSnapshot::new(ProductId::new(id), name.to_string(), price).unwrap()
}

#[derive(Default)]
pub struct FakeCartStore {
    items: Mutex<Vec<CartItem>>,
    broken: AtomicBool,
}

impl FakeCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_broken(&self, broken: bool) {
        self.broken.store(broken, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<CartItem> {
        self.items.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(RepositoryError::Corrupted);
        }
        Ok(())
    }
}

#[async_trait]
impl LocalCartStore for FakeCartStore {
    async fn get_all(&self) -> Result<Vec<CartItem>, RepositoryError> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn get_by_id(&self, id: &CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        self.check()?;
        Ok(self.snapshot().into_iter().find(|i| &i.id == id))
    }

    async fn find_by_product_id(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        self.check()?;
        Ok(self
            .snapshot()
            .into_iter()
            .find(|i| &i.product.id == product_id))
    }

    async fn save(&self, item: &CartItem) -> Result<(), RepositoryError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(())
    }

    async fn delete(&self, id: &CartItemId) -> Result<bool, RepositoryError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|i| &i.id != id);
        Ok(items.len() != before)
    }

    async fn clear(&self) -> Result<u64, RepositoryError> {
        self.check()?;
        let mut items = self.items.lock().unwrap();
        let removed = items.len() as u64;
        items.clear();
        Ok(removed)
    }

    async fn item_count(&self) -> Result<u64, RepositoryError> {
        self.check()?;
        Ok(self.snapshot().iter().map(|i| u64::from(i.quantity)).sum())
    }

    async fn total_price(&self) -> Result<f64, RepositoryError> {
        self.check()?;
        Ok(self.snapshot().iter().map(CartItem::line_total).sum())
    }

    async fn contains_product(&self, product_id: &ProductId) -> Result<bool, RepositoryError> {
        self.check()?;
        Ok(self.snapshot().iter().any(|i| &i.product.id == product_id))
    }
}

/// Remote cart double keeping one cart per user.
#[derive(Default)]
pub struct FakeRemoteCart {
    items: Mutex<Vec<(UserId, RemoteCartItem)>>,
    rejected_products: Mutex<HashSet<ProductId>>,
    failing: Mutex<Option<RemoteError>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
}

impl FakeRemoteCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, user_id: &UserId, product_id: &str, quantity: u32) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.items.lock().unwrap().push((
            user_id.clone(),
            RemoteCartItem {
                id: format!("remote-{}", id),
                product_id: ProductId::new(product_id),
                quantity,
            },
        ));
    }

    /// Every call fails with `error` until reset with `None`.
    pub fn fail_with(&self, error: Option<RemoteError>) {
        *self.failing.lock().unwrap() = error;
    }

    pub fn reject_product(&self, product_id: &str) {
        self.rejected_products
            .lock()
            .unwrap()
            .insert(ProductId::new(product_id));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (product id, quantity) pairs for a user, sorted by product id.
    pub fn contents(&self, user_id: &UserId) -> Vec<(String, u32)> {
        let mut contents: Vec<(String, u32)> = self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, item)| (item.product_id.to_string(), item.quantity))
            .collect();
        contents.sort();
        contents
    }

    fn enter(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failing.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteCartClient for FakeRemoteCart {
    async fn get_items(&self, user_id: &UserId) -> Result<Vec<RemoteCartItem>, RemoteError> {
        self.enter()?;
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| owner == user_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn add_item(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        self.enter()?;
        if self.rejected_products.lock().unwrap().contains(product_id) {
            return Err(RemoteError::Rejected { status: 409 });
        }
        let item = RemoteCartItem {
            id: format!("remote-{}", self.next_id.fetch_add(1, Ordering::SeqCst)),
            product_id: product_id.clone(),
            quantity,
        };
        self.items
            .lock()
            .unwrap()
            .push((user_id.clone(), item.clone()));
        Ok(item)
    }

    async fn remove_item(&self, user_id: &UserId, item_id: &str) -> Result<(), RemoteError> {
        self.enter()?;
        self.items
            .lock()
            .unwrap()
            .retain(|(owner, item)| !(owner == user_id && item.id == item_id));
        Ok(())
    }

    async fn update_quantity(
        &self,
        user_id: &UserId,
        item_id: &str,
        quantity: u32,
    ) -> Result<RemoteCartItem, RemoteError> {
        self.enter()?;
        let mut items = self.items.lock().unwrap();
        let (_, item) = items
            .iter_mut()
            .find(|(owner, item)| owner == user_id && item.id == item_id)
            .ok_or(RemoteError::Rejected { status: 404 })?;
        item.quantity = quantity;
        Ok(item.clone())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), RemoteError> {
        self.enter()?;
        self.items
            .lock()
            .unwrap()
            .retain(|(owner, _)| owner != user_id);
        Ok(())
    }
}

pub struct FakeConnectivity {
    online: AtomicBool,
}

impl FakeConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectivityMonitor for FakeConnectivity {
    async fn is_connected(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub struct FixedSession(pub Option<UserId>);

impl SessionProvider for FixedSession {
    fn current_user(&self) -> Option<UserId> {
        self.0.clone()
    }
}
