//! # Cart Store
//!
//! The cart across app lifecycle transitions.
//!
//! ## Reload Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    load_cart() Lifecycle                        │
//! │                                                                 │
//! │  Mount ────────► first call: plain hydration (exactly once)     │
//! │                                                                 │
//! │  Foreground ───► later calls: reload with arbitration           │
//! │                    read durable snapshot                        │
//! │                    durable.updated_at > memory.updated_at ?     │
//! │                      yes ── replace memory (external checkout   │
//! │                             wrote a newer cart)                 │
//! │                      no ─── keep memory (a local mutation is    │
//! │                             newer than the disk image)          │
//! │                                                                 │
//! │  Policy: LAST COMPLETED WRITE WINS, by the cart's updated_at    │
//! │  clock. A user editing the cart while the app foregrounds       │
//! │  never loses keystrokes to a stale disk image.                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use optica_core::validation::{validate_product_id, validate_quantity};
use optica_core::{Cart, CartItem, CoreResult, ProductRef, ValidationError};
use optica_store::{PersistedStore, Result, StorageBackend};

/// Storage key for the persisted cart.
pub const CART_STORE: &str = "optica.cart";

/// The cart store.
#[derive(Clone)]
pub struct CartStore {
    inner: PersistedStore<Cart>,
    loaded: Arc<AtomicBool>,
}

impl CartStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Ok(CartStore {
            inner: PersistedStore::new(CART_STORE, backend)?,
            loaded: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Idempotent rehydration, safe to call repeatedly.
    ///
    /// The first call (mount) hydrates unconditionally and happens exactly
    /// once; every later call is a foreground reload arbitrated by the
    /// last-completed-write-wins clock (see module docs).
    pub async fn load_cart(&self) {
        if !self.loaded.swap(true, Ordering::SeqCst) {
            self.inner.hydrate().await;
            return;
        }

        let Some(durable) = self.inner.load_durable().await else {
            return;
        };
        let durable_is_newer = self
            .inner
            .read(|cart| durable.updated_at > cart.updated_at);
        if durable_is_newer {
            debug!(cart_id = %durable.id, "Cart replaced by newer durable snapshot");
            self.inner.replace(durable);
        }
    }

    /// Adds a product or merges into an existing line.
    pub fn add_item(&self, product: &ProductRef, quantity: i64) -> CoreResult<()> {
        validate_product_id(&product.id)?;
        validate_quantity(quantity)?;
        self.inner.mutate(|cart| cart.add_item(product, quantity))
    }

    /// Sets a line's quantity: 0 removes, negative is rejected, absent
    /// ids are a no-op.
    pub fn update_quantity(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        validate_product_id(product_id)?;
        self.inner
            .mutate(|cart| cart.update_quantity(product_id, quantity))
    }

    /// Removes a line item. No-op (not an error) when absent.
    pub fn remove_item(&self, product_id: &str) -> std::result::Result<bool, ValidationError> {
        validate_product_id(product_id)?;
        Ok(self.inner.mutate(|cart| cart.remove_item(product_id)))
    }

    /// Empties the cart (checkout completed or abandoned).
    pub fn clear(&self) {
        self.inner.mutate(Cart::clear);
    }

    /// Snapshot of the current cart.
    pub fn cart(&self) -> Cart {
        self.inner.get()
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.inner.read(|cart| cart.items.clone())
    }

    pub fn item_count(&self) -> usize {
        self.inner.read(Cart::item_count)
    }

    pub fn total_quantity(&self) -> i64 {
        self.inner.read(Cart::total_quantity)
    }

    /// Cart snapshots for reactive shell rendering.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.subscribe()
    }

    /// Awaitable flush for lifecycle points.
    pub async fn flush_now(&self) -> Result<()> {
        self.inner.flush_now().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use optica_store::MemoryBackend;

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new())
    }

    fn frame(id: &str, price_cents: i64) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            name: format!("Frame {id}"),
            handle: None,
            image_url: None,
            price_cents: Some(price_cents),
        }
    }

    /// Serializes `cart` straight into the backend, simulating an
    /// external writer (webview checkout) touching durable storage.
    fn seed_cart(backend: &MemoryBackend, cart: &Cart) {
        backend.seed(CART_STORE, serde_json::to_string(cart).unwrap());
    }

    /// Lets any scheduled flushes complete before the test proceeds.
    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_mount_load_restores_persisted_cart() {
        let backend = backend();

        let store = CartStore::new(backend.clone() as Arc<dyn StorageBackend>).unwrap();
        store.load_cart().await;
        store.add_item(&frame("1", 4999), 2).unwrap();
        store.flush_now().await.unwrap();

        let store = CartStore::new(backend as Arc<dyn StorageBackend>).unwrap();
        store.load_cart().await;
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_foreground_reload_prefers_newer_durable_snapshot() {
        let backend = backend();
        let store = CartStore::new(backend.clone() as Arc<dyn StorageBackend>).unwrap();
        store.load_cart().await;
        store.add_item(&frame("1", 4999), 1).unwrap();
        settle().await;

        // External checkout writes a cart with a newer clock.
        let mut external = Cart::new();
        external.add_item(&frame("2", 9999), 3).unwrap();
        external.updated_at = Utc::now() + Duration::seconds(10);
        seed_cart(&backend, &external);

        store.load_cart().await;

        let cart = store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, "2");
    }

    #[tokio::test]
    async fn test_foreground_reload_keeps_newer_local_mutation() {
        let backend = backend();
        let store = CartStore::new(backend.clone() as Arc<dyn StorageBackend>).unwrap();
        store.load_cart().await;

        // Stale durable image from before the local edit.
        let mut stale = Cart::new();
        stale.add_item(&frame("9", 100), 1).unwrap();
        stale.updated_at = Utc::now() - Duration::seconds(60);
        seed_cart(&backend, &stale);

        store.add_item(&frame("1", 4999), 2).unwrap();
        store.load_cart().await;

        // Last completed write wins: the local cart is newer.
        let cart = store.cart();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].product_id, "1");
    }

    #[tokio::test]
    async fn test_quantity_floor_is_enforced() {
        let store = CartStore::new(backend()).unwrap();
        store.load_cart().await;
        store.add_item(&frame("1", 4999), 2).unwrap();

        // Zero removes the line.
        store.update_quantity("1", 0).unwrap();
        assert_eq!(store.item_count(), 0);

        // Negative is rejected; nothing bad persists.
        store.add_item(&frame("1", 4999), 2).unwrap();
        assert!(store.update_quantity("1", -4).is_err());
        assert_eq!(store.cart().items[0].quantity, 2);

        // add_item can never introduce a non-positive quantity either.
        assert!(store.add_item(&frame("2", 100), 0).is_err());
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let store = CartStore::new(backend()).unwrap();
        store.load_cart().await;
        assert!(!store.remove_item("missing").unwrap());
    }

    #[tokio::test]
    async fn test_clear_resets_cart() {
        let store = CartStore::new(backend()).unwrap();
        store.load_cart().await;

        store.add_item(&frame("1", 4999), 2).unwrap();
        let old_id = store.cart().id;
        store.clear();

        assert_eq!(store.item_count(), 0);
        assert_ne!(store.cart().id, old_id);
    }

    #[tokio::test]
    async fn test_invalid_product_id_rejected() {
        let store = CartStore::new(backend()).unwrap();
        store.load_cart().await;
        assert!(store.add_item(&frame("", 100), 1).is_err());
    }
}
