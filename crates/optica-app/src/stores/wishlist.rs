//! # Wishlist Store
//!
//! The current user's saved items, over the partitioned wishlist book.
//!
//! Every operation goes through the active partition; there is no code
//! path that reads another user's bucket. The bootstrap subscriber calls
//! [`WishlistStore::set_current_user`] on every session transition, so a
//! logout/login cycle with a different identity swaps the visible
//! collection instead of leaking the previous user's items.

use std::sync::{Arc, RwLock};

use tokio::sync::watch;
use tracing::debug;

use optica_core::validation::{validate_partition_key, validate_product_id};
use optica_core::{ProductRef, Toggle, ValidationError, WishlistBook, WishlistItem};
use optica_store::{Hydration, PersistedStore, Result, StorageBackend};

/// Storage key for the persisted wishlist book.
pub const WISHLIST_STORE: &str = "optica.wishlist";

/// The wishlist store: a partitioned book plus the active partition key.
#[derive(Clone)]
pub struct WishlistStore {
    inner: PersistedStore<WishlistBook>,
    active: Arc<RwLock<String>>,
}

impl WishlistStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Ok(WishlistStore {
            inner: PersistedStore::new(WISHLIST_STORE, backend)?,
            active: Arc::new(RwLock::new(WishlistBook::key_for(None))),
        })
    }

    /// Loads the persisted book. Item indexes are rebuilt during
    /// deserialization, so membership checks are valid immediately.
    pub async fn hydrate(&self) -> Hydration {
        self.inner.hydrate().await
    }

    /// Switches the active partition. `None` selects the anonymous
    /// bucket. Call sites: the bootstrap session-event subscriber.
    pub fn set_current_user(
        &self,
        user: Option<&str>,
    ) -> std::result::Result<(), ValidationError> {
        if let Some(user) = user {
            validate_partition_key(user)?;
        }
        let key = WishlistBook::key_for(user);
        debug!(partition = %key, "Wishlist partition switched");
        *self.active.write().expect("partition lock poisoned") = key;
        Ok(())
    }

    /// Saves a product. Idempotent: re-adding an existing id is a no-op.
    /// Returns whether anything was added.
    pub fn add(&self, product: &ProductRef) -> std::result::Result<bool, ValidationError> {
        validate_product_id(&product.id)?;
        let key = self.partition_key();
        let item = WishlistItem::from_product(product);
        Ok(self.inner.mutate(|book| book.partition_mut(&key).add(item)))
    }

    /// Removes a saved product by id. No-op (not an error) when absent.
    pub fn remove(&self, id: &str) -> std::result::Result<bool, ValidationError> {
        validate_product_id(id)?;
        let key = self.partition_key();
        Ok(self.inner.mutate(|book| book.partition_mut(&key).remove(id)))
    }

    /// Removes the product if saved, saves it otherwise. Exactly one of
    /// add/remove fires per call.
    pub fn toggle(&self, product: &ProductRef) -> std::result::Result<Toggle, ValidationError> {
        validate_product_id(&product.id)?;
        let key = self.partition_key();
        let item = WishlistItem::from_product(product);
        Ok(self.inner.mutate(|book| book.partition_mut(&key).toggle(item)))
    }

    /// Membership check against the active partition.
    pub fn contains(&self, id: &str) -> bool {
        let key = self.partition_key();
        self.inner
            .read(|book| book.partition(&key).is_some_and(|w| w.contains(id)))
    }

    /// Empties the active partition.
    pub fn clear(&self) {
        let key = self.partition_key();
        self.inner.mutate(|book| book.partition_mut(&key).clear());
    }

    /// The active partition's items, in insertion order.
    pub fn items(&self) -> Vec<WishlistItem> {
        let key = self.partition_key();
        self.inner
            .read(|book| book.partition(&key).map(|w| w.items.clone()).unwrap_or_default())
    }

    /// The active partition's item count.
    pub fn count(&self) -> usize {
        let key = self.partition_key();
        self.inner
            .read(|book| book.partition(&key).map_or(0, |w| w.count))
    }

    /// The active partition key (user identity or the anonymous bucket).
    pub fn partition_key(&self) -> String {
        self.active.read().expect("partition lock poisoned").clone()
    }

    /// Book snapshots for reactive shell rendering.
    pub fn subscribe(&self) -> watch::Receiver<WishlistBook> {
        self.inner.subscribe()
    }

    /// Awaitable flush for lifecycle points.
    pub async fn flush_now(&self) -> Result<()> {
        self.inner.flush_now().await
    }
}
