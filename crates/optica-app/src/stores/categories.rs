//! # Category Cache Store
//!
//! A read-through cache for the storefront category tree. The
//! data-fetch collaborator replaces the whole tree atomically after a
//! successful fetch; navigation reads it for offline/instant reuse.
//! This store never fetches anything itself.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use optica_core::{Category, CategoryCache};
use optica_store::{Hydration, PersistedStore, Result, StorageBackend};

/// Storage key for the persisted category tree.
pub const CATEGORY_STORE: &str = "optica.categories";

/// The category cache store.
#[derive(Clone)]
pub struct CategoryStore {
    inner: PersistedStore<CategoryCache>,
}

impl CategoryStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Ok(CategoryStore {
            inner: PersistedStore::new(CATEGORY_STORE, backend)?,
        })
    }

    /// Loads the persisted tree, if any.
    pub async fn hydrate(&self) -> Hydration {
        self.inner.hydrate().await
    }

    /// Replaces the entire cached tree atomically. There are no
    /// partial-merge semantics.
    pub fn set_categories(&self, categories: Vec<Category>) {
        debug!(roots = categories.len(), "Category tree replaced");
        self.inner.mutate(|cache| {
            cache.categories = categories;
            cache.fetched_at = Some(chrono::Utc::now());
        });
    }

    /// Empties the cache.
    pub fn clear_categories(&self) {
        self.inner.mutate(|cache| *cache = CategoryCache::default());
    }

    /// Snapshot of the cached tree.
    pub fn categories(&self) -> Vec<Category> {
        self.inner.read(|cache| cache.categories.clone())
    }

    /// Full cache snapshot including the fetch timestamp.
    pub fn cache(&self) -> CategoryCache {
        self.inner.get()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read(CategoryCache::is_empty)
    }

    /// Cache snapshots for reactive shell rendering.
    pub fn subscribe(&self) -> watch::Receiver<CategoryCache> {
        self.inner.subscribe()
    }

    /// Awaitable flush for lifecycle points.
    pub async fn flush_now(&self) -> Result<()> {
        self.inner.flush_now().await
    }
}
