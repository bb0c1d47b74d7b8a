//! # Wishlist Collections
//!
//! Saved-item collections, partitioned per user identity.
//!
//! ## Partitioning
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       WishlistBook                              │
//! │                                                                 │
//! │   "anonymous" ──► Wishlist [ frame-42, frame-7 ]                │
//! │   "user-a"    ──► Wishlist [ frame-42 ]                         │
//! │   "user-b"    ──► Wishlist [ ]                                  │
//! │                                                                 │
//! │   One partition is visible at a time (the active user's).       │
//! │   A logout/login cycle with a different identity swaps the      │
//! │   visible collection; it never leaks the previous user's items. │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id within a partition
//! - Insertion order is preserved for display
//! - `count` equals `items.len()` after every mutation; the two are
//!   recomputed together, never one without the other

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::ProductRef;

/// Partition key used while no user is authenticated.
pub const ANONYMOUS_PARTITION: &str = "anonymous";

// =============================================================================
// Wishlist Item
// =============================================================================

/// A saved product reference. Display fields are frozen at save time so a
/// wishlist row renders without refetching the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WishlistItem {
    /// Product identity. Uniqueness key within a partition.
    pub id: String,

    /// Display name at save time.
    pub name: String,

    /// Product handle at save time.
    pub handle: Option<String>,

    /// Primary image at save time.
    pub image_url: Option<String>,

    /// Price in minor units at save time (display only).
    pub price_cents: Option<i64>,

    /// When the item was saved.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl WishlistItem {
    /// Creates a wishlist item from a product reference, freezing its
    /// display fields.
    pub fn from_product(product: &ProductRef) -> Self {
        WishlistItem {
            id: product.id.clone(),
            name: product.name.clone(),
            handle: product.handle.clone(),
            image_url: product.image_url.clone(),
            price_cents: product.price_cents,
            added_at: Utc::now(),
        }
    }
}

// =============================================================================
// Wishlist (one partition)
// =============================================================================

/// Outcome of a toggle: exactly one of add/remove fires per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// A single user's saved-item collection.
///
/// `items` keeps insertion order for display; the id index gives O(1)
/// membership checks and is rebuilt on deserialization rather than
/// persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Wishlist {
    /// Saved items in insertion order.
    pub items: Vec<WishlistItem>,

    /// Item count; always equals `items.len()`.
    pub count: usize,

    /// Identity index for O(1) membership checks. Derived from `items`.
    #[serde(skip)]
    index: HashSet<String>,
}

impl Wishlist {
    /// Adds an item if its product id is not already present.
    ///
    /// ## Behavior
    /// - Already present: no-op (idempotent), returns `false`
    /// - Absent: appends, preserving insertion order, returns `true`
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.index.contains(&item.id) {
            return false;
        }
        self.index.insert(item.id.clone());
        self.items.push(item);
        self.count = self.items.len();
        true
    }

    /// Removes an item by product id. No-op (not an error) when absent.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.index.remove(id) {
            return false;
        }
        self.items.retain(|i| i.id != id);
        self.count = self.items.len();
        true
    }

    /// Removes the item if present, adds it if absent.
    pub fn toggle(&mut self, item: WishlistItem) -> Toggle {
        if self.contains(&item.id) {
            self.remove(&item.id);
            Toggle::Removed
        } else {
            self.add(item);
            Toggle::Added
        }
    }

    /// Membership check by product id. O(1) via the identity index.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Empties the collection and resets the count to zero.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.count = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuilds the identity index and count from `items`.
    fn rebuild(&mut self) {
        self.index = self.items.iter().map(|i| i.id.clone()).collect();
        self.count = self.items.len();
    }
}

// Deserialization rebuilds the derived index and re-normalizes the count,
// so a hand-edited or stale blob cannot break the count invariant.
impl<'de> Deserialize<'de> for Wishlist {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Repr {
            #[serde(default)]
            items: Vec<WishlistItem>,
            #[serde(default)]
            #[allow(dead_code)]
            count: usize,
        }

        let repr = Repr::deserialize(deserializer)?;
        let mut wishlist = Wishlist {
            items: repr.items,
            count: 0,
            index: HashSet::new(),
        };
        wishlist.rebuild();
        Ok(wishlist)
    }
}

// =============================================================================
// Wishlist Book (all partitions)
// =============================================================================

/// All wishlist partitions, keyed by user identity (or the anonymous
/// bucket). The whole book is persisted as one value; the active
/// partition is a runtime concern of the wishlist store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WishlistBook {
    pub partitions: BTreeMap<String, Wishlist>,
}

impl WishlistBook {
    /// The partition key for a user identity; `None` maps to the
    /// anonymous bucket.
    pub fn key_for(user: Option<&str>) -> String {
        user.unwrap_or(ANONYMOUS_PARTITION).to_string()
    }

    /// Read access to a partition. Absent partitions read as empty.
    pub fn partition(&self, key: &str) -> Option<&Wishlist> {
        self.partitions.get(key)
    }

    /// Write access to a partition, creating it empty on first use.
    pub fn partition_mut(&mut self, key: &str) -> &mut Wishlist {
        self.partitions.entry(key.to_string()).or_default()
    }
}
