//! # Domain Types
//!
//! Shared domain types for the Optica state layer.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Types                             │
//! │                                                                 │
//! │  ┌────────────────┐  ┌────────────────┐  ┌──────────────────┐   │
//! │  │   ProductRef   │  │    Category    │  │    Language      │   │
//! │  │  ────────────  │  │  ────────────  │  │  ──────────────  │   │
//! │  │  id            │  │  id            │  │  En | Ar | Fr    │   │
//! │  │  name          │  │  title         │  │  direction() ──► │   │
//! │  │  handle?       │  │  handle?/url?  │  │  Ltr | Rtl       │   │
//! │  │  image_url?    │  │  items? (tree) │  └──────────────────┘   │
//! │  │  price_cents?  │  └────────────────┘                         │
//! │  └────────────────┘                                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All types serialize with camelCase field names; the persisted blobs
//! are shared with the TypeScript shell, and `ts-rs` exports the matching
//! declarations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product Reference
// =============================================================================

/// A reference to a catalog product as held by the client state layer.
///
/// The catalog itself lives behind a network collaborator; the state layer
/// only keeps the identity plus the display fields needed to render a
/// wishlist or cart row without refetching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductRef {
    /// Catalog identity. Uniqueness key for wishlist and cart collections.
    pub id: String,

    /// Display name shown in list rows ("Frame A").
    pub name: String,

    /// URL-safe product handle, when the catalog supplies one.
    pub handle: Option<String>,

    /// Primary image for list rows.
    pub image_url: Option<String>,

    /// Price in minor units at the time the reference was captured.
    /// Display-only; checkout reprices server-side.
    pub price_cents: Option<i64>,
}

impl ProductRef {
    /// Creates a minimal reference with just identity and name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        ProductRef {
            id: id.into(),
            name: name.into(),
            handle: None,
            image_url: None,
            price_cents: None,
        }
    }
}

// =============================================================================
// Category Tree
// =============================================================================

/// A node in the storefront category tree.
///
/// `items` is absent on leaves. The tree is built from owned values, so a
/// cycle cannot be represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub handle: Option<String>,
    pub url: Option<String>,

    /// Child categories; `None` for leaf nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Category>>,
}

impl Category {
    /// Creates a leaf category.
    pub fn leaf(id: impl Into<String>, title: impl Into<String>) -> Self {
        Category {
            id: id.into(),
            title: title.into(),
            handle: None,
            url: None,
            items: None,
        }
    }

    /// Total number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        1 + self
            .items
            .iter()
            .flatten()
            .map(Category::node_count)
            .sum::<usize>()
    }

    /// Depth-first search by category id.
    pub fn find(&self, id: &str) -> Option<&Category> {
        if self.id == id {
            return Some(self);
        }
        self.items.iter().flatten().find_map(|c| c.find(id))
    }
}

/// The cached category tree, replaced atomically by the data-fetch
/// collaborator and read by navigation for offline/instant reuse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CategoryCache {
    /// Top-level categories in display order.
    pub categories: Vec<Category>,

    /// When the tree was last replaced; `None` when the cache is empty.
    #[ts(as = "Option<String>")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl CategoryCache {
    /// Whether the cache currently holds a tree.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total node count across all roots.
    pub fn node_count(&self) -> usize {
        self.categories.iter().map(Category::node_count).sum()
    }
}

// =============================================================================
// Language & Text Direction
// =============================================================================

/// Supported storefront languages.
///
/// Exactly one is active at a time; text direction is derived from the
/// code, never stored separately.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Language {
    /// English (baseline).
    #[default]
    En,
    /// Arabic.
    Ar,
    /// French.
    Fr,
}

/// Reading direction derived from the active language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl Language {
    /// The BCP 47 primary subtag for this language.
    pub const fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
            Language::Fr => "fr",
        }
    }

    /// Parses a supported language from an exact code ("en", "ar", "fr").
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en" => Some(Language::En),
            "ar" => Some(Language::Ar),
            "fr" => Some(Language::Fr),
            _ => None,
        }
    }

    /// Derives a supported language from a device-reported locale tag
    /// ("ar-SA", "en_US", "fr"). Only the primary subtag is considered;
    /// unsupported tags yield `None` and callers fall back to [`Language::En`].
    pub fn from_device_locale(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        Self::from_code(&primary)
    }

    /// Reading direction for this language.
    pub const fn direction(&self) -> TextDirection {
        match self {
            Language::Ar => TextDirection::Rtl,
            Language::En | Language::Fr => TextDirection::Ltr,
        }
    }

    /// Whether this language renders right-to-left.
    pub const fn is_rtl(&self) -> bool {
        matches!(self.direction(), TextDirection::Rtl)
    }
}
