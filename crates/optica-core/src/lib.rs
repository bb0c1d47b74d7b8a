//! # optica-core: Pure State Logic for the Optica Client
//!
//! This crate is the transition core of the Optica state layer. Every
//! mutation the client performs (logging in, toggling a wishlist item,
//! changing a cart quantity, switching language) is a pure function over
//! owned state defined here, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Optica State Layer                           │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │              Mobile Shell (TypeScript)                    │  │
//! │  │   Browse ──► Try-On ──► Wishlist ──► Cart ──► Checkout    │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │ snapshots / mutations            │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │              optica-app (domain stores)                   │  │
//! │  └────────────────────────────┬──────────────────────────────┘  │
//! │                               │                                  │
//! │  ┌────────────────────────────▼──────────────────────────────┐  │
//! │  │            ★ optica-core (THIS CRATE) ★                   │  │
//! │  │                                                           │  │
//! │  │  ┌─────────┐ ┌──────────┐ ┌───────┐ ┌───────────────┐    │  │
//! │  │  │ session │ │ wishlist │ │ cart  │ │ types/locale  │    │  │
//! │  │  └─────────┘ └──────────┘ └───────┘ └───────────────┘    │  │
//! │  │                                                           │  │
//! │  │  NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS        │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductRef, Category, Language, ...)
//! - [`session`] - Authentication session state machine
//! - [`wishlist`] - Per-user wishlist collections
//! - [`cart`] - Cart line items and quantities
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod session;
pub mod types;
pub mod validation;
pub mod wishlist;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use session::{Credentials, Session};
pub use types::{Category, CategoryCache, Language, ProductRef, TextDirection};
pub use wishlist::{Toggle, Wishlist, WishlistBook, WishlistItem, ANONYMOUS_PARTITION};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique line items allowed in a single cart.
///
/// Prevents runaway carts; the storefront checkout rejects anything larger
/// anyway, so the client enforces the same ceiling locally.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line item.
///
/// Guards against fat-finger quantities (e.g. 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
