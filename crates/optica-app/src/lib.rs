//! # optica-app: The Optica Client State Layer
//!
//! The state containers the mobile shell reads from and dispatches into:
//! authentication session, per-user wishlist, cart, locale, and category
//! cache. Each is a [`PersistedStore`](optica_store::PersistedStore) over
//! a shared durable backend, composed and wired by [`AppStores`].
//!
//! ## Module Organization
//! ```text
//! optica_app/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── bootstrap.rs    ◄─── AppStores: construction, hydration, wiring
//! ├── events.rs       ◄─── Session transition events
//! └── stores/
//!     ├── session.rs     ◄─── SessionStore
//!     ├── wishlist.rs    ◄─── WishlistStore (per-user partitions)
//!     ├── cart.rs        ◄─── CartStore (foreground reload policy)
//!     ├── locale.rs      ◄─── LocaleStore
//!     └── categories.rs  ◄─── CategoryStore
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use optica_app::{AppStores, ProductRef};
//! use optica_store::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     optica_app::init_tracing();
//!
//!     let backend = Arc::new(SqliteBackend::open("optica.db").await?);
//!     let stores = AppStores::bootstrap(backend, Some("ar-SA")).await?;
//!
//!     stores.wishlist.add(&ProductRef::new("42", "Frame A"))?;
//!     assert_eq!(stores.wishlist.count(), 1);
//!     Ok(())
//! }
//! ```

pub mod bootstrap;
pub mod events;
pub mod stores;

pub use bootstrap::{init_tracing, AppStores};
pub use events::SessionEvent;
pub use stores::{CartStore, CategoryStore, LocaleStore, SessionStore, WishlistStore};

// Re-export the domain types shell code handles through the stores.
pub use optica_core::{
    Cart, CartItem, Category, CategoryCache, Credentials, Language, ProductRef, Session,
    TextDirection, Toggle, Wishlist, WishlistItem,
};
