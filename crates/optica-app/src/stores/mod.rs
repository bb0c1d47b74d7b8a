//! # Domain Stores
//!
//! One store per slice of client state. Each store owns its slice
//! exclusively and persists under its own storage key, so concurrent
//! flushes never collide.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Store → Storage Key                         │
//! │                                                                 │
//! │  SessionStore   ──► "optica.session"                            │
//! │  WishlistStore  ──► "optica.wishlist"                           │
//! │  CartStore      ──► "optica.cart"                               │
//! │  LocaleStore    ──► "optica.locale"                             │
//! │  CategoryStore  ──► "optica.categories"                         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod categories;
mod locale;
mod session;
mod wishlist;

pub use cart::{CartStore, CART_STORE};
pub use categories::{CategoryStore, CATEGORY_STORE};
pub use locale::{LocaleStore, LOCALE_STORE};
pub use session::{SessionStore, SESSION_STORE};
pub use wishlist::{WishlistStore, WISHLIST_STORE};
