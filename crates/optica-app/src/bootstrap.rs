//! # Application Bootstrap
//!
//! Constructs and wires the state layer at application start.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Application Startup                          │
//! │                                                                 │
//! │  1. Construct stores over one shared backend ─────────────────► │
//! │     Each store persists under its own key; no collisions        │
//! │                                                                 │
//! │  2. check_auth_status() ──────────────────────────────────────► │
//! │     Hydrate the session; LoggedOut if nothing valid persisted   │
//! │                                                                 │
//! │  3. Hydrate wishlist, then align its partition with the         │
//! │     hydrated session (after the session settles, so the old     │
//! │     user's items are never visible under a cleared session)     │
//! │                                                                 │
//! │  4. Locale init (persisted → device locale → baseline),         │
//! │     category cache hydration                                    │
//! │                                                                 │
//! │  5. Mount load_cart() ────────────────────────────────────────► │
//! │                                                                 │
//! │  6. Spawn the session-event subscriber: every LoggedIn /        │
//! │     LoggedOut transition re-partitions the wishlist             │
//! │     deterministically                                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A storage backend that never resolves leaves every store at its
//! default: degraded but safe, never a crash.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use optica_store::{StorageBackend, StoreError};

use crate::events::SessionEvent;
use crate::stores::{CartStore, CategoryStore, LocaleStore, SessionStore, WishlistStore};

/// The state layer handed to the presentation shell.
///
/// Created once at application start and torn down never; collections
/// reset only through their explicit `clear` operations.
#[derive(Clone)]
pub struct AppStores {
    pub session: SessionStore,
    pub wishlist: WishlistStore,
    pub cart: CartStore,
    pub locale: LocaleStore,
    pub categories: CategoryStore,
}

impl AppStores {
    /// Cold-start construction and hydration over a shared backend.
    ///
    /// `device_locale` is the device-reported locale tag supplied by the
    /// localization collaborator, used only when no language was
    /// persisted.
    pub async fn bootstrap(
        backend: Arc<dyn StorageBackend>,
        device_locale: Option<&str>,
    ) -> Result<Self, StoreError> {
        let session = SessionStore::new(Arc::clone(&backend))?;
        let wishlist = WishlistStore::new(Arc::clone(&backend))?;
        let cart = CartStore::new(Arc::clone(&backend))?;
        let locale = LocaleStore::new(Arc::clone(&backend))?;
        let categories = CategoryStore::new(backend)?;

        // Session first: the wishlist partition depends on it.
        session.check_auth_status().await;
        wishlist.hydrate().await;
        let user = session.user_id();
        if let Err(e) = wishlist.set_current_user(user.as_deref()) {
            warn!(error = %e, "Persisted user id unusable as wishlist partition; using anonymous bucket");
        }

        locale.init(device_locale).await;
        categories.hydrate().await;
        cart.load_cart().await;

        let stores = AppStores {
            session,
            wishlist,
            cart,
            locale,
            categories,
        };
        stores.spawn_session_subscriber();

        info!(
            logged_in = stores.session.is_logged_in(),
            language = stores.locale.language().code(),
            "State layer bootstrapped"
        );
        Ok(stores)
    }

    /// App returned to the foreground: reconcile the cart with any
    /// external durable writes (e.g. a webview-driven checkout).
    pub async fn on_foreground(&self) {
        self.cart.load_cart().await;
    }

    /// App moving to the background: flush everything while the process
    /// still has time. Failures are logged; memory stays authoritative.
    pub async fn on_background(&self) {
        for (name, result) in [
            ("session", self.session.flush_now().await),
            ("wishlist", self.wishlist.flush_now().await),
            ("cart", self.cart.flush_now().await),
            ("locale", self.locale.flush_now().await),
            ("categories", self.categories.flush_now().await),
        ] {
            if let Err(e) = result {
                warn!(store = name, error = %e, "Background flush failed");
            }
        }
    }

    // The explicit cross-store wiring: session transitions drive the
    // wishlist partition, independent of shell call ordering.
    fn spawn_session_subscriber(&self) {
        let mut rx = self.session.subscribe_events();
        let wishlist = self.wishlist.clone();

        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(SessionEvent::LoggedIn { user_id }) => {
                        if let Err(e) = wishlist.set_current_user(Some(&user_id)) {
                            warn!(error = %e, "Session user id unusable as wishlist partition");
                        }
                    }
                    Ok(SessionEvent::LoggedOut) => {
                        let _ = wishlist.set_current_user(None);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Only the latest transition matters; resync from
                        // the session snapshot would be equivalent.
                        warn!(skipped, "Session event subscriber lagged");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// Called once by the embedding shell at process start.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - show store operations
/// - `RUST_LOG=optica=trace` - trace for optica crates only
/// - Default: info
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,optica=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use optica_core::{Credentials, Language, ProductRef};
    use optica_store::MemoryBackend;

    fn creds(user: &str) -> Credentials {
        Credentials {
            token: format!("tok-{user}"),
            refresh_token: format!("ref-{user}"),
            user_id: user.to_string(),
        }
    }

    fn frame(id: &str, name: &str) -> ProductRef {
        ProductRef::new(id, name)
    }

    /// Lets spawned tasks (flushes, the session subscriber) run.
    async fn settle() {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_bootstrap_over_empty_storage_yields_defaults() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = AppStores::bootstrap(backend, None).await.unwrap();

        assert!(!stores.session.is_logged_in());
        assert_eq!(stores.wishlist.count(), 0);
        assert_eq!(stores.cart.item_count(), 0);
        assert_eq!(stores.locale.language(), Language::En);
        assert!(stores.categories.is_empty());
    }

    #[tokio::test]
    async fn test_session_transitions_drive_wishlist_partition() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = AppStores::bootstrap(backend, None).await.unwrap();

        // User A logs in and saves two frames.
        stores.session.authenticate(creds("user-a"));
        settle().await;
        stores.wishlist.add(&frame("p1", "P1")).unwrap();
        stores.wishlist.add(&frame("p2", "P2")).unwrap();
        assert_eq!(stores.wishlist.count(), 2);

        // Logout: the anonymous bucket is visible, not A's items.
        stores.session.unauthenticate();
        settle().await;
        assert_eq!(stores.wishlist.count(), 0);

        // User B logs in: still nothing leaked.
        stores.session.authenticate(creds("user-b"));
        settle().await;
        assert!(stores.wishlist.items().is_empty());

        // A returns: the saved frames are back, in order.
        stores.session.authenticate(creds("user-a"));
        settle().await;
        let ids: Vec<String> = stores.wishlist.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[tokio::test]
    async fn test_bootstrap_aligns_partition_with_persisted_session() {
        let backend = Arc::new(MemoryBackend::new());

        {
            let stores = AppStores::bootstrap(
                backend.clone() as Arc<dyn StorageBackend>,
                None,
            )
            .await
            .unwrap();
            stores.session.authenticate(creds("user-a"));
            settle().await;
            stores.wishlist.add(&frame("p1", "P1")).unwrap();
            stores.on_background().await;
        }

        // Restart: the hydrated session selects A's partition before the
        // shell reads anything.
        let stores = AppStores::bootstrap(backend, None).await.unwrap();
        assert!(stores.session.is_logged_in());
        assert_eq!(stores.wishlist.partition_key(), "user-a");
        assert!(stores.wishlist.contains("p1"));
    }

    #[tokio::test]
    async fn test_language_survives_restart_with_direction() {
        let backend = Arc::new(MemoryBackend::new());

        {
            let stores = AppStores::bootstrap(
                backend.clone() as Arc<dyn StorageBackend>,
                None,
            )
            .await
            .unwrap();
            stores.locale.set_language(Language::Ar);
            stores.on_background().await;
        }

        let stores = AppStores::bootstrap(backend, None).await.unwrap();
        assert_eq!(stores.locale.language(), Language::Ar);
        assert!(stores.locale.is_rtl());
    }

    #[tokio::test]
    async fn test_foreground_reload_is_safe_without_external_changes() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = AppStores::bootstrap(backend, None).await.unwrap();

        stores.cart.add_item(&frame("1", "Frame 1"), 1).unwrap();
        stores.on_foreground().await;

        // Nothing external wrote; the local cart is untouched.
        assert_eq!(stores.cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_write_failures_never_surface_to_the_shell() {
        let backend = Arc::new(MemoryBackend::new());
        let stores = AppStores::bootstrap(
            backend.clone() as Arc<dyn StorageBackend>,
            None,
        )
        .await
        .unwrap();

        backend.set_fail_writes(true);

        // Mutations keep working against in-memory state.
        stores.wishlist.add(&frame("42", "Frame A")).unwrap();
        stores.cart.add_item(&frame("42", "Frame A"), 1).unwrap();
        settle().await;
        assert_eq!(stores.wishlist.count(), 1);
        assert_eq!(stores.cart.item_count(), 1);

        // Once the medium recovers, the next flush carries the state.
        backend.set_fail_writes(false);
        stores.on_background().await;
        assert!(backend.raw(crate::stores::WISHLIST_STORE).is_some());
        assert!(backend.raw(crate::stores::CART_STORE).is_some());
    }
}
