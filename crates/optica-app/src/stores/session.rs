//! # Session Store
//!
//! Holds the authentication session and broadcasts its transitions.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Session Store Lifecycle                      │
//! │                                                                 │
//! │  App start ──► check_auth_status() ──► hydrate persisted        │
//! │                 (once-guarded)          session, or LoggedOut   │
//! │                                                                 │
//! │  Login flow ──► authenticate(creds) ──► LoggedIn + persist      │
//! │                                          + LoggedIn event       │
//! │                                                                 │
//! │  Logout ──────► unauthenticate() ─────► LoggedOut + persist     │
//! │                                          + LoggedOut event      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Token refresh and expiry are external collaborators; the store holds
//! whatever credential values it is given.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tracing::debug;

use optica_core::{Credentials, Session};
use optica_store::{PersistedStore, Result, StorageBackend};

use crate::events::{session_event_channel, SessionEvent};

/// Storage key for the persisted session.
pub const SESSION_STORE: &str = "optica.session";

/// The authentication session store.
#[derive(Clone)]
pub struct SessionStore {
    inner: PersistedStore<Session>,
    events: broadcast::Sender<SessionEvent>,
    checked: Arc<AtomicBool>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self> {
        Ok(SessionStore {
            inner: PersistedStore::new(SESSION_STORE, backend)?,
            events: session_event_channel(),
            checked: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Bootstrap hook: re-hydrates the session from durable storage and
    /// leaves it LoggedOut when nothing valid was persisted.
    ///
    /// Once-guarded: only the first call hydrates, so a late duplicate
    /// cannot clobber an `authenticate` that already ran. Returns whether
    /// a user is logged in after the check.
    pub async fn check_auth_status(&self) -> bool {
        if !self.checked.swap(true, Ordering::SeqCst) {
            self.inner.hydrate().await;
        }
        self.is_logged_in()
    }

    /// Enters `LoggedIn` with the given credentials, overwriting any
    /// previous session, and persists. The only way into `LoggedIn`.
    pub fn authenticate(&self, credentials: Credentials) {
        let user_id = credentials.user_id.clone();
        self.inner.mutate(|s| s.authenticate(credentials));
        debug!(user_id = %user_id, "Session authenticated");
        let _ = self.events.send(SessionEvent::LoggedIn { user_id });
    }

    /// Clears the session from any state and persists the cleared value.
    pub fn unauthenticate(&self) {
        self.inner.mutate(Session::unauthenticate);
        debug!("Session cleared");
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.read(Session::is_logged_in)
    }

    /// The authenticated user id, if any.
    pub fn user_id(&self) -> Option<String> {
        self.inner.read(|s| s.user_id().map(str::to_string))
    }

    /// Session transition events (login/logout) for cross-store
    /// coordination.
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Session snapshots for reactive shell rendering.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
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
    use optica_store::MemoryBackend;

    fn creds(user: &str) -> Credentials {
        Credentials {
            token: format!("tok-{user}"),
            refresh_token: format!("ref-{user}"),
            user_id: user.to_string(),
        }
    }

    fn backend() -> Arc<MemoryBackend> {
        Arc::new(MemoryBackend::new())
    }

    #[tokio::test]
    async fn test_check_auth_status_with_empty_storage_stays_logged_out() {
        let store = SessionStore::new(backend()).unwrap();
        assert!(!store.check_auth_status().await);
        assert_eq!(store.session(), Session::LoggedOut);
    }

    #[tokio::test]
    async fn test_authenticate_then_restart_restores_session() {
        let backend = backend();

        let store = SessionStore::new(backend.clone() as Arc<dyn StorageBackend>).unwrap();
        store.authenticate(creds("u1"));
        store.flush_now().await.unwrap();

        // Simulated process restart.
        let store = SessionStore::new(backend as Arc<dyn StorageBackend>).unwrap();
        assert!(store.check_auth_status().await);
        assert_eq!(store.user_id().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_check_auth_status_is_idempotent() {
        let backend = backend();
        let store = SessionStore::new(backend.clone() as Arc<dyn StorageBackend>).unwrap();

        assert!(!store.check_auth_status().await);

        // A login after the check must survive later duplicate checks,
        // even though the durable write may still be in flight.
        store.authenticate(creds("u1"));
        assert!(store.check_auth_status().await);
        assert!(store.check_auth_status().await);
        assert_eq!(store.user_id().as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn test_session_atomicity_observed_through_store() {
        let store = SessionStore::new(backend()).unwrap();

        store.authenticate(creds("u1"));
        match store.session() {
            Session::LoggedIn {
                token,
                refresh_token,
                user_id,
            } => {
                assert!(!token.is_empty());
                assert!(!refresh_token.is_empty());
                assert!(!user_id.is_empty());
            }
            Session::LoggedOut => panic!("expected LoggedIn"),
        }

        store.unauthenticate();
        assert_eq!(store.session(), Session::LoggedOut);
        assert!(store.user_id().is_none());
    }

    #[tokio::test]
    async fn test_transitions_emit_events() {
        let store = SessionStore::new(backend()).unwrap();
        let mut rx = store.subscribe_events();

        store.authenticate(creds("u1"));
        store.unauthenticate();

        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::LoggedIn {
                user_id: "u1".to_string()
            }
        );
        assert_eq!(rx.recv().await.unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_corrupt_persisted_session_falls_back_to_logged_out() {
        let backend = backend();
        backend.seed(SESSION_STORE, "{broken");

        let store = SessionStore::new(backend as Arc<dyn StorageBackend>).unwrap();
        assert!(!store.check_auth_status().await);
    }
}
