//! # Persisted Store
//!
//! The generic persistence adapter: synchronous in-memory state with
//! asynchronous durable flushes.
//!
//! ## Read/Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PersistedStore<T>                           │
//! │                                                                 │
//! │  get()/read() ────► in-memory T (never blocks on I/O)           │
//! │                                                                 │
//! │  mutate(f) ───────► apply f synchronously                       │
//! │        │            notify watch subscribers                    │
//! │        └──────────► schedule async flush (tokio::spawn)         │
//! │                          │                                      │
//! │                          ▼  (serialized through the flush gate) │
//! │                     snapshot latest T ──► backend.set(name, …)  │
//! │                          │                                      │
//! │                          └─ on error: warn + keep memory;       │
//! │                             the next mutation's flush writes    │
//! │                             the full current snapshot (retry)   │
//! │                                                                 │
//! │  hydrate() ───────► backend.get(name)                           │
//! │                     missing/corrupt ──► declared default        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Memory wins: a failed durable write never rolls back in-memory state
//! and never surfaces past a warn log. Eventual consistency between
//! memory and disk converges because every flush writes the latest
//! snapshot, not the mutation that scheduled it.

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::backend::{validate_store_name, StorageBackend};
use crate::error::Result;

/// Outcome of a hydration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A previously persisted value was loaded into memory.
    Restored,
    /// Nothing usable was persisted; the store holds its default.
    Defaulted,
}

struct Inner<T> {
    name: String,
    backend: Arc<dyn StorageBackend>,
    value: RwLock<T>,
    watch_tx: watch::Sender<T>,
    // Serializes flushes so the durable value converges to the latest
    // in-memory snapshot even when spawned flushes land out of order.
    flush_gate: tokio::sync::Mutex<()>,
}

/// A durable, asynchronously-flushed container for one store's state.
///
/// Cloning is cheap and shares the same state; domain stores hand clones
/// to spawned tasks and subscribers.
pub struct PersistedStore<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for PersistedStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PersistedStore<T>
where
    T: Clone + Default + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Creates a store named `name` over the shared backend, initialized
    /// to `T::default()`. Call [`hydrate`](Self::hydrate) before first use.
    pub fn new(name: impl Into<String>, backend: Arc<dyn StorageBackend>) -> Result<Self> {
        let name = name.into();
        validate_store_name(&name)?;

        let initial = T::default();
        let (watch_tx, _) = watch::channel(initial.clone());

        Ok(Self {
            inner: Arc::new(Inner {
                name,
                backend,
                value: RwLock::new(initial),
                watch_tx,
                flush_gate: tokio::sync::Mutex::new(()),
            }),
        })
    }

    /// The store's storage key.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Loads any previously persisted value into memory.
    ///
    /// Missing, unreadable, and corrupt values all fall back to the
    /// declared default; hydration never fails past a warn log.
    pub async fn hydrate(&self) -> Hydration {
        match self.load_durable().await {
            Some(value) => {
                self.replace_in_memory(value);
                Hydration::Restored
            }
            None => Hydration::Defaulted,
        }
    }

    /// Reads and decodes the durable value without touching in-memory
    /// state. Used by reload policies that arbitrate before replacing.
    pub async fn load_durable(&self) -> Option<T> {
        match self.inner.backend.get(&self.inner.name).await {
            Ok(Some(blob)) => match serde_json::from_str(&blob) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(store = %self.inner.name, error = %e, "Discarding corrupt persisted value");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(store = %self.inner.name, error = %e, "Durable read failed");
                None
            }
        }
    }

    /// Clone of the current in-memory state.
    pub fn get(&self) -> T {
        self.inner.value.read().expect("state lock poisoned").clone()
    }

    /// Executes `f` with read access to the current state.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let guard = self.inner.value.read().expect("state lock poisoned");
        f(&guard)
    }

    /// Applies `f` to the state synchronously, notifies subscribers, and
    /// schedules an asynchronous flush. The caller observes the new value
    /// immediately; the durable write may still be in flight.
    pub fn mutate<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let (result, snapshot) = {
            let mut guard = self.inner.value.write().expect("state lock poisoned");
            let result = f(&mut guard);
            (result, guard.clone())
        };

        self.inner.watch_tx.send_replace(snapshot);
        self.schedule_flush();
        result
    }

    /// Replaces the whole value (reload path) and persists it.
    pub fn replace(&self, value: T) {
        self.mutate(|v| *v = value);
    }

    /// Watch channel of state snapshots for reactive consumers.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.inner.watch_tx.subscribe()
    }

    /// Flushes the current snapshot and reports the outcome. Lifecycle
    /// points (app backgrounding, tests) await this for deterministic
    /// persistence; ordinary mutations never do.
    pub async fn flush_now(&self) -> Result<()> {
        self.try_flush().await
    }

    fn replace_in_memory(&self, value: T) {
        {
            let mut guard = self.inner.value.write().expect("state lock poisoned");
            *guard = value.clone();
        }
        self.inner.watch_tx.send_replace(value);
    }

    fn schedule_flush(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn(async move {
                    if let Err(e) = store.try_flush().await {
                        warn!(
                            store = %store.inner.name,
                            error = %e,
                            "Persist failed; in-memory state stays authoritative, retrying on next write"
                        );
                    }
                });
            }
            Err(_) => {
                // Outside a runtime (pure unit tests); the value is only
                // durable after an explicit flush_now.
                debug!(store = %self.inner.name, "No async runtime; flush deferred");
            }
        }
    }

    async fn try_flush(&self) -> Result<()> {
        let _gate = self.inner.flush_gate.lock().await;
        // Snapshot under the gate: whichever flush runs last writes the
        // latest state.
        let blob = self.read(|value| serde_json::to_string(value))?;
        self.inner.backend.set(&self.inner.name, blob).await
    }
}
