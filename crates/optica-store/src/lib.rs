//! # optica-store: Durable Storage for the Optica State Layer
//!
//! Backend-agnostic persistence for the client's domain stores:
//!
//! - **[`StorageBackend`]**: the durable medium, an async key to
//!   string-blob store (get/set/remove by store name)
//! - **[`MemoryBackend`]**: in-process map (tests and development)
//! - **[`SqliteBackend`]**: embedded SQLite, WAL mode
//! - **[`PersistedStore`]**: the generic adapter giving each domain store
//!   synchronous in-memory access, asynchronous flushes, hydration with
//!   corrupt-value fallback, and watch-channel change notification
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use optica_store::{MemoryBackend, PersistedStore, StorageBackend};
//!
//! #[tokio::main]
//! async fn main() -> optica_store::Result<()> {
//!     let backend: Arc<dyn StorageBackend> = Arc::new(MemoryBackend::new());
//!     let store: PersistedStore<Vec<String>> =
//!         PersistedStore::new("optica.recent-searches", backend)?;
//!
//!     store.hydrate().await;
//!     store.mutate(|searches| searches.push("aviator".to_string()));
//!
//!     // The mutation is already visible; the durable write is in flight.
//!     assert_eq!(store.get().len(), 1);
//!     Ok(())
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod backend;
pub mod error;
pub mod memory;
pub mod persisted;
pub mod sqlite;

// =============================================================================
// Re-exports
// =============================================================================

pub use backend::{validate_store_name, StorageBackend, MAX_NAME_LENGTH};
pub use error::{Result, StoreError};
pub use memory::MemoryBackend;
pub use persisted::{Hydration, PersistedStore};
pub use sqlite::SqliteBackend;
