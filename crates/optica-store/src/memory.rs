//! In-memory storage backend.
//!
//! Not durable - data is lost on process exit. Used in tests and
//! development, and as the reference behavior for real backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::backend::{validate_store_name, StorageBackend};
use crate::error::{Result, StoreError};

/// In-memory implementation of [`StorageBackend`].
///
/// Writes can be made to fail on demand, which is how the
/// logged-and-retried persistence-failure path is exercised in tests.
#[derive(Default)]
pub struct MemoryBackend {
    data: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.data.read().expect("backend lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw blob access, bypassing any store. Test hook for asserting on
    /// what actually reached the durable medium.
    pub fn raw(&self, name: &str) -> Option<String> {
        self.data
            .read()
            .expect("backend lock poisoned")
            .get(name)
            .cloned()
    }

    /// Pre-seed a blob, bypassing any store. Test hook for corrupt or
    /// externally-written values.
    pub fn seed(&self, name: &str, blob: impl Into<String>) {
        self.data
            .write()
            .expect("backend lock poisoned")
            .insert(name.to_string(), blob.into());
    }

    /// Make subsequent writes fail until switched back. Test hook for the
    /// persistence-failure path.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, name: &str) -> Result<Option<String>> {
        validate_store_name(name)?;
        Ok(self
            .data
            .read()
            .expect("backend lock poisoned")
            .get(name)
            .cloned())
    }

    async fn set(&self, name: &str, blob: String) -> Result<()> {
        validate_store_name(name)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failure injected".to_string()));
        }
        self.data
            .write()
            .expect("backend lock poisoned")
            .insert(name.to_string(), blob);
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        validate_store_name(name)?;
        self.data
            .write()
            .expect("backend lock poisoned")
            .remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let backend = MemoryBackend::new();

        backend.set("optica.test", "blob".to_string()).await.unwrap();
        assert_eq!(
            backend.get("optica.test").await.unwrap(),
            Some("blob".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get("optica.none").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let backend = MemoryBackend::new();
        backend.remove("optica.none").await.unwrap();
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let backend = MemoryBackend::new();
        backend.set("k", "v1".to_string()).await.unwrap();
        backend.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("v2".to_string()));
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let backend = MemoryBackend::new();
        backend.set_fail_writes(true);

        let err = backend.set("k", "v".to_string()).await.unwrap_err();
        assert!(err.is_retryable());

        backend.set_fail_writes(false);
        backend.set("k", "v".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_name_rejected() {
        let backend = MemoryBackend::new();
        let result = backend.set("bad name", "v".to_string()).await;
        assert!(matches!(result, Err(StoreError::InvalidName(_))));
    }

    #[test]
    fn test_backend_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryBackend>();
    }
}
