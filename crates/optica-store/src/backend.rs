//! StorageBackend trait - the durable medium behind every persisted store.
//!
//! The contract is deliberately small: an asynchronous key → string-blob
//! store with get/set/remove. Each persisted store uses its store name as
//! its key, so concurrent flushes from different stores never collide.
//! Any durable async key-value medium satisfies this trait.

use async_trait::async_trait;

use crate::error::{Result, StoreError};

/// Maximum store name length in bytes.
pub const MAX_NAME_LENGTH: usize = 128;

/// Validate that a store name is a usable storage key.
///
/// Names are short dotted identifiers ("optica.session"); they travel
/// into table keys and log lines, so whitespace and control characters
/// are rejected.
pub fn validate_store_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::InvalidName("name cannot be empty".to_string()));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(StoreError::InvalidName(format!(
            "name exceeds maximum length of {MAX_NAME_LENGTH} bytes"
        )));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(StoreError::InvalidName(format!(
            "name '{name}' contains characters outside [a-zA-Z0-9._-]"
        )));
    }
    Ok(())
}

/// The durable storage medium.
///
/// Implementations must be safe to share across stores: every store uses
/// a distinct name, and a backend value is only ever written by its
/// owning store.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the blob stored under `name`, if any.
    async fn get(&self, name: &str) -> Result<Option<String>>;

    /// Write `blob` under `name`, replacing any previous value.
    async fn set(&self, name: &str, blob: String) -> Result<()>;

    /// Remove the value stored under `name`. Removing an absent name is
    /// not an error.
    async fn remove(&self, name: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_store_name_valid() {
        assert!(validate_store_name("optica.session").is_ok());
        assert!(validate_store_name("cart").is_ok());
        assert!(validate_store_name("a_b-c.d").is_ok());
    }

    #[test]
    fn test_validate_store_name_empty() {
        assert!(matches!(
            validate_store_name(""),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_validate_store_name_whitespace() {
        assert!(validate_store_name("has space").is_err());
        assert!(validate_store_name("tab\there").is_err());
    }

    #[test]
    fn test_validate_store_name_too_long() {
        let name = "a".repeat(MAX_NAME_LENGTH + 1);
        assert!(validate_store_name(&name).is_err());
    }
}
