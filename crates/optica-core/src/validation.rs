//! # Validation Module
//!
//! Input validation for mutations entering the state layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Validation Layers                           │
//! │                                                                 │
//! │  Layer 1: Shell (TypeScript)                                    │
//! │  ├── Basic format checks (empty, length)                        │
//! │  └── Immediate user feedback                                    │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 2: Domain store (optica-app)                             │
//! │  └── THIS MODULE: ids and quantities checked before the         │
//! │      transition runs                                            │
//! │           │                                                     │
//! │           ▼                                                     │
//! │  Layer 3: Transition core (cart.rs, wishlist.rs)                │
//! │  └── Structural invariants (caps, uniqueness, quantity floor)   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of a product identity string. Catalog ids are opaque
/// (numeric ids, gid URLs, handles) but bounded.
pub const MAX_PRODUCT_ID_LEN: usize = 128;

/// Maximum length of a wishlist partition key (user identity).
pub const MAX_PARTITION_KEY_LEN: usize = 128;

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a product identity string.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - Must be at most [`MAX_PRODUCT_ID_LEN`] characters
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    Ok(())
}

/// Validates a wishlist partition key (a user identity).
///
/// ## Rules
/// - Must not be empty or whitespace
/// - Must be at most [`MAX_PARTITION_KEY_LEN`] characters
pub fn validate_partition_key(key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "user identity".to_string(),
        });
    }

    if key.len() > MAX_PARTITION_KEY_LEN {
        return Err(ValidationError::TooLong {
            field: "user identity".to_string(),
            max: MAX_PARTITION_KEY_LEN,
        });
    }

    Ok(())
}
