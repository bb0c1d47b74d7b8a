//! # Cart State
//!
//! Line items and quantities for the current cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                              │
//! │                                                                 │
//! │  Shell Action            Store Call            State Change     │
//! │  ─────────────           ───────────           ─────────────    │
//! │  Tap "Add to cart" ────► add_item() ─────────► merge or push    │
//! │  Change quantity ──────► update_quantity() ──► qty = n / remove │
//! │  Tap remove ───────────► remove_item() ──────► retain others    │
//! │  Checkout done ────────► clear() ────────────► fresh cart id    │
//! │                                                                 │
//! │  Every mutation stamps `updated_at`, the last-write clock the   │
//! │  foreground reload uses to arbitrate against the durable copy.  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by product id (adding an existing product merges
//!   quantities)
//! - Quantity is always >= 1; setting 0 removes the item and negative
//!   values are rejected, so no zero/negative quantity ever persists
//! - Maximum unique items: [`crate::MAX_CART_ITEMS`]
//! - Maximum quantity per item: [`crate::MAX_ITEM_QUANTITY`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::ProductRef;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line item in the cart.
///
/// Display fields are frozen at add time, so the cart renders consistent
/// rows even if the catalog entry changes before checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product identity. Uniqueness key within the cart.
    pub product_id: String,

    /// Display name at add time (frozen).
    pub name: String,

    /// Primary image at add time (frozen).
    pub image_url: Option<String>,

    /// Unit price in minor units at add time (frozen, display only;
    /// checkout reprices server-side).
    pub unit_price_cents: Option<i64>,

    /// Quantity in cart; always >= 1.
    pub quantity: i64,

    /// When this item was added.
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item from a product reference and quantity.
    pub fn from_product(product: &ProductRef, quantity: i64) -> Self {
        CartItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            image_url: product.image_url.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            added_at: Utc::now(),
        }
    }

    /// Line total in minor units; unpriced references count as zero.
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents.unwrap_or(0) * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The cart.
///
/// Ephemeral until checkout (an external collaborator); there is no order
/// entity at this layer. `id` is a client-generated identifier used by the
/// checkout collaborator to correlate, regenerated whenever the cart is
/// cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Client-generated cart identifier.
    pub id: String,

    /// Line items in insertion order.
    pub items: Vec<CartItem>,

    /// Last local mutation time. Arbitration clock for the
    /// reload-on-foreground conflict policy (last completed write wins).
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart with a fresh identifier.
    pub fn new() -> Self {
        Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Adds a product to the cart or merges into an existing line.
    ///
    /// ## Behavior
    /// - Product already in cart: quantities merge (capped)
    /// - Product not in cart: appended as a new line
    pub fn add_item(&mut self, product: &ProductRef, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            self.touch();
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        self.items.push(CartItem::from_product(product, quantity));
        self.touch();
        Ok(())
    }

    /// Sets the quantity of a line item.
    ///
    /// ## Quantity floor policy
    /// - `quantity == 0`: removes the line item
    /// - `quantity < 0`: rejected as validation error
    /// - Absent product id: no-op (not an error)
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
            self.touch();
        }
        Ok(())
    }

    /// Removes a line item by product id. No-op when absent; returns
    /// whether anything was removed.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id != product_id);

        let removed = self.items.len() != initial_len;
        if removed {
            self.touch();
        }
        removed
    }

    /// Empties the cart and issues a fresh cart identifier.
    pub fn clear(&mut self) {
        self.items.clear();
        self.id = Uuid::new_v4().to_string();
        self.touch();
    }

    /// Number of unique line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Display subtotal in minor units.
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_cents()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(id: &str, price_cents: i64) -> ProductRef {
        ProductRef {
            id: id.to_string(),
            name: format!("Frame {id}"),
            handle: None,
            image_url: None,
            price_cents: Some(price_cents),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 2).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 9998);
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 2).unwrap();
        cart.add_item(&frame("1", 4999), 3).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = Cart::new();
        assert!(cart.add_item(&frame("1", 4999), 0).is_err());
        assert!(cart.add_item(&frame("1", 4999), -3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_cap_enforced() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 998).unwrap();

        let err = cart.add_item(&frame("1", 4999), 2).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.total_quantity(), 998);
    }

    #[test]
    fn test_update_quantity_zero_removes_item() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 2).unwrap();
        cart.update_quantity("1", 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 2).unwrap();

        assert!(cart.update_quantity("1", -1).is_err());
        // The rejected mutation must not leave a bad quantity behind.
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_absent_is_noop() {
        let mut cart = Cart::new();
        cart.update_quantity("missing", 3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.remove_item("missing"));
    }

    #[test]
    fn test_clear_issues_fresh_cart_id() {
        let mut cart = Cart::new();
        let old_id = cart.id.clone();
        cart.add_item(&frame("1", 4999), 1).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert_ne!(cart.id, old_id);
    }

    #[test]
    fn test_cart_round_trips_through_json() {
        let mut cart = Cart::new();
        cart.add_item(&frame("1", 4999), 2).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
