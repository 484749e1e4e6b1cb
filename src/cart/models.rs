//! Cart Domain Models
//!
//! This module contains all data structures exchanged with the storefront
//! cart API. Field names follow the backend's camelCase wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Compact view of a product embedded in a cart line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    /// Product identifier (SKU)
    pub id: String,

    /// Display name
    pub name: String,

    /// Current catalog price
    pub price: f64,

    /// Optional image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A single line item in a cart.
///
/// `line_total` is always the server's computation of
/// `quantity * unit_price`; the client displays it verbatim and never
/// recomputes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line item identifier
    pub id: String,

    /// Stored quantity, always >= 1 (quantity 0 is a removal, never stored)
    pub quantity: u32,

    /// Unit price captured when the line was last repriced
    pub unit_price: f64,

    /// Server-computed quantity * unit_price
    pub line_total: f64,

    /// Whether the item is still purchasable (server-asserted)
    #[serde(default = "default_valid")]
    pub valid: bool,

    /// Embedded product view
    pub product: ProductSummary,
}

/// Items default to purchasable unless the server says otherwise
fn default_valid() -> bool {
    true
}

/// The server-owned cart. The client holds a read-only cached copy that is
/// replaced wholesale after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart identifier
    pub id: String,

    /// Lifecycle status, `"active"` for a live cart
    pub status: String,

    /// Sum of line totals, server-computed
    pub subtotal: f64,

    /// Grand total; absent when the server has not priced extras yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,

    /// ISO currency code
    pub currency: String,

    /// Ordered line items
    pub items: Vec<CartItem>,

    /// When the cart was last revalidated against stock/prices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,

    /// Last server-side modification
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Request / Response Payloads
// =============================================================================

/// Body for `POST /cart/items`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    /// Product to add
    pub product_id: String,

    /// Quantity, must be >= 1
    pub quantity: u32,
}

/// Body for `PATCH /cart/items/{itemId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New quantity; 0 carries deletion semantics
    pub quantity: u32,
}

/// Body for `POST /cart/merge`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    /// Identifier of the guest cart to fold into the session cart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_cart_id: Option<String>,
}

/// Result of `POST /cart/checkout/validate`.
///
/// `valid: false` is a normal domain outcome, not a transport error; the
/// checkout flow inspects `errors` and displays them inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutValidation {
    /// Whether the validation call itself succeeded
    pub success: bool,

    /// Whether the cart is purchasable as-is
    pub valid: bool,

    /// One human-readable reason per offending item
    #[serde(default)]
    pub errors: Vec<String>,
}
