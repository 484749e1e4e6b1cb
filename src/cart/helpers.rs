//! Cart Display Helpers
//!
//! Small pure functions over the cached cart snapshot. These are the only
//! values the client derives itself; money amounts are always the server's.

use super::models::Cart;

/// Number of distinct line items in the snapshot.
///
/// "No cart yet" and "cart with no items" are the same empty state.
pub fn item_count(cart: Option<&Cart>) -> usize {
    cart.map(|c| c.items.len()).unwrap_or(0)
}

/// The amount shown to the user: the server's `total`, falling back to
/// `subtotal`, falling back to 0. This is the one canonical derivation rule;
/// no caller computes totals any other way.
pub fn display_total(cart: Option<&Cart>) -> f64 {
    cart.map(|c| c.total.unwrap_or(c.subtotal)).unwrap_or(0.0)
}

/// Whether the user-facing cart is empty.
pub fn is_empty(cart: Option<&Cart>) -> bool {
    item_count(cart) == 0
}

/// Produces a human-readable one-line summary for a cart.
///
/// Example output: `"2x Mug, 1x Poster"`.
pub fn format_item_summary(cart: &Cart) -> String {
    cart.items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.product.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::models::{CartItem, ProductSummary};
    use chrono::Utc;

    fn cart_with(total: Option<f64>, items: Vec<CartItem>) -> Cart {
        Cart {
            id: "cart-1".to_owned(),
            status: "active".to_owned(),
            subtotal: 10.0,
            total,
            currency: "EUR".to_owned(),
            items,
            validated_at: None,
            updated_at: Utc::now(),
        }
    }

    fn line(name: &str, quantity: u32) -> CartItem {
        CartItem {
            id: format!("line-{name}"),
            quantity,
            unit_price: 5.0,
            line_total: 5.0 * quantity as f64,
            valid: true,
            product: ProductSummary {
                id: format!("sku-{name}"),
                name: name.to_owned(),
                price: 5.0,
                image: None,
            },
        }
    }

    #[test]
    fn display_total_prefers_total_over_subtotal() {
        let cart = cart_with(Some(12.5), vec![line("Mug", 1)]);
        assert_eq!(display_total(Some(&cart)), 12.5);
    }

    #[test]
    fn display_total_falls_back_to_subtotal_then_zero() {
        let cart = cart_with(None, vec![line("Mug", 1)]);
        assert_eq!(display_total(Some(&cart)), 10.0);
        assert_eq!(display_total(None), 0.0);
    }

    #[test]
    fn missing_cart_and_empty_cart_are_both_empty() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&cart_with(None, vec![]))));
        assert!(!is_empty(Some(&cart_with(None, vec![line("Mug", 1)]))));
    }

    #[test]
    fn summary_lists_quantities_and_names() {
        let cart = cart_with(None, vec![line("Mug", 2), line("Poster", 1)]);
        assert_eq!(format_item_summary(&cart), "2x Mug, 1x Poster");
    }
}
