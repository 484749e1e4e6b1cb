//! Cart Store
//!
//! Single source of truth for the currently-displayed cart of one storefront
//! session. The store holds the last-fetched server snapshot plus the current
//! error message, and applies the reconciliation policy: local state is never
//! trusted after a mutating call — every mutation is followed by a full
//! refetch of the authoritative cart (or, where the server already returned
//! the full replacement cart, by installing that wholesale).
//!
//! Mutations are serialized behind a single-flight lock so a second mutation
//! waits for the prior mutation + refetch cycle to complete; rapid repeated
//! actions cannot interleave refetches.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use super::helpers;
use super::models::{Cart, CheckoutValidation};
use super::notify::Notifier;
use crate::error::CartError;
use crate::gateway::CartGateway;

/// Session-scoped cart state. Constructed once per session and injected into
/// whatever surface renders the cart; disposed on logout together with the
/// session.
pub struct CartStore {
    gateway: CartGateway,
    notifier: Arc<dyn Notifier>,

    /// Last authoritative server snapshot; `None` until the first fetch or
    /// after a clear. Kept in place when an operation fails.
    snapshot: RwLock<Option<Cart>>,

    /// Message of the most recent failure, cleared by the next success.
    last_error: RwLock<Option<String>>,

    /// Single-flight guard: one mutation + refetch cycle at a time.
    mutation: Mutex<()>,
}

impl CartStore {
    pub fn new(gateway: CartGateway, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gateway,
            notifier,
            snapshot: RwLock::new(None),
            last_error: RwLock::new(None),
            mutation: Mutex::new(()),
        }
    }

    // =========================================================================
    // Read access and derived values
    // =========================================================================

    /// Clone of the current snapshot, if any.
    pub fn snapshot(&self) -> Option<Cart> {
        self.snapshot.read().expect("snapshot lock poisoned").clone()
    }

    /// Message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<String> {
        self.last_error
            .read()
            .expect("error lock poisoned")
            .clone()
    }

    /// Number of distinct line items.
    pub fn item_count(&self) -> usize {
        let guard = self.snapshot.read().expect("snapshot lock poisoned");
        helpers::item_count(guard.as_ref())
    }

    /// The amount to display: server `total`, else `subtotal`, else 0.
    pub fn display_total(&self) -> f64 {
        let guard = self.snapshot.read().expect("snapshot lock poisoned");
        helpers::display_total(guard.as_ref())
    }

    /// Whether the user-facing cart is empty (no snapshot or no items).
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Loads the authoritative cart for the current session.
    ///
    /// On failure the previous snapshot stays in place: stale-but-present is
    /// preferred to blanking the display.
    ///
    /// Takes the single-flight lock so a fetch issued alongside a mutation
    /// cannot install an older snapshot over the mutation's refetch.
    pub async fn fetch_current(&self) -> Result<Option<Cart>, CartError> {
        let _guard = self.mutation.lock().await;
        self.refetch().await?;
        Ok(self.snapshot())
    }

    /// Adds `quantity` of a product, then refetches the authoritative cart.
    pub async fn add_item(&self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        if product_id.trim().is_empty() {
            return Err(self.reject("productId must not be empty"));
        }
        if quantity == 0 {
            return Err(self.reject("quantity must be at least 1"));
        }

        let _guard = self.mutation.lock().await;
        match self.gateway.add_item(product_id, quantity).await {
            Ok(_) => {
                self.refetch().await?;
                self.notifier.success("Added to cart");
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Sets a line's quantity; quantity 0 is a domain synonym for removal.
    pub async fn update_quantity(&self, item_id: &str, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return self.remove_item(item_id).await;
        }

        let _guard = self.mutation.lock().await;
        match self.gateway.update_item_quantity(item_id, quantity).await {
            Ok(_) => {
                self.refetch().await?;
                self.notifier.success("Cart updated");
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Removes a line item, then refetches the authoritative cart.
    pub async fn remove_item(&self, item_id: &str) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        match self.gateway.remove_item(item_id).await {
            Ok(_) => {
                self.refetch().await?;
                self.notifier.success("Removed from cart");
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Empties the cart. The outcome is deterministic, so local state is set
    /// directly instead of refetching.
    pub async fn clear(&self) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        match self.gateway.clear_cart().await {
            Ok(()) => {
                self.install(None);
                self.notifier.success("Cart cleared");
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Folds a pre-authentication guest cart into the authenticated user's
    /// cart. Called once after login; the server's merged result wholly
    /// replaces whatever was displayed before.
    pub async fn merge_carts(&self, guest_cart_id: Option<&str>) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        match self.gateway.merge_carts(guest_cart_id).await {
            Ok(merged) => {
                self.install(Some(merged));
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Asks the server whether the cart is purchasable as-is.
    ///
    /// Does not mutate the cart. `valid: false` is returned to the caller
    /// for inline display, not surfaced as a notification.
    pub async fn validate_for_checkout(&self) -> Result<CheckoutValidation, CartError> {
        match self.gateway.validate_checkout().await {
            Ok(validation) => Ok(validation),
            Err(err) => Err(self.report(err)),
        }
    }

    // =========================================================================
    // Reconciliation internals
    // =========================================================================

    /// Replaces the snapshot with a fresh fetch of the server cart.
    async fn refetch(&self) -> Result<(), CartError> {
        match self.gateway.current_cart().await {
            Ok(cart) => {
                self.install(cart);
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    /// Installs a new authoritative snapshot and clears the error state.
    fn install(&self, cart: Option<Cart>) {
        *self.snapshot.write().expect("snapshot lock poisoned") = cart;
        *self.last_error.write().expect("error lock poisoned") = None;
    }

    /// Records a failed operation and emits the failure notification. The
    /// snapshot is left untouched.
    fn report(&self, err: CartError) -> CartError {
        let message = err.user_message();
        tracing::warn!(error = %err, "cart operation failed");
        *self.last_error.write().expect("error lock poisoned") = Some(message.clone());
        self.notifier.failure(&message);
        err
    }

    /// Rejects bad input before any request is made.
    fn reject(&self, message: &str) -> CartError {
        self.report(CartError::Invalid(message.to_owned()))
    }
}
