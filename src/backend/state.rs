//! Cart Backend State Management
//!
//! In-memory state for the development cart backend: the product catalog,
//! the carts themselves, and the session-to-cart mapping. The backend is
//! authoritative for totals and line pricing; nothing here is ever computed
//! client-side.

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::cart::models::{Cart, ProductSummary};

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<BackendState>;

/// Core backend state containing the catalog and all live carts.
pub struct BackendState {
    /// Purchasable products, keyed by product id.
    /// DashMap allows concurrent access without external Mutexes.
    pub catalog: DashMap<String, ProductSummary>,

    /// Live carts, keyed by cart id.
    pub carts: DashMap<String, Cart>,

    /// Session key (bearer token, or the guest marker) to cart id.
    pub sessions: DashMap<String, String>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendState {
    /// Creates a new state with an empty catalog and no carts.
    pub fn new() -> Self {
        Self {
            catalog: DashMap::new(),
            carts: DashMap::new(),
            sessions: DashMap::new(),
        }
    }

    /// Adds (or replaces) a catalog entry.
    pub fn seed_product(&self, product: ProductSummary) {
        self.catalog.insert(product.id.clone(), product);
    }

    /// Removes a product from the catalog; existing cart lines referencing
    /// it become invalid on the next refresh or checkout validation.
    pub fn delist_product(&self, product_id: &str) {
        self.catalog.remove(product_id);
    }

    /// Changes a product's catalog price without touching existing cart
    /// lines; the stale line price shows up in checkout validation.
    pub fn reprice_product(&self, product_id: &str, price: f64) {
        if let Some(mut product) = self.catalog.get_mut(product_id) {
            product.price = price;
        }
    }

    /// Cart id for the session, creating an empty active cart lazily.
    pub fn get_or_create_cart(&self, session: &str) -> String {
        if let Some(cart_id) = self.sessions.get(session) {
            if self.carts.contains_key(cart_id.value()) {
                return cart_id.clone();
            }
        }

        let cart = Cart {
            id: Uuid::new_v4().simple().to_string(),
            status: "active".to_owned(),
            subtotal: 0.0,
            total: Some(0.0),
            currency: "EUR".to_owned(),
            items: Vec::new(),
            validated_at: None,
            updated_at: Utc::now(),
        };
        let cart_id = cart.id.clone();
        self.carts.insert(cart_id.clone(), cart);
        self.sessions.insert(session.to_owned(), cart_id.clone());
        cart_id
    }

    /// Cart id for the session, if one already exists.
    pub fn cart_id_for(&self, session: &str) -> Option<String> {
        self.sessions
            .get(session)
            .map(|id| id.clone())
            .filter(|id| self.carts.contains_key(id))
    }

    /// Drops the session's cart entirely.
    pub fn drop_cart(&self, session: &str) {
        if let Some((_, cart_id)) = self.sessions.remove(session) {
            self.carts.remove(&cart_id);
        }
    }

    /// Recomputes line totals and cart totals from stored unit prices.
    /// Called after every mutation so returned carts are always priced.
    pub fn recompute(cart: &mut Cart) {
        for item in &mut cart.items {
            item.line_total = item.unit_price * f64::from(item.quantity);
        }
        cart.subtotal = cart.items.iter().map(|i| i.line_total).sum();
        cart.total = Some(cart.subtotal);
        cart.updated_at = Utc::now();
    }

    /// Reprices every line from the catalog and re-asserts validity.
    pub fn refresh(&self, cart: &mut Cart) {
        for item in &mut cart.items {
            match self.catalog.get(&item.product.id) {
                Some(product) => {
                    item.unit_price = product.price;
                    item.product = product.clone();
                    item.valid = true;
                }
                None => item.valid = false,
            }
        }
        Self::recompute(cart);
        cart.validated_at = Some(Utc::now());
    }
}
