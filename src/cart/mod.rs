//! Cart Domain Module
//!
//! Client-side cart state for one storefront session, including:
//! - Domain models (Cart, CartItem, payloads)
//! - Display helpers (derived values over the snapshot)
//! - The session cart store and its reconciliation policy
//! - Transient outcome notifications

pub mod helpers;
pub mod models;
pub mod notify;
pub mod store;

// Re-export commonly used types for convenience
pub use models::{Cart, CartItem, CheckoutValidation, ProductSummary};
pub use notify::{Notifier, RecordingNotifier, TracingNotifier};
pub use store::CartStore;
