//! In-Memory Cart Backend
//!
//! An axum implementation of the cart resource, used as the local
//! development server and as the HTTP collaborator in integration tests.
//! It owns everything the client must never compute: line totals, cart
//! totals, merge semantics, and checkout validation.

pub mod handlers;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use state::{BackendState, SharedState};
