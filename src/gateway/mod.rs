//! Cart Gateway Module
//!
//! Transport to the remote cart resource:
//! - HTTP client, one method per server operation
//! - Bearer credential storage

pub mod auth;
pub mod client;

// Re-export commonly used types for convenience
pub use auth::{MemoryTokenStore, TokenStore};
pub use client::CartGateway;
