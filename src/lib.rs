//! Storefront Cart Library
//!
//! Client-side cart state for a storefront session: a store that always
//! mirrors the server-authoritative cart, an HTTP gateway to the cart
//! resource, and an in-memory backend implementing that resource for
//! development and tests.

// Domain modules
pub mod cart;
pub mod gateway;

// Infrastructure
pub mod backend;
pub mod error;
pub mod router;
