//! Bearer Credential Storage
//!
//! The gateway attaches an `Authorization: Bearer` header whenever the
//! session holds a token. How the token is obtained (login, OAuth) is out of
//! scope here; this module only stores and hands out the credential.

use std::sync::RwLock;

/// Read access to the session's bearer credential.
///
/// No token means anonymous/guest behavior: requests go out without an
/// `Authorization` header and the server keys the cart to the guest session.
pub trait TokenStore: Send + Sync {
    /// The current bearer token, if the session is authenticated.
    fn token(&self) -> Option<String>;

    /// Replace the stored token (called after a successful login).
    fn set_token(&self, token: String);

    /// Drop the stored token (called on logout).
    fn clear(&self);
}

/// In-memory token store shared across the session's gateway instances.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for an already-authenticated session.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token.read().expect("token lock poisoned").clone()
    }

    fn set_token(&self, token: String) {
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    fn clear(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }
}
