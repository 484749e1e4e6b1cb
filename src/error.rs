//! Error taxonomy for cart operations
//!
//! Transport failures and HTTP error statuses are normalized here; domain
//! validation outcomes (`CheckoutValidation`) are ordinary return values and
//! never appear as errors.

use reqwest::StatusCode;
use thiserror::Error;

/// Failures a cart operation can surface to its caller.
#[derive(Debug, Error)]
pub enum CartError {
    /// The request never produced a response (DNS, refused connection, ...)
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status; `message` is taken from
    /// the JSON error body when one is present.
    #[error("request failed with status {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// Input rejected client-side before any request was made.
    #[error("{0}")]
    Invalid(String),
}

impl CartError {
    /// Human-readable text for a transient user notification.
    pub fn user_message(&self) -> String {
        match self {
            CartError::Transport(_) => {
                "Could not reach the store. Check your connection and try again.".to_owned()
            }
            CartError::Api { message, .. } => message.clone(),
            CartError::Invalid(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_server_message() {
        let err = CartError::Api {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: "quantity must be at least 1".to_owned(),
        };
        assert_eq!(err.user_message(), "quantity must be at least 1");
        assert!(err.to_string().contains("422"));
    }

    #[test]
    fn invalid_input_message_passes_through() {
        let err = CartError::Invalid("productId must not be empty".to_owned());
        assert_eq!(err.user_message(), "productId must not be empty");
    }
}
