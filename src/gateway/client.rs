//! Cart Gateway
//!
//! Pure transport against the remote cart resource: one method per server
//! operation, no retries, no local state. Every method builds a request
//! against the fixed base URL, attaches the bearer credential when present,
//! and parses the JSON body. Non-2xx responses are normalized into a single
//! human-readable message (see [`error_message`]).

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use url::Url;

use crate::cart::models::{
    AddItemRequest, Cart, CheckoutValidation, MergeRequest, UpdateQuantityRequest,
};
use crate::error::CartError;
use crate::gateway::auth::TokenStore;

/// HTTP client for the storefront cart API.
#[derive(Clone)]
pub struct CartGateway {
    base_url: Url,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl CartGateway {
    pub fn new(base_url: Url, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            base_url,
            client: Client::new(),
            tokens,
        }
    }

    /// Endpoint: GET /cart/me
    /// The current cart, or `None` when the server has none for this session.
    pub async fn current_cart(&self) -> Result<Option<Cart>, CartError> {
        let response = self
            .authed(self.client.get(self.endpoint("/cart/me")))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let response = check_status(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Endpoint: POST /cart/items
    /// Adds a product; returns the server's recomputed cart.
    pub async fn add_item(&self, product_id: &str, quantity: u32) -> Result<Cart, CartError> {
        let body = AddItemRequest {
            product_id: product_id.to_owned(),
            quantity,
        };
        let response = self
            .authed(self.client.post(self.endpoint("/cart/items")).json(&body))
            .send()
            .await?;
        parse_cart(response).await
    }

    /// Endpoint: PATCH /cart/items/{itemId}
    /// Sets a line's quantity; quantity 0 carries deletion semantics.
    pub async fn update_item_quantity(
        &self,
        item_id: &str,
        quantity: u32,
    ) -> Result<Cart, CartError> {
        let body = UpdateQuantityRequest { quantity };
        let path = format!("/cart/items/{item_id}");
        let response = self
            .authed(self.client.patch(self.endpoint(&path)).json(&body))
            .send()
            .await?;
        parse_cart(response).await
    }

    /// Endpoint: DELETE /cart/items/{itemId}
    /// Removing an already-absent item is a server-side no-op success.
    pub async fn remove_item(&self, item_id: &str) -> Result<Cart, CartError> {
        let path = format!("/cart/items/{item_id}");
        let response = self
            .authed(self.client.delete(self.endpoint(&path)))
            .send()
            .await?;
        parse_cart(response).await
    }

    /// Endpoint: DELETE /cart
    pub async fn clear_cart(&self) -> Result<(), CartError> {
        let response = self
            .authed(self.client.delete(self.endpoint("/cart")))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    /// Endpoint: POST /cart/refresh
    /// Asks the server to revalidate stock/prices and return the result.
    pub async fn refresh_cart(&self) -> Result<Cart, CartError> {
        let response = self
            .authed(self.client.post(self.endpoint("/cart/refresh")))
            .send()
            .await?;
        parse_cart(response).await
    }

    /// Endpoint: POST /cart/merge
    /// Folds the named guest cart into the session cart server-side.
    pub async fn merge_carts(&self, guest_cart_id: Option<&str>) -> Result<Cart, CartError> {
        let body = MergeRequest {
            guest_cart_id: guest_cart_id.map(str::to_owned),
        };
        let response = self
            .authed(self.client.post(self.endpoint("/cart/merge")).json(&body))
            .send()
            .await?;
        parse_cart(response).await
    }

    /// Endpoint: POST /cart/checkout/validate
    /// Read-only purchasability check; `valid: false` is a normal outcome.
    pub async fn validate_checkout(&self) -> Result<CheckoutValidation, CartError> {
        let response = self
            .authed(self.client.post(self.endpoint("/cart/checkout/validate")))
            .send()
            .await?;
        let response = check_status(response).await?;
        response.json().await.map_err(Into::into)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Parses the server's recomputed cart out of a mutation response.
async fn parse_cart(response: Response) -> Result<Cart, CartError> {
    let response = check_status(response).await?;
    response.json().await.map_err(Into::into)
}

/// Turns a non-2xx response into a normalized [`CartError::Api`].
async fn check_status(response: Response) -> Result<Response, CartError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(CartError::Api {
        status,
        message: error_message(status, &body),
    })
}

/// Extracts a human-readable message from a JSON error body.
///
/// The backend reports errors as `{"message": "..."}`; `message` may also be
/// an array of strings, joined here. Unparsable bodies fall back to a
/// generic message carrying the status code.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("message") {
            Some(Value::String(message)) => return message.clone(),
            Some(Value::Array(parts)) => {
                let joined = parts
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("; ");
                if !joined.is_empty() {
                    return joined;
                }
            }
            _ => {}
        }
    }

    format!("request failed with status {status}")
}
