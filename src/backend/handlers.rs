//! REST API handlers for the cart backend
//!
//! Implements the cart resource the client gateway talks to. Carts are keyed
//! to the caller's session: the bearer token when one is presented, the
//! shared guest session otherwise. Every mutation answers with the fully
//! repriced cart; error bodies are `{"message": ...}`.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use super::state::{BackendState, SharedState};
use crate::cart::models::{
    AddItemRequest, Cart, CartItem, CheckoutValidation, MergeRequest, UpdateQuantityRequest,
};

/// Session key used when no bearer credential is presented.
const GUEST_SESSION: &str = "guest";

/// Creates routes for the cart resource.
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart/me", get(current_cart))
        .route("/cart/items", post(add_item))
        .route(
            "/cart/items/:item_id",
            axum::routing::patch(update_item).delete(remove_item),
        )
        .route("/cart", delete(clear_cart))
        .route("/cart/refresh", post(refresh_cart))
        .route("/cart/merge", post(merge_carts))
        .route("/cart/checkout/validate", post(validate_checkout))
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "message": message })))
}

/// Bearer token value, or the guest session marker.
fn session_key(headers: &HeaderMap) -> String {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
        .unwrap_or_else(|| GUEST_SESSION.to_owned())
}

/// Endpoint: GET /cart/me
/// The session's cart, or 404 when none has been created yet.
async fn current_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Cart>, ApiError> {
    let session = session_key(&headers);
    let cart_id = state
        .cart_id_for(&session)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no cart for this session"))?;

    let cart = state
        .carts
        .get(&cart_id)
        .map(|cart| cart.clone())
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no cart for this session"))?;

    Ok(Json(cart))
}

/// Endpoint: POST /cart/items
/// Adds a product, aggregating quantity onto an existing line for the same
/// product. The cart is created lazily on the first mutation.
async fn add_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<AddItemRequest>,
) -> Result<Json<Cart>, ApiError> {
    if payload.quantity == 0 {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "quantity must be at least 1",
        ));
    }

    let product = state
        .catalog
        .get(&payload.product_id)
        .map(|product| product.clone())
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "product not found"))?;

    let session = session_key(&headers);
    let cart_id = state.get_or_create_cart(&session);
    let mut cart = state
        .carts
        .get_mut(&cart_id)
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "cart disappeared"))?;

    if let Some(existing) = cart.items.iter_mut().find(|i| i.product.id == product.id) {
        // Aggregate quantities, pinned at u32::MAX rather than wrapping.
        existing.quantity = existing.quantity.saturating_add(payload.quantity);
    } else {
        // Insert a brand-new line.
        cart.items.push(CartItem {
            id: Uuid::new_v4().simple().to_string(),
            quantity: payload.quantity,
            unit_price: product.price,
            line_total: 0.0,
            valid: true,
            product,
        });
    }

    BackendState::recompute(cart.value_mut());
    Ok(Json(cart.clone()))
}

/// Endpoint: PATCH /cart/items/{itemId}
/// Sets a line's quantity; quantity 0 removes the line.
async fn update_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Json<Cart>, ApiError> {
    let session = session_key(&headers);
    let cart_id = state
        .cart_id_for(&session)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no cart for this session"))?;
    let mut cart = state
        .carts
        .get_mut(&cart_id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "no cart for this session"))?;

    if payload.quantity == 0 {
        cart.items.retain(|item| item.id != item_id);
    } else {
        let item = cart
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "cart item not found"))?;
        item.quantity = payload.quantity;
    }

    BackendState::recompute(cart.value_mut());
    Ok(Json(cart.clone()))
}

/// Endpoint: DELETE /cart/items/{itemId}
/// Removing an already-absent item is a no-op success.
async fn remove_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Path(item_id): Path<String>,
) -> Result<Json<Cart>, ApiError> {
    let session = session_key(&headers);
    let cart_id = state.get_or_create_cart(&session);
    let mut cart = state
        .carts
        .get_mut(&cart_id)
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "cart disappeared"))?;

    cart.items.retain(|item| item.id != item_id);
    BackendState::recompute(cart.value_mut());
    Ok(Json(cart.clone()))
}

/// Endpoint: DELETE /cart
/// Clears the session's cart entirely.
async fn clear_cart(State(state): State<SharedState>, headers: HeaderMap) -> StatusCode {
    let session = session_key(&headers);
    state.drop_cart(&session);
    StatusCode::NO_CONTENT
}

/// Endpoint: POST /cart/refresh
/// Reprices every line from the catalog and re-asserts validity.
async fn refresh_cart(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<Cart>, ApiError> {
    let session = session_key(&headers);
    let cart_id = state.get_or_create_cart(&session);
    let mut cart = state
        .carts
        .get_mut(&cart_id)
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "cart disappeared"))?;

    state.refresh(cart.value_mut());
    Ok(Json(cart.clone()))
}

/// Endpoint: POST /cart/merge
/// Folds the named guest cart into the session's cart, aggregating
/// quantities of identical products, then drops the guest cart.
async fn merge_carts(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(payload): Json<MergeRequest>,
) -> Result<Json<Cart>, ApiError> {
    let session = session_key(&headers);
    let cart_id = state.get_or_create_cart(&session);

    let guest_items = payload
        .guest_cart_id
        .filter(|guest_id| *guest_id != cart_id)
        .and_then(|guest_id| {
            state.sessions.retain(|_, mapped| *mapped != guest_id);
            state.carts.remove(&guest_id)
        })
        .map(|(_, guest_cart)| guest_cart.items)
        .unwrap_or_default();

    let mut cart = state
        .carts
        .get_mut(&cart_id)
        .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "cart disappeared"))?;

    for incoming in guest_items {
        if let Some(existing) = cart
            .items
            .iter_mut()
            .find(|i| i.product.id == incoming.product.id)
        {
            existing.quantity = existing.quantity.saturating_add(incoming.quantity);
        } else {
            cart.items.push(incoming);
        }
    }

    BackendState::recompute(cart.value_mut());
    tracing::info!(
        cart = %cart.id,
        items = %crate::cart::helpers::format_item_summary(&cart),
        "merged guest cart into session cart"
    );
    Ok(Json(cart.clone()))
}

/// Endpoint: POST /cart/checkout/validate
/// Read-only purchasability check: delisted products and stale line prices
/// produce one error each. Never mutates the cart.
async fn validate_checkout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<CheckoutValidation> {
    let session = session_key(&headers);
    let cart = state
        .cart_id_for(&session)
        .and_then(|cart_id| state.carts.get(&cart_id).map(|cart| cart.clone()));

    let cart = match cart {
        Some(cart) if !cart.items.is_empty() => cart,
        _ => {
            return Json(CheckoutValidation {
                success: true,
                valid: false,
                errors: vec!["cart is empty".to_owned()],
            })
        }
    };

    let mut errors = Vec::new();
    for item in &cart.items {
        match state.catalog.get(&item.product.id) {
            Some(product) if product.price != item.unit_price => {
                errors.push(format!(
                    "{} price changed from {} to {}",
                    item.product.name, item.unit_price, product.price
                ));
            }
            Some(_) => {}
            None => errors.push(format!("{} is no longer available", item.product.name)),
        }
    }

    Json(CheckoutValidation {
        success: true,
        valid: errors.is_empty(),
        errors,
    })
}
