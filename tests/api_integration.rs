//! Integration tests for the in-memory cart backend
//!
//! These tests drive the REST resource directly through the router,
//! covering:
//! - Lazy cart creation and session keying via bearer tokens
//! - Quantity aggregation on repeated adds
//! - PATCH quantity 0 as deletion, DELETE of absent items as no-op
//! - Clear, refresh, merge, and checkout validation semantics
//! - The `{"message": ...}` error body shape

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot`

use storefront_cart_rust::backend::BackendState;
use storefront_cart_rust::cart::models::ProductSummary;
use storefront_cart_rust::router::create_app_router;

/// Helper to create a test app with a two-product catalog.
fn create_test_app() -> (axum::Router, Arc<BackendState>) {
    let state = Arc::new(BackendState::new());
    state.seed_product(ProductSummary {
        id: "sku-123".to_owned(),
        name: "Enamel Mug".to_owned(),
        price: 12.5,
        image: None,
    });
    state.seed_product(ProductSummary {
        id: "sku-456".to_owned(),
        name: "Concert Poster".to_owned(),
        price: 18.0,
        image: None,
    });
    (create_app_router(state.clone()), state)
}

/// Helper to send a JSON request and get the response.
async fn send_request(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    let body = match body {
        Some(value) => Body::from(serde_json::to_string(&value).unwrap()),
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));

    (status, body)
}

#[tokio::test]
async fn current_cart_is_404_before_first_mutation() {
    let (app, _) = create_test_app();

    let (status, body) = send_request(&app, "GET", "/cart/me", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no cart for this session");
}

#[tokio::test]
async fn add_item_creates_cart_and_prices_lines() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 3 });
    let (status, body) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["currency"], "EUR");

    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["unitPrice"], 12.5);
    assert_eq!(items[0]["lineTotal"], 37.5);
    assert_eq!(body["subtotal"], 37.5);
    assert_eq!(body["total"], 37.5);
}

#[tokio::test]
async fn repeated_add_aggregates_quantity_on_one_line() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 2 });
    send_request(&app, "POST", "/cart/items", Some(payload.clone()), None).await;
    let (status, body) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 4);
    assert_eq!(items[0]["lineTotal"], 50.0);
}

#[tokio::test]
async fn aggregation_saturates_instead_of_wrapping() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": u32::MAX });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    let payload = json!({ "productId": "sku-123", "quantity": 5 });
    let (status, body) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], u32::MAX);
}

#[tokio::test]
async fn merge_aggregation_saturates_instead_of_wrapping() {
    let (app, _) = create_test_app();

    // Guest and user both hold near-max quantities of the same product.
    let payload = json!({ "productId": "sku-123", "quantity": u32::MAX });
    let (_, guest_cart) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;
    let guest_cart_id = guest_cart["id"].as_str().unwrap();

    let payload = json!({ "productId": "sku-123", "quantity": u32::MAX });
    send_request(&app, "POST", "/cart/items", Some(payload), Some("alice")).await;

    let merge = json!({ "guestCartId": guest_cart_id });
    let (status, body) = send_request(&app, "POST", "/cart/merge", Some(merge), Some("alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["quantity"], u32::MAX);
}

#[tokio::test]
async fn add_rejects_zero_quantity_with_message_body() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 0 });
    let (status, body) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "quantity must be at least 1");
}

#[tokio::test]
async fn add_rejects_unknown_product() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-missing", "quantity": 1 });
    let (status, body) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "product not found");
}

#[tokio::test]
async fn patch_quantity_zero_removes_the_line() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 2 });
    let (_, cart) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;
    let item_id = cart["items"][0]["id"].as_str().unwrap();

    let uri = format!("/cart/items/{item_id}");
    let (status, body) =
        send_request(&app, "PATCH", &uri, Some(json!({ "quantity": 0 })), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 0);
    assert_eq!(body["subtotal"], 0.0);
}

#[tokio::test]
async fn patch_unknown_item_is_404() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    let (status, body) = send_request(
        &app,
        "PATCH",
        "/cart/items/not-a-line",
        Some(json!({ "quantity": 2 })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "cart item not found");
}

#[tokio::test]
async fn delete_of_absent_item_is_noop_success() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    let (status, body) =
        send_request(&app, "DELETE", "/cart/items/never-existed", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn clear_cart_answers_no_content_and_forgets_the_cart() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    let (status, _) = send_request(&app, "DELETE", "/cart", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_request(&app, "GET", "/cart/me", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sessions_with_different_tokens_get_isolated_carts() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), Some("alice")).await;

    let payload = json!({ "productId": "sku-456", "quantity": 2 });
    send_request(&app, "POST", "/cart/items", Some(payload), Some("bob")).await;

    let (_, alice_cart) = send_request(&app, "GET", "/cart/me", None, Some("alice")).await;
    let (_, bob_cart) = send_request(&app, "GET", "/cart/me", None, Some("bob")).await;

    assert_eq!(alice_cart["items"][0]["product"]["id"], "sku-123");
    assert_eq!(bob_cart["items"][0]["product"]["id"], "sku-456");
    assert_ne!(alice_cart["id"], bob_cart["id"]);
}

#[tokio::test]
async fn refresh_reprices_lines_and_stamps_validated_at() {
    let (app, state) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 2 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    state.reprice_product("sku-123", 15.0);
    let (status, body) = send_request(&app, "POST", "/cart/refresh", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["unitPrice"], 15.0);
    assert_eq!(body["items"][0]["lineTotal"], 30.0);
    assert!(body["validatedAt"].is_string());
}

#[tokio::test]
async fn merge_folds_guest_cart_into_user_cart() {
    let (app, state) = create_test_app();

    // Guest adds two products before logging in.
    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    let (_, guest_cart) = send_request(&app, "POST", "/cart/items", Some(payload), None).await;
    let payload = json!({ "productId": "sku-456", "quantity": 2 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;
    let guest_cart_id = guest_cart["id"].as_str().unwrap();

    // The authenticated user already has one mug in their cart.
    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), Some("alice")).await;

    let merge = json!({ "guestCartId": guest_cart_id });
    let (status, body) = send_request(&app, "POST", "/cart/merge", Some(merge), Some("alice")).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);

    let mug = items.iter().find(|i| i["product"]["id"] == "sku-123").unwrap();
    assert_eq!(mug["quantity"], 2, "mug quantities should aggregate to 1+1");

    let poster = items.iter().find(|i| i["product"]["id"] == "sku-456").unwrap();
    assert_eq!(poster["quantity"], 2);

    // The guest cart is gone afterwards.
    assert!(!state.carts.contains_key(guest_cart_id));
    let (status, _) = send_request(&app, "GET", "/cart/me", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn merge_without_guest_cart_is_a_noop() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), Some("alice")).await;

    let (status, body) = send_request(&app, "POST", "/cart/merge", Some(json!({})), Some("alice")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn validate_passes_a_fresh_cart() {
    let (app, _) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    let (status, body) = send_request(&app, "POST", "/cart/checkout/validate", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["valid"], true);
    assert_eq!(body["errors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn validate_reports_delisted_and_repriced_products() {
    let (app, state) = create_test_app();

    let payload = json!({ "productId": "sku-123", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;
    let payload = json!({ "productId": "sku-456", "quantity": 1 });
    send_request(&app, "POST", "/cart/items", Some(payload), None).await;

    state.delist_product("sku-123");
    state.reprice_product("sku-456", 21.0);

    let (status, body) = send_request(&app, "POST", "/cart/checkout/validate", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("no longer available")));
    assert!(errors.iter().any(|e| e.as_str().unwrap().contains("price changed")));
}

#[tokio::test]
async fn validate_rejects_an_empty_cart() {
    let (app, _) = create_test_app();

    let (status, body) = send_request(&app, "POST", "/cart/checkout/validate", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
    assert_eq!(body["errors"][0], "cart is empty");
}
