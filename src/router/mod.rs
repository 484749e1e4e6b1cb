//! Routing module for the cart backend

use crate::backend::state::SharedState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates and configures the backend router with all routes and middleware
pub fn create_app_router(state: SharedState) -> axum::Router {
    // Middleware: CORS (Permissive for local dev)
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes
    axum::Router::new()
        .merge(crate::backend::routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
