use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use storefront_cart_rust::backend::BackendState;
use storefront_cart_rust::cart::models::ProductSummary;
use storefront_cart_rust::router::create_app_router;

/// In-memory cart backend for local development.
#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "CART_ADDR", default_value = "0.0.0.0:8000")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    // Initialize backend state with a small demo catalog
    let state = Arc::new(BackendState::new());
    for (id, name, price) in [
        ("sku-mug", "Enamel Mug", 12.5),
        ("sku-poster", "Concert Poster", 18.0),
        ("sku-tee", "Logo T-Shirt", 24.0),
    ] {
        state.seed_product(ProductSummary {
            id: id.to_owned(),
            name: name.to_owned(),
            price,
            image: None,
        });
    }

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    tracing::info!(addr = %args.addr, "cart backend listening");

    // Start the server
    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, app)
        .await
        .expect("server terminated unexpectedly");
}
