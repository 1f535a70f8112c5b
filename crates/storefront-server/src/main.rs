//! pdf-storefront HTTP Server
//!
//! Axum-based backend for the storefront: creates Stripe Checkout sessions,
//! reports their payment status back to the browser, and serves the WASM
//! frontend together with the PDF deliverable.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_payments::{MockGateway, PaymentGateway, ProductConfig, StripeClient};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();
    let product = ProductConfig::from_env();

    tracing::info!(name = %product.name, price = %product.price, "Product configured");

    // Initialize payments
    let gateway: Option<Arc<dyn PaymentGateway>> = match StripeClient::from_env() {
        Ok(stripe) => {
            tracing::info!("✓ Stripe configured");
            Some(Arc::new(stripe))
        }
        Err(_) if config.mock_payments => {
            tracing::warn!("⚠ Using mock payments - every checkout is marked paid");
            Some(Arc::new(MockGateway::auto_pay()))
        }
        Err(_) => {
            tracing::warn!("⚠ Stripe not configured - payments disabled");
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env (or MOCK_PAYMENTS=1 for a local demo)");
            None
        }
    };

    // Build application state
    let state = AppState {
        gateway,
        product: Arc::new(product),
        client_url: Arc::from(config.client_url.as_str()),
    };

    let app = routes::router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 pdf-storefront running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /api/health                    - Health check");
    tracing::info!("  GET  /api/product-info              - Product details");
    tracing::info!("  POST /api/create-checkout-session   - Create Stripe checkout");
    tracing::info!("  GET  /api/verify-session/{{id}}       - Verify payment");
    tracing::info!("  GET  /*                             - Frontend from {}", config.static_dir.display());
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
