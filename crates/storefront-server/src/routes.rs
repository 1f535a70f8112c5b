//! Router

use std::path::Path;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::handlers::{create_checkout_session, health_check, product_info, verify_session};
use crate::state::AppState;

/// Build the full application: JSON API under `/api`, everything else served
/// from `static_dir` with `index.html` as the SPA fallback.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let origin = HeaderValue::from_str(&state.client_url).map_or_else(
        |_| {
            tracing::warn!(client_url = %state.client_url, "CLIENT_URL is not a valid origin, allowing any");
            AllowOrigin::any()
        },
        AllowOrigin::exact,
    );

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any);

    let spa = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/product-info", get(product_info))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/verify-session/{session_id}", get(verify_session))
        .fallback_service(spa)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
