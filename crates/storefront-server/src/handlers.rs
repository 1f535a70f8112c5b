//! HTTP Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use storefront_core::{ProductInfo, SessionVerification};
use storefront_payments::{CheckoutRequest, PaymentError, PaymentGateway};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn payments_disabled() -> ApiError {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "Payments not configured".into(),
            code: "PAYMENTS_DISABLED".into(),
            details: None,
        }),
    )
}

fn gateway(state: &AppState) -> Result<&dyn PaymentGateway, ApiError> {
    state.gateway.as_deref().ok_or_else(payments_disabled)
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is running".into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").into(),
        stripe_configured: state.gateway.is_some(),
    })
}

/// Product shown on the storefront page
pub async fn product_info(State(state): State<AppState>) -> Json<ProductInfo> {
    Json(state.product.info())
}

/// Create Stripe checkout session
pub async fn create_checkout_session(
    State(state): State<AppState>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let gateway = gateway(&state)?;

    let request = CheckoutRequest::for_client(state.product.as_ref().clone(), &state.client_url);

    let session = gateway.create_checkout_session(&request).await.map_err(|e| {
        tracing::error!("Error creating checkout session: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Failed to create checkout session".into(),
                code: "CHECKOUT_ERROR".into(),
                details: Some(e.user_message().into()),
            }),
        )
    })?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// Look up a checkout session's payment status
pub async fn verify_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionVerification>, ApiError> {
    let gateway = gateway(&state)?;

    let verification = gateway.retrieve_session(&session_id).await.map_err(|e| {
        let (status, code) = match &e {
            PaymentError::InvalidSessionId(_) => (StatusCode::BAD_REQUEST, "INVALID_SESSION"),
            PaymentError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "VERIFY_ERROR"),
        };
        tracing::warn!(session_id = %session_id, error = %e, "Error verifying session");
        (
            status,
            Json(ErrorResponse {
                error: "Failed to verify session".into(),
                code: code.into(),
                details: Some(e.user_message().into()),
            }),
        )
    })?;

    tracing::info!(
        session_id = %session_id,
        payment_status = %verification.payment_status,
        "Verified checkout session"
    );

    Ok(Json(verification))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request};
    use std::sync::Arc;
    use storefront_payments::{MockGateway, ProductConfig};
    use tower::ServiceExt;

    use crate::routes::router;

    fn state(gateway: Option<Arc<dyn PaymentGateway>>) -> AppState {
        AppState {
            gateway,
            product: Arc::new(ProductConfig::default()),
            client_url: Arc::from("http://localhost:3000"),
        }
    }

    fn app(gateway: Option<Arc<dyn PaymentGateway>>) -> Router {
        router(state(gateway), std::path::Path::new("does-not-exist"))
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_payments() {
        let (status, body) = send(app(None), "GET", "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stripe_configured"], false);

        let gateway: Arc<dyn PaymentGateway> = Arc::new(MockGateway::new());
        let (_, body) = send(app(Some(gateway)), "GET", "/api/health").await;
        assert_eq!(body["stripe_configured"], true);
    }

    #[tokio::test]
    async fn test_product_info() {
        let (status, body) = send(app(None), "GET", "/api/product-info").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Modern Web Development Guide");
        assert_eq!(body["price"], 10.0);
        assert_eq!(body["currency"], "USD");
    }

    #[tokio::test]
    async fn test_payments_disabled_without_gateway() {
        let (status, body) = send(app(None), "POST", "/api/create-checkout-session").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PAYMENTS_DISABLED");

        let (status, _) = send(app(None), "GET", "/api/verify-session/cs_test_1").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_checkout_then_verify() {
        let gateway = Arc::new(MockGateway::new());
        let shared: Arc<dyn PaymentGateway> = gateway.clone();

        let (status, body) = send(app(Some(shared.clone())), "POST", "/api/create-checkout-session").await;
        assert_eq!(status, StatusCode::OK);
        let session_id = body["sessionId"].as_str().unwrap().to_string();
        assert!(body["url"].as_str().unwrap().contains(&session_id));

        let uri = format!("/api/verify-session/{session_id}");
        let (status, body) = send(app(Some(shared.clone())), "GET", &uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_status"], "unpaid");

        gateway.mark_paid(&session_id).await.unwrap();
        let (_, body) = send(app(Some(shared)), "GET", &uri).await;
        let verification: SessionVerification = serde_json::from_value(body).unwrap();
        assert!(verification.payment_status.is_paid());
        assert_eq!(verification.amount_total, 1000);
        assert_eq!(verification.currency, "usd");
        assert_eq!(verification.metadata.product_type, "pdf_download");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let gateway: Arc<dyn PaymentGateway> = Arc::new(MockGateway::new());
        let (status, body) = send(app(Some(gateway)), "GET", "/api/verify-session/cs_test_nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Failed to verify session");
        assert_eq!(body["code"], "SESSION_NOT_FOUND");
        assert_eq!(body["details"], "Checkout session not found.");
    }
}
