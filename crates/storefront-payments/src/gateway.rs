//! Payment Gateway
//!
//! The two provider operations the backend needs: open a checkout session and
//! look one up again when the buyer comes back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use storefront_core::SessionVerification;

use crate::error::Result;
use crate::product::ProductConfig;

/// Placeholder Stripe substitutes with the real session id on redirect
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Payment provider (Strategy pattern)
///
/// Implemented by [`crate::StripeClient`] and [`crate::MockGateway`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a hosted checkout session
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Read back a checkout session's payment state
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionVerification>;

    /// Gateway name
    fn name(&self) -> &str;
}

/// Request to create a checkout session
#[derive(Clone, Debug)]
pub struct CheckoutRequest {
    /// Product being purchased
    pub product: ProductConfig,

    /// URL to redirect after successful payment
    pub success_url: String,

    /// URL to redirect if checkout is cancelled
    pub cancel_url: String,
}

impl CheckoutRequest {
    /// Redirect back to `{client_url}/success` and `{client_url}/`
    pub fn for_client(product: ProductConfig, client_url: &str) -> Self {
        let base = client_url.trim_end_matches('/');
        Self {
            product,
            success_url: format!("{base}/success?session_id={CHECKOUT_SESSION_PLACEHOLDER}"),
            cancel_url: format!("{base}/"),
        }
    }
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,

    /// URL to redirect user to
    pub url: String,
}
