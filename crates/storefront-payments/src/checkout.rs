//! Stripe Checkout Integration
//!
//! One-off payment for the PDF through Stripe's hosted checkout page.

use async_trait::async_trait;
use storefront_core::{PaymentStatus, SessionMetadata, SessionVerification};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionPaymentMethodTypes, Currency, StripeError,
};

use crate::error::{PaymentError, Result};
use crate::gateway::{CheckoutRequest, CheckoutSession, PaymentGateway};

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
}

impl StripeClient {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;

        Ok(Self::new(&secret_key))
    }

    /// Get the underlying Stripe client
    pub const fn inner(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let product = &request.product;

        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Payment);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);

        // Echoed back on verification
        params.metadata = Some(product.metadata());

        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            quantity: Some(1),
            price_data: Some(CreateCheckoutSessionLineItemsPriceData {
                currency: Currency::USD,
                unit_amount: Some(product.unit_amount()),
                product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                    name: product.name.clone(),
                    description: Some(product.description.clone()),
                    images: Some(vec![product.image_url.clone()]),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params)
            .await
            .map_err(|e| PaymentError::Stripe(e.to_string()))?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        tracing::info!(session_id = %session.id, "Created checkout session");

        Ok(CheckoutSession {
            id: session.id.to_string(),
            url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionVerification> {
        let id: CheckoutSessionId = session_id
            .parse()
            .map_err(|e| PaymentError::InvalidSessionId(format!("{session_id}: {e}")))?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| map_retrieve_error(e, session_id))?;

        let metadata = session.metadata.as_ref();
        let field = |key: &str| {
            metadata
                .and_then(|m| m.get(key))
                .cloned()
                .unwrap_or_default()
        };

        Ok(SessionVerification {
            payment_status: PaymentStatus::from(session.payment_status.as_str()),
            customer_email: session
                .customer_details
                .as_ref()
                .and_then(|d| d.email.clone()),
            amount_total: session.amount_total.unwrap_or_default(),
            currency: session.currency.map(|c| c.to_string()).unwrap_or_default(),
            metadata: SessionMetadata {
                product_type: field("product_type"),
                product_name: field("product_name"),
            },
        })
    }

    fn name(&self) -> &str {
        "Stripe"
    }
}

fn map_retrieve_error(error: StripeError, session_id: &str) -> PaymentError {
    match error {
        StripeError::Stripe(request_error) if request_error.http_status == 404 => {
            PaymentError::SessionNotFound(session_id.to_string())
        }
        other => PaymentError::Stripe(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_session_id_is_rejected_locally() {
        let client = StripeClient::new("sk_test_placeholder");
        let err = client.retrieve_session("not-a-session").await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidSessionId(_)));
    }
}
