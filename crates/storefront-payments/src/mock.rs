//! Mock Payment Gateway
//!
//! For tests and local demos without a Stripe account. Sessions live in
//! memory; in auto-pay mode checkout "completes" instantly and redirects
//! straight to the success URL.

use std::collections::HashMap;

use async_trait::async_trait;
use storefront_core::{PaymentStatus, SessionMetadata, SessionVerification};
use tokio::sync::RwLock;

use crate::error::{PaymentError, Result};
use crate::gateway::{CHECKOUT_SESSION_PLACEHOLDER, CheckoutRequest, CheckoutSession, PaymentGateway};

/// In-memory gateway
#[derive(Default)]
pub struct MockGateway {
    sessions: RwLock<HashMap<String, SessionVerification>>,
    auto_pay: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions are created already paid and redirect to the success URL
    pub fn auto_pay() -> Self {
        Self {
            auto_pay: true,
            ..Self::default()
        }
    }

    /// Seed a session
    pub async fn insert(&self, session_id: impl Into<String>, verification: SessionVerification) {
        self.sessions.write().await.insert(session_id.into(), verification);
    }

    /// Flip an existing session to paid
    pub async fn mark_paid(&self, session_id: &str) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))?;
        session.payment_status = PaymentStatus::Paid;
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let id = format!("cs_test_{}", uuid::Uuid::new_v4().simple());
        let product = &request.product;

        let status = if self.auto_pay {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        };

        self.insert(
            id.clone(),
            SessionVerification {
                payment_status: status,
                customer_email: None,
                amount_total: product.unit_amount(),
                currency: "usd".into(),
                metadata: SessionMetadata {
                    product_type: storefront_core::product::PRODUCT_TYPE.into(),
                    product_name: product.name.clone(),
                },
            },
        )
        .await;

        let url = if self.auto_pay {
            request.success_url.replace(CHECKOUT_SESSION_PLACEHOLDER, &id)
        } else {
            format!("https://checkout.stripe.com/c/pay/{id}")
        };

        tracing::debug!(session_id = %id, auto_pay = self.auto_pay, "Created mock checkout session");

        Ok(CheckoutSession { id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<SessionVerification> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::SessionNotFound(session_id.to_string()))
    }

    fn name(&self) -> &str {
        "MockGateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductConfig;

    fn request() -> CheckoutRequest {
        CheckoutRequest::for_client(ProductConfig::default(), "http://localhost:3000")
    }

    #[tokio::test]
    async fn test_checkout_then_retrieve() {
        let gateway = MockGateway::new();
        let session = gateway.create_checkout_session(&request()).await.unwrap();

        assert!(session.id.starts_with("cs_test_"));
        assert!(session.url.starts_with("https://checkout.stripe.com/"));

        let verification = gateway.retrieve_session(&session.id).await.unwrap();
        assert_eq!(verification.payment_status, PaymentStatus::Unpaid);
        assert_eq!(verification.amount_total, 1000);
        assert_eq!(verification.metadata.product_type, "pdf_download");

        gateway.mark_paid(&session.id).await.unwrap();
        let verification = gateway.retrieve_session(&session.id).await.unwrap();
        assert!(verification.payment_status.is_paid());
    }

    #[tokio::test]
    async fn test_auto_pay_redirects_to_success_page() {
        let gateway = MockGateway::auto_pay();
        let session = gateway.create_checkout_session(&request()).await.unwrap();

        assert_eq!(
            session.url,
            format!("http://localhost:3000/success?session_id={}", session.id)
        );
        assert!(gateway.retrieve_session(&session.id).await.unwrap().payment_status.is_paid());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let gateway = MockGateway::new();
        assert!(matches!(
            gateway.retrieve_session("cs_test_missing").await,
            Err(PaymentError::SessionNotFound(_))
        ));
        assert!(gateway.mark_paid("cs_test_missing").await.is_err());
        assert_eq!(gateway.len().await, 0);
    }
}
