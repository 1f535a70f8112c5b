//! Application State

use std::sync::Arc;

use storefront_payments::{PaymentGateway, ProductConfig};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (optional - None if not configured)
    pub gateway: Option<Arc<dyn PaymentGateway>>,

    /// The product on sale
    pub product: Arc<ProductConfig>,

    /// Public storefront origin, without trailing slash
    pub client_url: Arc<str>,
}
