//! # storefront-payments
//!
//! Stripe Checkout integration for the PDF storefront.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────────────┐
//! │  Storefront │────▶│  Stripe Hosted  │────▶│  /success?session_id │
//! │  (product)  │     │  Checkout Page  │     │  (verify + unlock)   │
//! └─────────────┘     └─────────────────┘     └──────────────────────┘
//! ```
//!
//! The backend only creates sessions and reads them back; nothing about a
//! purchase is stored server-side. Entitlement lives in the buyer's browser
//! (see `storefront-core`).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_payments::{CheckoutRequest, PaymentGateway, ProductConfig, StripeClient};
//!
//! let client = StripeClient::new("sk_test_xxx");
//!
//! let session = client
//!     .create_checkout_session(&CheckoutRequest::for_client(
//!         ProductConfig::from_env(),
//!         "https://yoursite.com",
//!     ))
//!     .await?;
//!
//! // Redirect user to: session.url
//! ```

mod checkout;
mod error;
mod gateway;
mod mock;
mod product;

pub use checkout::StripeClient;
pub use error::{PaymentError, Result};
pub use gateway::{CHECKOUT_SESSION_PLACEHOLDER, CheckoutRequest, CheckoutSession, PaymentGateway};
pub use mock::MockGateway;
pub use product::{DEFAULT_IMAGE_URL, ProductConfig};
