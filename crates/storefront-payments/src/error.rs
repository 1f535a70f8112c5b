//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Stripe API error
    #[error("Stripe error: {0}")]
    Stripe(String),

    /// Session id is not a checkout session id
    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    /// Checkout session does not exist
    #[error("Checkout session not found: {0}")]
    SessionNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub const fn user_message(&self) -> &str {
        match self {
            Self::Stripe(_) => "Payment processing failed. Please try again.",
            Self::InvalidSessionId(_) | Self::SessionNotFound(_) => "Checkout session not found.",
            Self::Config(_) => "Service configuration error.",
        }
    }
}
