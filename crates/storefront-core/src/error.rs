//! Error Types

use thiserror::Error;

/// Result type alias for storefront operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Message shown when the remote verifier cannot be reached or answers badly
pub const VERIFY_FAILED_MESSAGE: &str = "Failed to verify payment. Please contact support.";

/// Storefront error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// No checkout session identifier was supplied
    #[error("No session ID provided")]
    MissingSessionId,

    /// The provider answered, but the session is not paid yet
    #[error("Payment not completed (status: {0})")]
    PaymentIncomplete(String),

    /// Transport-level failure talking to the verifier
    #[error("Remote error: {0}")]
    Remote(String),

    /// Verifier answered with a non-success status code
    #[error("Verifier returned HTTP {0}")]
    RemoteStatus(u16),

    /// Verifier payload could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Key-value storage failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Classify the error for the verification UI
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::MissingSessionId => FailureKind::MissingSessionId,
            Self::PaymentIncomplete(_) => FailureKind::PaymentIncomplete,
            _ => FailureKind::Remote,
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingSessionId => "No session ID provided".into(),
            Self::PaymentIncomplete(_) => "Payment not completed".into(),
            Self::Remote(_) | Self::RemoteStatus(_) | Self::Decode(_) => {
                VERIFY_FAILED_MESSAGE.into()
            }
            _ => "An unexpected error occurred.".into(),
        }
    }
}

/// Coarse failure category of a verification attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Caller had no session identifier
    MissingSessionId,
    /// Business outcome: payment pending or failed
    PaymentIncomplete,
    /// Network, HTTP or payload failure
    Remote,
}
