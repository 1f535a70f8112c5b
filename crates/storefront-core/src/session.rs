//! Payment Session Model
//!
//! The verified-entitlement record and the payload returned by the
//! verify-session endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::product::format_amount;

/// Checkout payment status as reported by Stripe
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    /// Any value we do not know about yet
    Other(String),
}

impl PaymentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Paid => "paid",
            Self::Unpaid => "unpaid",
            Self::NoPaymentRequired => "no_payment_required",
            Self::Other(s) => s,
        }
    }

    /// Only `paid` grants an entitlement
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl From<String> for PaymentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "paid" => Self::Paid,
            "unpaid" => Self::Unpaid,
            "no_payment_required" => Self::NoPaymentRequired,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for PaymentStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<PaymentStatus> for String {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata echoed back from checkout creation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default)]
    pub product_type: String,

    #[serde(default)]
    pub product_name: String,
}

/// Body of `GET /api/verify-session/{id}`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionVerification {
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub customer_email: Option<String>,

    /// Minor currency units
    #[serde(default)]
    pub amount_total: i64,

    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub metadata: SessionMetadata,
}

/// A verified payment, as held in memory and in the entitlement cache
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub payment_status: PaymentStatus,

    #[serde(default)]
    pub customer_email: Option<String>,

    pub amount_total: i64,

    pub currency: String,

    #[serde(default)]
    pub metadata: SessionMetadata,

    /// Identifier the session was verified under
    pub session_id: String,

    /// When this record was cached (not when the payment happened)
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl PaymentSession {
    /// Build a full record from a verifier response
    pub fn from_verification(
        verification: SessionVerification,
        session_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            payment_status: verification.payment_status,
            customer_email: verification.customer_email,
            amount_total: verification.amount_total,
            currency: verification.currency,
            metadata: verification.metadata,
            session_id: session_id.into(),
            timestamp,
        }
    }

    pub const fn is_paid(&self) -> bool {
        self.payment_status.is_paid()
    }

    /// Age of the cached record at `now`
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.timestamp
    }

    /// A record is expired once its age reaches the window
    pub fn is_expired_at(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age_at(now) >= window
    }

    /// e.g. `$10.00 USD`
    pub fn formatted_amount(&self) -> String {
        format_amount(self.amount_total, &self.currency)
    }
}
