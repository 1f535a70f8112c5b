//! # storefront-core
//!
//! Payment verification, entitlement caching and access gating for the
//! PDF storefront.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     EntitlementState                          │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌────────────┐  │
//! │  │ SessionVerifier  │──│ EntitlementCache │──│ AccessGate │  │
//! │  │   (Strategy)     │  │  (KeyValueStore) │  │ (3 states) │  │
//! │  └──────────────────┘  └──────────────────┘  └────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cache is the source of truth between page loads: a paid session is
//! verified once, cached for 24 hours, and every later page reads the cache
//! instead of calling the verifier again.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_core::{EntitlementCache, EntitlementState, HttpSessionVerifier, MemoryStore};
//!
//! let state = EntitlementState::new(
//!     EntitlementCache::new(MemoryStore::new()),
//!     HttpSessionVerifier::new("http://localhost:3000/api")?,
//! );
//!
//! state.hydrate();
//! if state.verify_payment("cs_test_123").await {
//!     assert!(state.gate().is_granted());
//! }
//! ```

pub mod cache;
pub mod clock;
pub mod entitlement;
pub mod error;
pub mod gate;
pub mod product;
pub mod session;
pub mod storage;
pub mod verifier;

pub use cache::{EntitlementCache, EntitlementConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use entitlement::{EntitlementSnapshot, EntitlementState, VerificationFailure};
pub use error::{FailureKind, Result, StoreError};
pub use gate::GateState;
pub use product::ProductInfo;
pub use session::{PaymentSession, PaymentStatus, SessionMetadata, SessionVerification};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use verifier::{HttpSessionVerifier, SessionVerifier};
