//! Entitlement Cache
//!
//! Single-slot, self-expiring storage of the most recent paid session.
//!
//! Storage failures never reach the caller: writes that fail are logged and
//! dropped, reads that fail (missing, unreadable, corrupt, stale schema or
//! expired) come back as `None`, and anything unusable is deleted so the next
//! read starts clean.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::session::PaymentSession;
use crate::storage::KeyValueStore;

/// Storage key holding the cached session
pub const DEFAULT_STORAGE_KEY: &str = "stripe_payment_session";

/// Entitlements expire this long after they were cached
pub const EXPIRY_HOURS: i64 = 24;

/// Version tag written with every record
pub const SCHEMA_VERSION: u32 = 1;

/// Cache configuration
#[derive(Clone, Debug)]
pub struct EntitlementConfig {
    pub storage_key: String,
    pub expiry: Duration,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            expiry: Duration::hours(EXPIRY_HOURS),
        }
    }
}

/// On-disk shape: the session fields plus a schema version
#[derive(Serialize, Deserialize)]
struct StoredSession {
    version: u32,
    #[serde(flatten)]
    session: PaymentSession,
}

/// Single-slot entitlement cache
pub struct EntitlementCache<S, C = SystemClock> {
    store: S,
    clock: C,
    config: EntitlementConfig,
}

impl<S: KeyValueStore> EntitlementCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock, EntitlementConfig::default())
    }
}

impl<S: KeyValueStore, C: Clock> EntitlementCache<S, C> {
    pub const fn with_clock(store: S, clock: C, config: EntitlementConfig) -> Self {
        Self { store, clock, config }
    }

    pub const fn config(&self) -> &EntitlementConfig {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Persist `session` with a fresh timestamp, replacing any prior record.
    ///
    /// Returns the record as stamped. Only paid sessions are written; an
    /// unpaid one leaves storage untouched. A failed write is logged and
    /// otherwise ignored; the caller's in-memory copy stays authoritative.
    pub fn save(&self, session: &PaymentSession) -> PaymentSession {
        let mut stamped = session.clone();
        stamped.timestamp = self.clock.now();

        if !stamped.is_paid() {
            tracing::warn!(
                session_id = %stamped.session_id,
                payment_status = %stamped.payment_status,
                "Refusing to cache unpaid payment session"
            );
            return stamped;
        }

        let record = StoredSession {
            version: SCHEMA_VERSION,
            session: stamped,
        };

        match serde_json::to_string(&record) {
            Ok(json) => {
                if let Err(e) = self.store.set(&self.config.storage_key, &json) {
                    tracing::warn!(error = %e, "Failed to save payment session");
                } else {
                    tracing::debug!(session_id = %record.session.session_id, "Cached payment session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode payment session"),
        }

        record.session
    }

    /// Read the cached session, dropping it if corrupt or expired
    pub fn load(&self) -> Option<PaymentSession> {
        let raw = match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read payment session");
                return None;
            }
        };

        let record: StoredSession = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding corrupt payment session");
                self.clear();
                return None;
            }
        };

        if record.version != SCHEMA_VERSION {
            tracing::warn!(
                version = record.version,
                expected = SCHEMA_VERSION,
                "Discarding payment session with unknown schema version"
            );
            self.clear();
            return None;
        }

        if record.session.is_expired_at(self.clock.now(), self.config.expiry) {
            tracing::debug!(session_id = %record.session.session_id, "Payment session expired");
            self.clear();
            return None;
        }

        Some(record.session)
    }

    /// Remove the cached session
    pub fn clear(&self) {
        if let Err(e) = self.store.delete(&self.config.storage_key) {
            tracing::warn!(error = %e, "Failed to clear payment session");
        }
    }

    /// A live, paid session is cached
    pub fn has_valid_session(&self) -> bool {
        self.load().is_some_and(|session| session.is_paid())
    }
}
