//! Entitlement State
//!
//! The object every page consults to decide whether the buyer may reach
//! protected content. It is built once at application start and handed to
//! consumers explicitly; there is no global instance.
//!
//! ```text
//! success page ──verify_payment(id)──▶ SessionVerifier ──▶ backend
//!                     │ paid
//!                     ▼
//!              EntitlementCache::save ──▶ KeyValueStore
//!                     │
//! download page ◀─ snapshot().gate() ◀─ hydrate() on mount
//! ```

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::cache::EntitlementCache;
use crate::clock::{Clock, SystemClock};
use crate::error::{FailureKind, Result, StoreError};
use crate::gate::GateState;
use crate::session::PaymentSession;
use crate::storage::KeyValueStore;
use crate::verifier::SessionVerifier;

/// Why the last verification did not grant access
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&StoreError> for VerificationFailure {
    fn from(err: &StoreError) -> Self {
        Self {
            kind: err.failure_kind(),
            message: err.user_message(),
        }
    }
}

/// Point-in-time copy of the entitlement state, cheap to hand to a UI
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntitlementSnapshot {
    pub session: Option<PaymentSession>,
    pub is_loading: bool,
    pub failure: Option<VerificationFailure>,
    pub hydrated: bool,
    pub verified: bool,
}

impl EntitlementSnapshot {
    pub const fn is_payment_verified(&self) -> bool {
        self.verified
    }

    pub fn error(&self) -> Option<&str> {
        self.failure.as_ref().map(|f| f.message.as_str())
    }

    pub const fn gate(&self) -> GateState {
        GateState::evaluate(self.is_loading, self.hydrated, self.verified)
    }
}

#[derive(Default)]
struct Inner {
    session: Option<PaymentSession>,
    failure: Option<VerificationFailure>,
    /// Verifications started but not yet resolved
    in_flight: usize,
    hydrated: bool,
}

/// Entitlement state: in-memory view over the cache plus call state
pub struct EntitlementState<S, V, C = SystemClock> {
    cache: EntitlementCache<S, C>,
    verifier: V,
    inner: RwLock<Inner>,
}

impl<S, V, C> EntitlementState<S, V, C>
where
    S: KeyValueStore,
    V: SessionVerifier,
    C: Clock,
{
    pub fn new(cache: EntitlementCache<S, C>, verifier: V) -> Self {
        Self {
            cache,
            verifier,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub const fn cache(&self) -> &EntitlementCache<S, C> {
        &self.cache
    }

    pub const fn verifier(&self) -> &V {
        &self.verifier
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pull the cached session into memory. Called once per page lifetime.
    ///
    /// An in-memory session from an earlier verification is kept when the
    /// cache has nothing to offer (e.g. storage is unavailable).
    pub fn hydrate(&self) -> bool {
        let stored = self.cache.load();
        {
            let mut inner = self.write();
            if stored.is_some() {
                inner.session = stored;
            }
            inner.hydrated = true;
        }
        self.is_payment_verified()
    }

    /// Verify `session_id` remotely and record the outcome.
    ///
    /// Returns `true` only when the provider reports the session as paid, in
    /// which case the session is already cached when this resolves.
    pub async fn verify_payment(&self, session_id: &str) -> bool {
        self.try_verify_payment(session_id).await.is_ok()
    }

    /// [`Self::verify_payment`] with the typed outcome
    pub async fn try_verify_payment(&self, session_id: &str) -> Result<PaymentSession> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            let err = StoreError::MissingSessionId;
            self.write().failure = Some(VerificationFailure::from(&err));
            return Err(err);
        }

        {
            let mut inner = self.write();
            inner.in_flight += 1;
            inner.failure = None;
        }

        let result = match self.verifier.verify_session(session_id).await {
            Ok(verification) if verification.payment_status.is_paid() => {
                let session =
                    PaymentSession::from_verification(verification, session_id, self.cache.now());
                Ok(self.cache.save(&session))
            }
            Ok(verification) => Err(StoreError::PaymentIncomplete(
                verification.payment_status.to_string(),
            )),
            Err(e) => Err(e),
        };

        let mut inner = self.write();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        match &result {
            Ok(session) => {
                tracing::info!(
                    session_id = %session.session_id,
                    amount_total = session.amount_total,
                    currency = %session.currency,
                    "Payment verified"
                );
                inner.session = Some(session.clone());
                inner.failure = None;
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Payment verification failed");
                inner.failure = Some(VerificationFailure::from(e));
            }
        }

        result
    }

    /// Forget the entitlement in memory and in storage
    pub fn clear_payment(&self) {
        {
            let mut inner = self.write();
            inner.session = None;
            inner.failure = None;
        }
        self.cache.clear();
    }

    /// Paid and still inside the expiry window
    pub fn is_payment_verified(&self) -> bool {
        let now = self.cache.now();
        let expiry = self.cache.config().expiry;
        self.read()
            .session
            .as_ref()
            .is_some_and(|s| s.is_paid() && !s.is_expired_at(now, expiry))
    }

    pub fn is_loading(&self) -> bool {
        self.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read().failure.as_ref().map(|f| f.message.clone())
    }

    pub fn failure(&self) -> Option<VerificationFailure> {
        self.read().failure.clone()
    }

    pub fn payment_session(&self) -> Option<PaymentSession> {
        self.read().session.clone()
    }

    pub fn snapshot(&self) -> EntitlementSnapshot {
        let verified = self.is_payment_verified();
        let inner = self.read();
        EntitlementSnapshot {
            session: inner.session.clone(),
            is_loading: inner.in_flight > 0,
            failure: inner.failure.clone(),
            hydrated: inner.hydrated,
            verified,
        }
    }

    pub fn gate(&self) -> GateState {
        self.snapshot().gate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DEFAULT_STORAGE_KEY, EntitlementConfig};
    use crate::clock::ManualClock;
    use crate::error::VERIFY_FAILED_MESSAGE;
    use crate::session::{PaymentStatus, SessionMetadata, SessionVerification};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::oneshot;

    #[derive(Clone, Copy)]
    enum Reply {
        Status(&'static str),
        HttpError(u16),
    }

    impl Reply {
        fn into_result(self) -> Result<SessionVerification> {
            match self {
                Self::Status(status) => Ok(SessionVerification {
                    payment_status: PaymentStatus::from(status),
                    customer_email: Some("buyer@example.com".into()),
                    amount_total: 1000,
                    currency: "usd".into(),
                    metadata: SessionMetadata {
                        product_type: "pdf_download".into(),
                        product_name: "Guide".into(),
                    },
                }),
                Self::HttpError(code) => Err(StoreError::RemoteStatus(code)),
            }
        }
    }

    /// Answers every call with the same reply and counts calls
    struct ScriptedVerifier {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl ScriptedVerifier {
        fn new(reply: Reply) -> Self {
            Self { reply, calls: AtomicUsize::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionVerifier for ScriptedVerifier {
        async fn verify_session(&self, _session_id: &str) -> Result<SessionVerification> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.into_result()
        }
    }

    /// Holds each call open until the test releases it
    #[derive(Default)]
    struct DeferredVerifier {
        pending: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
    }

    impl DeferredVerifier {
        fn expect(&self, session_id: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().insert(session_id.into(), rx);
            tx
        }
    }

    #[async_trait]
    impl SessionVerifier for DeferredVerifier {
        async fn verify_session(&self, session_id: &str) -> Result<SessionVerification> {
            let rx = self.pending.lock().unwrap().remove(session_id).unwrap();
            rx.await.map_err(|e| StoreError::Remote(e.to_string()))?.into_result()
        }
    }

    fn start() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    type TestState<V> = EntitlementState<Arc<MemoryStore>, V, Arc<ManualClock>>;

    fn state_with<V: SessionVerifier>(
        store: &Arc<MemoryStore>,
        clock: &Arc<ManualClock>,
        verifier: V,
    ) -> TestState<V> {
        let cache =
            EntitlementCache::with_clock(store.clone(), clock.clone(), EntitlementConfig::default());
        EntitlementState::new(cache, verifier)
    }

    fn fresh<V: SessionVerifier>(verifier: V) -> (TestState<V>, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));
        (state_with(&store, &clock, verifier), store, clock)
    }

    #[tokio::test]
    async fn test_missing_session_id_skips_remote_call() {
        let (state, store, _) = fresh(ScriptedVerifier::new(Reply::Status("paid")));

        assert!(!state.verify_payment("").await);
        assert!(!state.verify_payment("   ").await);

        assert_eq!(state.verifier().calls(), 0);
        assert_eq!(state.failure().unwrap().kind, FailureKind::MissingSessionId);
        assert_eq!(state.error().as_deref(), Some("No session ID provided"));
        assert!(!state.is_loading());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unpaid_session_is_not_cached() {
        let (state, store, _) = fresh(ScriptedVerifier::new(Reply::Status("unpaid")));

        let err = state.try_verify_payment("cs_test_pending").await.unwrap_err();

        assert!(matches!(err, StoreError::PaymentIncomplete(ref s) if s == "unpaid"));
        assert_eq!(state.verifier().calls(), 1);
        assert_eq!(state.error().as_deref(), Some("Payment not completed"));
        assert_eq!(state.failure().unwrap().kind, FailureKind::PaymentIncomplete);
        assert!(state.payment_session().is_none());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_remote_failure_sets_generic_error() {
        let (state, store, _) = fresh(ScriptedVerifier::new(Reply::HttpError(500)));

        assert!(!state.verify_payment("cs_test_1").await);

        assert_eq!(state.error().as_deref(), Some(VERIFY_FAILED_MESSAGE));
        assert_eq!(state.failure().unwrap().kind, FailureKind::Remote);
        assert!(!state.is_loading());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_paid_session_unlocks_gate() {
        let (state, _, _) = fresh(ScriptedVerifier::new(Reply::Status("paid")));
        state.hydrate();
        assert_eq!(state.gate(), GateState::Denied);

        assert!(state.verify_payment("sess_1").await);

        assert!(state.is_payment_verified());
        assert!(state.error().is_none());
        assert_eq!(state.gate(), GateState::Granted);

        let session = state.payment_session().unwrap();
        assert_eq!(session.session_id, "sess_1");
        assert_eq!(session.amount_total, 1000);
        assert_eq!(session.metadata.product_name, "Guide");
        assert_eq!(session.timestamp, start());

        // Cached before verify_payment resolved
        assert_eq!(state.cache().load(), Some(session));
    }

    #[tokio::test]
    async fn test_direct_navigation_without_cache_is_denied() {
        let (state, _, _) = fresh(ScriptedVerifier::new(Reply::Status("paid")));

        assert_eq!(state.gate(), GateState::Loading);
        assert!(!state.hydrate());
        assert_eq!(state.gate(), GateState::Denied);
        assert_eq!(state.verifier().calls(), 0);
    }

    #[tokio::test]
    async fn test_entitlement_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));

        let first = state_with(&store, &clock, ScriptedVerifier::new(Reply::Status("paid")));
        assert!(first.verify_payment("cs_test_1").await);
        drop(first);

        clock.advance(Duration::hours(3));
        let reloaded = state_with(&store, &clock, ScriptedVerifier::new(Reply::HttpError(500)));
        assert!(reloaded.hydrate());
        assert_eq!(reloaded.gate(), GateState::Granted);
        assert_eq!(reloaded.verifier().calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_reverification_keeps_cached_entitlement() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(start()));

        let first = state_with(&store, &clock, ScriptedVerifier::new(Reply::Status("paid")));
        assert!(first.verify_payment("cs_test_1").await);

        let second = state_with(&store, &clock, ScriptedVerifier::new(Reply::Status("unpaid")));
        second.hydrate();
        assert!(!second.verify_payment("cs_test_2").await);

        assert_eq!(second.cache().load().unwrap().session_id, "cs_test_1");
        assert!(second.is_payment_verified());
    }

    #[tokio::test]
    async fn test_entitlement_lapses_after_expiry() {
        let (state, store, clock) = fresh(ScriptedVerifier::new(Reply::Status("paid")));
        state.hydrate();
        assert!(state.verify_payment("cs_test_1").await);

        clock.advance(Duration::hours(24));

        assert!(!state.is_payment_verified());
        assert_eq!(state.gate(), GateState::Denied);
        assert!(!state.cache().has_valid_session());
        assert!(store.get(DEFAULT_STORAGE_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_payment_revokes_access() {
        let (state, store, _) = fresh(ScriptedVerifier::new(Reply::Status("paid")));
        state.hydrate();
        assert!(state.verify_payment("cs_test_1").await);

        state.clear_payment();
        state.clear_payment();

        assert!(state.payment_session().is_none());
        assert_eq!(state.gate(), GateState::Denied);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_gate_stays_loading_while_verification_in_flight() {
        let (state, _, _) = fresh(DeferredVerifier::default());
        state.hydrate();
        let release = state.verifier().expect("cs_test_1");

        let observe = async {
            while !state.is_loading() {
                tokio::task::yield_now().await;
            }
            let snapshot = state.snapshot();
            assert_eq!(snapshot.gate(), GateState::Loading);
            assert!(snapshot.error().is_none());
            release.send(Reply::Status("paid")).ok();
        };

        let (verified, ()) = tokio::join!(state.verify_payment("cs_test_1"), observe);

        assert!(verified);
        assert!(!state.is_loading());
        assert_eq!(state.gate(), GateState::Granted);
    }

    #[tokio::test]
    async fn test_overlapping_verifications_last_resolution_wins() {
        let (state, _, clock) = fresh(DeferredVerifier::default());
        state.hydrate();
        let first = state.verifier().expect("cs_test_a");
        let second = state.verifier().expect("cs_test_b");

        let drive = async {
            while !state.is_loading() {
                tokio::task::yield_now().await;
            }
            second.send(Reply::Status("paid")).ok();
            while state.payment_session().is_none() {
                tokio::task::yield_now().await;
            }
            // The other call is still outstanding
            assert!(state.is_loading());
            clock.advance(Duration::seconds(1));
            first.send(Reply::Status("paid")).ok();
        };

        let (a, b, ()) = tokio::join!(
            state.verify_payment("cs_test_a"),
            state.verify_payment("cs_test_b"),
            drive
        );

        assert!(a && b);
        assert!(!state.is_loading());
        assert_eq!(state.cache().load().unwrap().session_id, "cs_test_a");
        assert_eq!(state.payment_session().unwrap().session_id, "cs_test_a");
    }
}
