//! Entitlement Context
//!
//! Wraps the shared [`EntitlementState`] with a signal so views re-render
//! when a verification starts, resolves, or the purchase is cleared.

use std::sync::Arc;

use leptos::prelude::*;
use storefront_core::{
    EntitlementCache, EntitlementSnapshot, EntitlementState, GateState, HttpSessionVerifier,
};

use crate::api;
use crate::storage::LocalStorage;

pub type BrowserEntitlement = EntitlementState<LocalStorage, HttpSessionVerifier>;

#[derive(Clone)]
pub struct EntitlementContext {
    state: Arc<BrowserEntitlement>,
    snapshot: RwSignal<EntitlementSnapshot>,
}

impl EntitlementContext {
    pub fn new(state: BrowserEntitlement) -> Self {
        let snapshot = RwSignal::new(state.snapshot());
        Self {
            state: Arc::new(state),
            snapshot,
        }
    }

    /// `localStorage` cache plus a verifier pointed at this origin's API
    pub fn from_browser() -> storefront_core::Result<Self> {
        let verifier = HttpSessionVerifier::new(&api::api_base()).or_else(|e| {
            leptos::logging::warn!("Invalid API base, using default: {e}");
            HttpSessionVerifier::new(&api::fallback_api_base())
        })?;

        Ok(Self::new(EntitlementState::new(
            EntitlementCache::new(LocalStorage),
            verifier,
        )))
    }

    /// Current state; tracked
    pub fn snapshot(&self) -> EntitlementSnapshot {
        self.snapshot.get()
    }

    /// Gate decision for protected content; tracked
    pub fn gate(&self) -> GateState {
        self.snapshot.with(EntitlementSnapshot::gate)
    }

    fn refresh(&self) {
        self.snapshot.set(self.state.snapshot());
    }

    pub fn hydrate(&self) {
        self.state.hydrate();
        self.refresh();
    }

    /// Verify a checkout session returned by Stripe; `true` when paid
    pub async fn verify(&self, session_id: String) -> bool {
        self.snapshot.update(|s| {
            s.is_loading = true;
            s.failure = None;
        });
        let paid = self.state.verify_payment(&session_id).await;
        self.refresh();
        paid
    }

    /// Forget the purchase on this device
    pub fn clear(&self) {
        self.state.clear_payment();
        self.refresh();
    }
}

/// The context provided by [`crate::App`]
pub fn use_entitlement() -> EntitlementContext {
    expect_context::<EntitlementContext>()
}
