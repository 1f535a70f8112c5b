//! Payment Success Page
//!
//! Stripe redirects here with `?session_id=...`. The session is verified once
//! on mount; the result is rendered from the entitlement snapshot.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use storefront_core::gate::{DOWNLOAD_PATH, PURCHASE_PATH};
use storefront_core::{EntitlementSnapshot, FailureKind, PaymentSession};

use crate::components::{DocumentActions, LoadingScreen, PurchaseDetails};
use crate::entitlement::use_entitlement;

#[component]
pub fn SuccessPage() -> impl IntoView {
    let entitlement = use_entitlement();
    let session_id = use_query_map()
        .with_untracked(|q| q.get("session_id"))
        .unwrap_or_default();
    let (resolved, set_resolved) = signal(false);

    {
        let entitlement = entitlement.clone();
        let session_id = session_id.clone();
        leptos::task::spawn_local(async move {
            entitlement.verify(session_id).await;
            set_resolved.set(true);
        });
    }

    move || {
        let snapshot = entitlement.snapshot();
        if !resolved.get() || snapshot.is_loading {
            return view! { <LoadingScreen message="Verifying your payment..." /> }.into_any();
        }
        outcome(snapshot, &session_id)
    }
}

fn outcome(snapshot: EntitlementSnapshot, session_id: &str) -> AnyView {
    let confirmed = snapshot
        .session
        .filter(|s| s.session_id == session_id.trim() && s.is_paid());

    match (confirmed, snapshot.failure) {
        (Some(session), _) => view! { <PaymentConfirmed session=session /> }.into_any(),
        (None, Some(failure)) if failure.kind == FailureKind::PaymentIncomplete => {
            view! { <PaymentPending /> }.into_any()
        }
        (None, failure) => {
            let message = failure.map_or_else(
                || storefront_core::error::VERIFY_FAILED_MESSAGE.to_string(),
                |f| f.message,
            );
            view! { <VerificationFailed message=message /> }.into_any()
        }
    }
}

#[component]
fn PaymentConfirmed(session: PaymentSession) -> impl IntoView {
    let product_name = session.metadata.product_name.clone();

    view! {
        <div class="success">
            <h1>"Payment Successful! 🎉"</h1>
            <p>"Thank you for your purchase. Your PDF is ready."</p>
            <PurchaseDetails session=session />
            <DocumentActions product_name=product_name />
            <p class="note">
                "You can come back to "
                <a href=DOWNLOAD_PATH>"your download page"</a>
                " from this device for the next 24 hours."
            </p>
            <a href=PURCHASE_PATH class="btn">"← Return to Home"</a>
        </div>
    }
}

#[component]
fn PaymentPending() -> impl IntoView {
    view! {
        <div class="pending">
            <h1>"Payment Pending"</h1>
            <p>"Your payment has not been completed yet. If you were charged, refresh this page in a moment."</p>
            <a href=PURCHASE_PATH class="btn">"← Return to Home"</a>
        </div>
    }
}

#[component]
fn VerificationFailed(message: String) -> impl IntoView {
    view! {
        <div class="failed">
            <h1>"Payment Verification Failed"</h1>
            <p class="notice error">{message}</p>
            <a href=PURCHASE_PATH class="btn btn-primary">"Try Again"</a>
        </div>
    }
}
