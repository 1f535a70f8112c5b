//! UI Components

use leptos::prelude::*;

use storefront_core::PaymentSession;
use storefront_core::gate::PURCHASE_PATH;
use storefront_core::product::{DOCUMENT_PATH, download_filename};

use crate::api;
use crate::entitlement::use_entitlement;

const NOT_FOUND_MESSAGE: &str = "PDF file not found. Please contact support.";
const DOWNLOAD_FAILED_MESSAGE: &str = "Download failed. Please try again later.";

/// Full-page spinner
#[component]
pub fn LoadingScreen(message: &'static str) -> impl IntoView {
    view! {
        <div class="loading-screen">
            <div class="spinner"></div>
            <p>{message}</p>
        </div>
    }
}

/// Default screen for buyers without a verified purchase
#[component]
pub fn AccessRestricted() -> impl IntoView {
    view! {
        <div class="access-restricted">
            <h2>"Access Restricted"</h2>
            <p>"You need to purchase this document to access it."</p>
            <a href=PURCHASE_PATH class="btn btn-primary">"Purchase Now"</a>
            <p class="note">"Already purchased? Your access is restored automatically on this device."</p>
        </div>
    }
}

/// Renders `children` only for a verified buyer.
///
/// While a verification is in flight or the cache has not been read yet the
/// loading screen is shown, never the denial.
#[component]
pub fn ProtectedRoute(
    children: ChildrenFn,
    #[prop(optional, into)] fallback: Option<ViewFn>,
) -> impl IntoView {
    let entitlement = use_entitlement();

    move || {
        entitlement.gate().render(
            || view! { <LoadingScreen message="Verifying access..." /> }.into_any(),
            || children(),
            || {
                fallback
                    .as_ref()
                    .map_or_else(|| view! { <AccessRestricted /> }.into_any(), ViewFn::run)
            },
        )
    }
}

/// Receipt for a paid session
#[component]
pub fn PurchaseDetails(session: PaymentSession) -> impl IntoView {
    let product = Some(session.metadata.product_name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "PDF Document".into());
    let amount = session.formatted_amount();
    let email = session.customer_email.clone();
    let status = session.payment_status.to_string();

    view! {
        <div class="purchase-details">
            <h3>"Purchase Details"</h3>
            <dl>
                <dt>"Product"</dt><dd>{product}</dd>
                <dt>"Amount"</dt><dd>{amount}</dd>
                <dt>"Type"</dt><dd>"Digital Download"</dd>
                {email.map(|email| view! { <dt>"Email"</dt><dd>{email}</dd> })}
                <dt>"Status"</dt><dd class="status-paid">{status}</dd>
            </dl>
        </div>
    }
}

/// Download and preview buttons for the PDF deliverable
#[component]
pub fn DocumentActions(product_name: String) -> impl IntoView {
    let (notice, set_notice) = signal(None::<&'static str>);
    let (busy, set_busy) = signal(false);
    let filename = download_filename(Some(&product_name));

    let download = move |_| {
        if busy.get_untracked() {
            return;
        }
        set_busy.set(true);
        set_notice.set(None);
        let filename = filename.clone();
        leptos::task::spawn_local(async move {
            if !api::document_available().await {
                set_notice.set(Some(NOT_FOUND_MESSAGE));
            } else if let Err(e) = api::trigger_download(DOCUMENT_PATH, &filename) {
                leptos::logging::error!("Download failed: {e:?}");
                set_notice.set(Some(DOWNLOAD_FAILED_MESSAGE));
            }
            set_busy.set(false);
        });
    };

    let preview = move |_| {
        set_notice.set(None);
        leptos::task::spawn_local(async move {
            if !api::document_available().await {
                set_notice.set(Some(NOT_FOUND_MESSAGE));
            } else if let Err(e) = api::open_in_new_tab(DOCUMENT_PATH) {
                leptos::logging::error!("Preview failed: {e:?}");
                set_notice.set(Some(DOWNLOAD_FAILED_MESSAGE));
            }
        });
    };

    view! {
        <div class="document-actions">
            <button class="btn btn-primary" on:click=download disabled=move || busy.get()>
                {move || if busy.get() { "Downloading..." } else { "Download PDF" }}
            </button>
            <button class="btn" on:click=preview>"Preview"</button>
            {move || notice.get().map(|text| view! { <p class="notice error">{text}</p> })}
        </div>
    }
}
