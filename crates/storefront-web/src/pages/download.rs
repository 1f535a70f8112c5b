//! Download Page

use leptos::prelude::*;

use storefront_core::gate::PURCHASE_PATH;

use crate::components::{DocumentActions, ProtectedRoute, PurchaseDetails};
use crate::entitlement::use_entitlement;

/// The download page behind the access gate
#[component]
pub fn ProtectedDownloadPage() -> impl IntoView {
    view! {
        <ProtectedRoute>
            <DownloadPage />
        </ProtectedRoute>
    }
}

#[component]
fn DownloadPage() -> impl IntoView {
    let entitlement = use_entitlement();
    let reset = entitlement.clone();

    move || {
        entitlement.snapshot().session.map(|session| {
            let product_name = session.metadata.product_name.clone();
            let reset = reset.clone();
            view! {
                <div class="download">
                    <h1>"Your Download"</h1>
                    <PurchaseDetails session=session />
                    <DocumentActions product_name=product_name />
                    <div class="footer-actions">
                        <a href=PURCHASE_PATH class="btn">"← Return to Home"</a>
                        <button class="btn btn-link" on:click=move |_| reset.clear()>
                            "Remove access from this device"
                        </button>
                    </div>
                </div>
            }
        })
    }
}
