//! Product Page

use leptos::prelude::*;

use storefront_core::ProductInfo;
use storefront_core::gate::DOWNLOAD_PATH;
use storefront_core::product::{DEFAULT_PRODUCT_DESCRIPTION, DEFAULT_PRODUCT_NAME, DOCUMENT_PATH};

use crate::api;
use crate::entitlement::use_entitlement;

#[component]
pub fn ProductPage() -> impl IntoView {
    let entitlement = use_entitlement();
    let (product, set_product) = signal(None::<ProductInfo>);
    let (checking_out, set_checking_out) = signal(false);
    let (error, set_error) = signal(None::<String>);

    leptos::task::spawn_local(async move {
        match api::fetch_product_info().await {
            Ok(info) => set_product.set(Some(info)),
            Err(e) => leptos::logging::warn!("Failed to load product info: {e}"),
        }
    });

    let checkout = move |_| {
        if checking_out.get_untracked() {
            return;
        }
        set_checking_out.set(true);
        set_error.set(None);
        leptos::task::spawn_local(async move {
            match api::create_checkout().await {
                Ok(url) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.location().set_href(&url);
                    }
                }
                Err(e) => {
                    leptos::logging::error!("Checkout failed: {e}");
                    set_error.set(Some(e));
                    set_checking_out.set(false);
                }
            }
        });
    };

    let preview = move |_| {
        leptos::task::spawn_local(async move {
            if !api::document_available().await {
                set_error.set(Some("PDF file not found. Please contact support.".into()));
            } else if let Err(e) = api::open_in_new_tab(DOCUMENT_PATH) {
                leptos::logging::error!("Preview failed: {e:?}");
            }
        });
    };

    let name = move || {
        product.with(|p| p.as_ref().map_or_else(|| DEFAULT_PRODUCT_NAME.to_string(), |p| p.name.clone()))
    };
    let description = move || {
        product.with(|p| {
            p.as_ref()
                .map_or_else(|| DEFAULT_PRODUCT_DESCRIPTION.to_string(), |p| p.description.clone())
        })
    };
    let price = move || {
        product.with(|p| p.as_ref().map_or_else(|| "$10.00".to_string(), ProductInfo::display_price))
    };

    view! {
        <div class="product">
            <header class="hero">
                <h1>{name}</h1>
                <p class="tagline">{description}</p>
                <div class="price">{price}<span>" one-time"</span></div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"📄 Instant PDF"</h3>
                    <p>"Download right after checkout. No account needed."</p>
                </div>
                <div class="feature">
                    <h3>"🔒 Secure checkout"</h3>
                    <p>"Payments are handled by Stripe."</p>
                </div>
                <div class="feature">
                    <h3>"♻️ 24h access"</h3>
                    <p>"Come back to the download page from this device for a full day."</p>
                </div>
            </section>

            <div class="cta">
                <button class="btn btn-primary" on:click=checkout disabled=move || checking_out.get()>
                    {move || if checking_out.get() { "Redirecting..." } else { "Buy Now" }}
                </button>
                <button class="btn" on:click=preview>"Preview"</button>
            </div>

            {move || error.get().map(|e| view! { <p class="notice error">{e}</p> })}

            {move || {
                entitlement.snapshot().is_payment_verified().then(|| view! {
                    <p class="note">
                        "Already purchased? "
                        <a href=DOWNLOAD_PATH>"Go to your download"</a>
                    </p>
                })
            }}
        </div>
    }
}
