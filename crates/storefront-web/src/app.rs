//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::entitlement::EntitlementContext;
use crate::pages::{ProductPage, ProtectedDownloadPage, SuccessPage};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let entitlement = match EntitlementContext::from_browser() {
        Ok(entitlement) => entitlement,
        Err(e) => {
            leptos::logging::error!("Failed to initialize storefront: {e}");
            return view! {
                <main class="app">
                    <p class="notice error">"The storefront could not start. Please try again later."</p>
                </main>
            }
            .into_any();
        }
    };
    provide_context(entitlement.clone());

    // Restore a cached purchase once the app is mounted
    Effect::new(move |_| entitlement.hydrate());

    view! {
        <Router>
            <main class="app">
                <Routes fallback=|| view! { <p>"Page not found"</p> }>
                    <Route path=path!("/") view=ProductPage />
                    <Route path=path!("/success") view=SuccessPage />
                    <Route path=path!("/download") view=ProtectedDownloadPage />
                </Routes>
            </main>
        </Router>
    }
    .into_any()
}
