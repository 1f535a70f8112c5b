//! pdf-storefront Web Frontend
//!
//! Leptos-based WASM frontend: product page, Stripe redirect landing page and
//! the protected download page.

mod api;
mod app;
mod components;
mod entitlement;
mod pages;
mod storage;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
