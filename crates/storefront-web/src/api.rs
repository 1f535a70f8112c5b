//! API Client

use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlAnchorElement;

use storefront_core::ProductInfo;
use storefront_core::product::DOCUMENT_PATH;

const FALLBACK_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    url: String,
}

/// Origin the app was served from
pub fn origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| FALLBACK_ORIGIN.into())
}

/// Absolute base of the JSON API
pub fn api_base() -> String {
    format!("{}/api", origin())
}

/// Same as [`api_base`] for a page served from the default dev origin
pub fn fallback_api_base() -> String {
    format!("{FALLBACK_ORIGIN}/api")
}

async fn error_message(response: reqwest::Response, default: &str) -> String {
    let data: serde_json::Value = response.json().await.unwrap_or_default();
    data["error"].as_str().unwrap_or(default).to_string()
}

/// Fetch the product shown on the storefront page
pub async fn fetch_product_info() -> Result<ProductInfo, String> {
    let response = reqwest::Client::new()
        .get(format!("{}/product-info", api_base()))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        Err(error_message(response, "Failed to load product").await)
    }
}

/// Create a Stripe checkout session and return the hosted checkout URL
pub async fn create_checkout() -> Result<String, String> {
    let response = reqwest::Client::new()
        .post(format!("{}/create-checkout-session", api_base()))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        let data: CheckoutResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(data.url)
    } else {
        Err(error_message(response, "Failed to create checkout session").await)
    }
}

/// HEAD the PDF deliverable before handing it to the browser
pub async fn document_available() -> bool {
    match reqwest::Client::new()
        .head(format!("{}{DOCUMENT_PATH}", origin()))
        .send()
        .await
    {
        Ok(response) => response.status().is_success(),
        Err(e) => {
            leptos::logging::warn!("PDF availability check failed: {e}");
            false
        }
    }
}

/// Save `href` as `filename` through a temporary anchor element
pub fn trigger_download(href: &str, filename: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document unavailable"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?;

    let link: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    link.set_href(href);
    link.set_download(filename);

    body.append_child(&link)?;
    link.click();
    body.remove_child(&link)?;
    Ok(())
}

/// Open `href` in a new tab
pub fn open_in_new_tab(href: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    window.open_with_url_and_target(href, "_blank")?;
    Ok(())
}
