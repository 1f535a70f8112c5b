//! Product Info
//!
//! The single product the storefront sells, and display helpers shared by
//! the backend and the frontend.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCT_NAME: &str = "Modern Web Development Guide";

pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "A comprehensive guide to modern web development \
    practices, including React, TypeScript, and best practices for building scalable applications.";

/// Metadata tag identifying what was bought
pub const PRODUCT_TYPE: &str = "pdf_download";

/// Where the deliverable is served from
pub const DOCUMENT_PATH: &str = "/sample-document.pdf";

/// Body of `GET /api/product-info`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: String,

    /// Major units, serialized as a JSON number
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub currency: String,

    pub description: String,
}

impl ProductInfo {
    /// e.g. `$10.00`
    pub fn display_price(&self) -> String {
        format!("${:.2}", self.price)
    }
}

/// Render minor units as `$10.00 USD`
pub fn format_amount(amount_total: i64, currency: &str) -> String {
    format!("${} {}", Decimal::new(amount_total, 2), currency.to_uppercase())
}

/// File name offered to the browser for the download
pub fn download_filename(product_name: Option<&str>) -> String {
    let name = product_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_PRODUCT_NAME);
    format!("{name}.pdf")
}
