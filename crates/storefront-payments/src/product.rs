//! Product Configuration
//!
//! What the storefront sells and at what price, read from the environment.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use storefront_core::product::{
    DEFAULT_PRODUCT_DESCRIPTION, DEFAULT_PRODUCT_NAME, PRODUCT_TYPE, ProductInfo,
};

pub const DEFAULT_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=500&fit=crop&auto=format";

/// The product offered at checkout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductConfig {
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// Price in USD, major units
    pub price: Decimal,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PRODUCT_NAME.into(),
            description: DEFAULT_PRODUCT_DESCRIPTION.into(),
            image_url: DEFAULT_IMAGE_URL.into(),
            price: dec!(10.00),
        }
    }
}

impl ProductConfig {
    /// Read `PDF_NAME` and `PDF_PRICE_USD`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let name = std::env::var("PDF_NAME")
            .ok()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(defaults.name);

        let price = std::env::var("PDF_PRICE_USD")
            .ok()
            .and_then(|raw| match parse_price(&raw) {
                Some(price) => Some(price),
                None => {
                    tracing::warn!(value = %raw, "Ignoring invalid PDF_PRICE_USD");
                    None
                }
            })
            .unwrap_or(defaults.price);

        Self {
            name,
            price,
            ..defaults
        }
    }

    /// Price in cents, rounded half away from zero
    pub fn unit_amount(&self) -> i64 {
        (self.price * dec!(100))
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or_default()
    }

    /// Public product description
    pub fn info(&self) -> ProductInfo {
        ProductInfo {
            name: self.name.clone(),
            price: self.price,
            currency: "USD".into(),
            description: self.description.clone(),
        }
    }

    /// Metadata attached to every checkout session
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("product_type".to_string(), PRODUCT_TYPE.to_string()),
            ("product_name".to_string(), self.name.clone()),
        ])
    }
}

fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw.trim())
        .ok()
        .filter(|p| p.is_sign_positive() && !p.is_zero())
}
