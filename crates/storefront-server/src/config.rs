//! Server Configuration

use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env`)
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind_addr: String,

    /// Public origin of the storefront; used for Stripe redirects and CORS
    pub client_url: String,

    /// Frontend bundle and the PDF deliverable
    pub static_dir: PathBuf,

    /// Use the in-memory gateway when Stripe is not configured
    pub mock_payments: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            client_url: "http://localhost:3000".into(),
            static_dir: PathBuf::from("static"),
            mock_payments: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            client_url: std::env::var("CLIENT_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.client_url),
            static_dir: std::env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            mock_payments: std::env::var("MOCK_PAYMENTS")
                .is_ok_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes")),
        }
    }
}
