//! Session Verifier
//!
//! Bridges a checkout session identifier to an authoritative payment-status
//! lookup. `HttpSessionVerifier` talks to the storefront backend's
//! `verify-session` endpoint; tests plug in scripted implementations.

use async_trait::async_trait;
use reqwest::Url;

use crate::error::{Result, StoreError};
use crate::session::SessionVerification;

/// Remote payment-status lookup (Strategy pattern)
///
/// One call is one remote request; implementations must not retry.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SessionVerifier {
    async fn verify_session(&self, session_id: &str) -> Result<SessionVerification>;
}

/// Verifier backed by `GET {base}/verify-session/{id}`
#[derive(Clone, Debug)]
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSessionVerifier {
    /// `base_url` is the API root, e.g. `https://shop.example.com/api`
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            base_url: parse_base(base_url)?,
        })
    }

    /// Same as [`Self::new`] with a per-request timeout
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: parse_base(base_url)?,
        })
    }

    /// URL for a given session id, with the id percent-encoded as one segment
    pub fn endpoint(&self, session_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push("verify-session")
            .push(session_id);
        Ok(url)
    }
}

fn parse_base(base_url: &str) -> Result<Url> {
    Url::parse(base_url).map_err(|e| StoreError::Config(format!("invalid API URL {base_url}: {e}")))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify_session(&self, session_id: &str) -> Result<SessionVerification> {
        let url = self.endpoint(session_id)?;
        tracing::debug!(%url, "Verifying checkout session");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::RemoteStatus(response.status().as_u16()));
        }

        response
            .json::<SessionVerification>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let verifier = HttpSessionVerifier::new("http://localhost:3000/api/").unwrap();
        let url = verifier.endpoint("cs_test_a1").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/verify-session/cs_test_a1");
    }

    #[test]
    fn test_endpoint_escapes_session_id() {
        let verifier = HttpSessionVerifier::new("http://localhost:3000/api").unwrap();
        let url = verifier.endpoint("../admin").unwrap();
        assert_eq!(url.path(), "/api/verify-session/..%2Fadmin");
    }

    #[test]
    fn test_relative_base_is_rejected() {
        assert!(matches!(
            HttpSessionVerifier::new("/api"),
            Err(StoreError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_verifier_is_remote_error() {
        let verifier = HttpSessionVerifier::with_timeout(
            "http://127.0.0.1:9/api",
            std::time::Duration::from_millis(500),
        )
        .unwrap();

        let err = verifier.verify_session("cs_test_1").await.unwrap_err();
        assert!(matches!(err, StoreError::Remote(_)));
    }
}
