/// Transport boundary for registry requests
///
/// The client only needs `GET url -> status + body`; everything above the
/// transport decodes bodies and maps statuses itself so page context can be
/// attached to failures. Tests inject their own implementation.
use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use async_trait::async_trait;
use std::time::Duration;

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    /// Whether the status code is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the actual network request for a URL
///
/// Implementations reject only on connection failure; non-success statuses
/// are returned as responses for the caller to interpret.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, url: &str) -> RegistryResult<TransportResponse>;
}

/// Default transport backed by a shared reqwest client
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the configured timeout and User-Agent
    pub fn new(config: &RegistryConfig) -> RegistryResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RegistryError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, url: &str) -> RegistryResult<TransportResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::Network(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RegistryError::Network(format!("Failed to read response body: {}", e)))?;

        Ok(TransportResponse { status, body })
    }
}
