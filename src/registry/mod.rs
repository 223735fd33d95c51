/// Registry API client with concurrent page aggregation
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::identity::VerifiedIdentity;
use crate::transport::Transport;

pub mod legacy;

/// Pagination metadata attached to every listing page
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub last_page: u32,
}

/// One page of the identity listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryPage {
    pub data: Vec<VerifiedIdentity>,
    pub meta: PageMeta,
}

/// HTTP client for the identity registry API
///
/// The client is stateless and cheap to clone; concurrent page fetches
/// clone it into their tasks. Caching lives in the resolver layer, not here.
#[derive(Clone)]
pub struct RegistryClient {
    config: Arc<RegistryConfig>,
    transport: Arc<dyn Transport>,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig, transport: Arc<dyn Transport>) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            transport,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// URL for one page of the paginated listing
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}{}?page={}&limit={}",
            self.config.base_url, self.config.list_path, page, self.config.page_size
        )
    }

    /// URL for a direct identity lookup
    pub fn identity_url(&self, contract: &str, wallet: &str) -> String {
        let path = self
            .config
            .identity_path
            .replace("{contract}", &urlencoding::encode(contract))
            .replace("{wallet}", &urlencoding::encode(wallet));
        format!("{}{}", self.config.base_url, path)
    }

    /// Fetch a single listing page
    pub async fn fetch_page(&self, page: u32) -> RegistryResult<RegistryPage> {
        let url = self.page_url(page);
        debug!("Fetching registry page {} from {}", page, url);

        let response = self.transport.request(&url).await?;
        if !response.is_success() {
            return Err(RegistryError::Http {
                status: response.status,
                page: Some(page),
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| RegistryError::Decode(format!("Invalid page {page} payload: {e}")))
    }

    /// Fetch the complete listing across all pages
    ///
    /// Page 1 is fetched alone to learn the page count, then the remaining
    /// pages are fetched concurrently. Every record appears exactly once in
    /// the result; ordering across pages follows completion order. The first
    /// failing page aborts the whole aggregation, dropping in-flight fetches.
    pub async fn fetch_all(&self) -> RegistryResult<Vec<VerifiedIdentity>> {
        let first = self.fetch_page(1).await?;
        let total = first.meta.total;
        let last_page = first.meta.last_page;
        let mut records = first.data;

        if last_page > 1 {
            let mut tasks = JoinSet::new();
            for page in 2..=last_page {
                let client = self.clone();
                tasks.spawn(async move { client.fetch_page(page).await });
            }

            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(Ok(page)) => records.extend(page.data),
                    Ok(Err(e)) => return Err(e),
                    Err(e) => {
                        return Err(RegistryError::Internal(format!(
                            "Page fetch task failed: {e}"
                        )))
                    }
                }
            }
        }

        if records.len() as u64 != total {
            warn!(
                "Registry reported {} identities but {} were aggregated",
                total,
                records.len()
            );
        }

        debug!(
            "Aggregated {} identities across {} pages",
            records.len(),
            last_page
        );
        Ok(records)
    }

    /// Fetch one identity by contract and wallet address
    ///
    /// A 404 becomes `RegistryError::NotFound` so callers can tell an
    /// unregistered wallet apart from a registry outage.
    pub async fn fetch_identity(
        &self,
        contract: &str,
        wallet: &str,
    ) -> RegistryResult<VerifiedIdentity> {
        let url = self.identity_url(contract, wallet);
        debug!("Fetching identity from {}", url);

        let response = self.transport.request(&url).await?;
        if response.status == 404 {
            return Err(RegistryError::NotFound {
                contract: contract.to_string(),
                address: wallet.to_string(),
            });
        }
        if !response.is_success() {
            return Err(RegistryError::Http {
                status: response.status,
                page: None,
            });
        }

        serde_json::from_str(&response.body)
            .map_err(|e| RegistryError::Decode(format!("Invalid identity payload: {e}")))
    }
}
