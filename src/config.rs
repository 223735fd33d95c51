/// Configuration for the registry client
use crate::error::{RegistryError, RegistryResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Registry endpoints, pagination, transport, and cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Origin of the registry API (scheme + host, no trailing slash)
    pub base_url: String,
    /// Path of the paginated list endpoint
    pub list_path: String,
    /// Path template of the single-identity endpoint; must contain the
    /// `{contract}` and `{wallet}` placeholders
    pub identity_path: String,
    /// Full URL of the deprecated flat registry document
    pub legacy_url: String,
    /// `limit` query value sent with every page request
    pub page_size: u32,
    /// Timeout applied to each HTTP request
    pub request_timeout_secs: u64,
    /// User-Agent header for HTTP requests
    pub user_agent: String,
    /// Staleness window for cached registry snapshots
    pub snapshot_ttl_secs: u64,
    /// Staleness window for directly fetched identities
    pub identity_ttl_secs: u64,
    /// Max entries per cache
    pub cache_capacity: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            list_path: "/api/identities".to_string(),
            identity_path: "/api/identities/{contract}/{wallet}".to_string(),
            legacy_url: "http://localhost:3000/legacy/identities.json".to_string(),
            page_size: 100,
            request_timeout_secs: 10,
            user_agent: "entity-registry/0.1".to_string(),
            snapshot_ttl_secs: 300,
            identity_ttl_secs: 3600,
            cache_capacity: 1024,
        }
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> RegistryResult<Self> {
        dotenv::dotenv().ok();

        let defaults = Self::default();

        let base_url = env::var("REGISTRY_BASE_URL").unwrap_or(defaults.base_url);
        let list_path = env::var("REGISTRY_LIST_PATH").unwrap_or(defaults.list_path);
        let identity_path = env::var("REGISTRY_IDENTITY_PATH").unwrap_or(defaults.identity_path);
        let legacy_url = env::var("REGISTRY_LEGACY_URL").unwrap_or(defaults.legacy_url);

        let page_size = env::var("REGISTRY_PAGE_SIZE")
            .unwrap_or_else(|_| defaults.page_size.to_string())
            .parse()
            .map_err(|_| RegistryError::Config("Invalid REGISTRY_PAGE_SIZE".to_string()))?;

        let request_timeout_secs = env::var("REGISTRY_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.request_timeout_secs.to_string())
            .parse()
            .unwrap_or(defaults.request_timeout_secs);
        let user_agent = env::var("REGISTRY_USER_AGENT").unwrap_or(defaults.user_agent);

        let snapshot_ttl_secs = env::var("REGISTRY_SNAPSHOT_TTL_SECS")
            .unwrap_or_else(|_| defaults.snapshot_ttl_secs.to_string())
            .parse()
            .unwrap_or(defaults.snapshot_ttl_secs);
        let identity_ttl_secs = env::var("REGISTRY_IDENTITY_TTL_SECS")
            .unwrap_or_else(|_| defaults.identity_ttl_secs.to_string())
            .parse()
            .unwrap_or(defaults.identity_ttl_secs);
        let cache_capacity = env::var("REGISTRY_CACHE_CAPACITY")
            .unwrap_or_else(|_| defaults.cache_capacity.to_string())
            .parse()
            .unwrap_or(defaults.cache_capacity);

        Ok(Self {
            base_url,
            list_path,
            identity_path,
            legacy_url,
            page_size,
            request_timeout_secs,
            user_agent,
            snapshot_ttl_secs,
            identity_ttl_secs,
            cache_capacity,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> RegistryResult<()> {
        if self.base_url.is_empty() {
            return Err(RegistryError::Config(
                "Registry base URL cannot be empty".to_string(),
            ));
        }

        if self.page_size == 0 {
            return Err(RegistryError::Config(
                "Page size must be at least 1".to_string(),
            ));
        }

        if !self.identity_path.contains("{contract}") || !self.identity_path.contains("{wallet}") {
            return Err(RegistryError::Config(
                "Identity path must contain {contract} and {wallet} placeholders".to_string(),
            ));
        }

        Ok(())
    }
}
