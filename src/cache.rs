/// TTL caching for registry snapshots and direct identity lookups
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::identity::VerifiedIdentity;
use crate::resolver::RegistrySnapshot;

/// Shared caches keyed by request URL
///
/// Concurrent loads for the same key are coalesced into a single upstream
/// fetch; failed loads are not retained.
#[derive(Clone)]
pub struct RegistryCache {
    snapshots: Cache<String, Arc<RegistrySnapshot>>,
    identities: Cache<String, Arc<VerifiedIdentity>>,
}

impl RegistryCache {
    pub fn new(config: &RegistryConfig) -> Self {
        Self {
            snapshots: Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.snapshot_ttl_secs))
                .build(),
            identities: Cache::builder()
                .max_capacity(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.identity_ttl_secs))
                .build(),
        }
    }

    /// Return the cached snapshot under `key`, running `load` on a miss
    pub async fn snapshot<F>(&self, key: String, load: F) -> RegistryResult<Arc<RegistrySnapshot>>
    where
        F: Future<Output = RegistryResult<RegistrySnapshot>>,
    {
        self.snapshots
            .try_get_with(key, async move { load.await.map(Arc::new) })
            .await
            .map_err(unwrap_shared)
    }

    /// Return the cached identity under `key`, running `load` on a miss
    pub async fn identity<F>(&self, key: String, load: F) -> RegistryResult<Arc<VerifiedIdentity>>
    where
        F: Future<Output = RegistryResult<VerifiedIdentity>>,
    {
        self.identities
            .try_get_with(key, async move { load.await.map(Arc::new) })
            .await
            .map_err(unwrap_shared)
    }

    /// Drop every cached snapshot
    pub fn invalidate_snapshots(&self) {
        self.snapshots.invalidate_all();
    }

    /// Drop one cached identity
    pub async fn invalidate_identity(&self, key: &str) {
        self.identities.invalidate(key).await;
    }
}

fn unwrap_shared(error: Arc<RegistryError>) -> RegistryError {
    (*error).clone()
}
