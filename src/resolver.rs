/// Registry resolver - cache-wrapped entry points over the registry client
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::RegistryCache;
use crate::error::{RegistryError, RegistryResult};
use crate::identity::search::find_by_address;
use crate::identity::{IdentityRecord, SearchFilter, VerifiedIdentity};
use crate::registry::legacy::merge_with_legacy;
use crate::registry::RegistryClient;

/// Aggregated registry state handed back to callers
///
/// A legacy-source outage never blocks the primary records; it is carried
/// alongside them so callers can surface both independently.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    /// Merged primary and legacy records, primary first
    pub records: Vec<IdentityRecord>,
    /// Error from the legacy fetch, if one occurred while it was requested
    pub legacy_error: Option<RegistryError>,
}

impl RegistrySnapshot {
    /// Number of records in the snapshot
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// First record whose address equals `address`, case-insensitively
    pub fn find(&self, address: Option<&str>) -> Option<&IdentityRecord> {
        find_by_address(&self.records, address)
    }
}

/// Main resolver - combines the registry client with snapshot and
/// identity caching
///
/// The cache is injected so the aggregation and merge logic underneath stay
/// independently testable; repeated calls within a staleness window reuse the
/// cached snapshot, and concurrent calls for the same key share one fetch.
#[derive(Clone)]
pub struct RegistryResolver {
    client: RegistryClient,
    cache: RegistryCache,
}

impl RegistryResolver {
    /// Create a resolver from a client and its cache collaborator
    pub fn new(client: RegistryClient, cache: RegistryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key for the aggregate snapshot
    ///
    /// The snapshot spans several URLs, so the page-1 URL is extended with a
    /// marker for whether legacy entries were merged in.
    fn snapshot_key(&self, include_legacy: bool) -> String {
        let marker = if include_legacy { "legacy" } else { "primary" };
        format!("{}#{}", self.client.page_url(1), marker)
    }

    /// Fetch the full registry, optionally merged with the legacy source
    ///
    /// Served from cache within the snapshot staleness window. The primary
    /// aggregation failing fails the call; the legacy fetch failing only
    /// records the error on the snapshot.
    pub async fn registry(&self, include_legacy: bool) -> RegistryResult<Arc<RegistrySnapshot>> {
        let key = self.snapshot_key(include_legacy);
        let client = self.client.clone();

        self.cache
            .snapshot(key, async move {
                let primary: Vec<IdentityRecord> = client
                    .fetch_all()
                    .await?
                    .into_iter()
                    .map(IdentityRecord::Verified)
                    .collect();

                if !include_legacy {
                    return Ok(RegistrySnapshot {
                        records: primary,
                        legacy_error: None,
                    });
                }

                match client.fetch_legacy().await {
                    Ok(legacy) => Ok(RegistrySnapshot {
                        records: merge_with_legacy(primary, legacy),
                        legacy_error: None,
                    }),
                    Err(e) => {
                        warn!("Legacy registry unavailable, serving primary only: {}", e);
                        Ok(RegistrySnapshot {
                            records: primary,
                            legacy_error: Some(e),
                        })
                    }
                }
            })
            .await
    }

    /// Fetch the registry and filter it client-side
    ///
    /// Unmatchable criteria yield an empty list, never an error.
    pub async fn search(
        &self,
        filter: &SearchFilter,
        include_legacy: bool,
    ) -> RegistryResult<Vec<IdentityRecord>> {
        let snapshot = self.registry(include_legacy).await?;
        let matches: Vec<IdentityRecord> = snapshot
            .records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();

        debug!(
            "Search matched {} of {} records",
            matches.len(),
            snapshot.total()
        );
        Ok(matches)
    }

    /// Resolve one address against the aggregated registry
    pub async fn resolve_address(
        &self,
        address: Option<&str>,
        include_legacy: bool,
    ) -> RegistryResult<Option<IdentityRecord>> {
        let snapshot = self.registry(include_legacy).await?;
        Ok(snapshot.find(address).cloned())
    }

    /// Fetch one identity directly by contract and wallet address, cached
    pub async fn identity(
        &self,
        contract: &str,
        wallet: &str,
    ) -> RegistryResult<Arc<VerifiedIdentity>> {
        let key = self.client.identity_url(contract, wallet);
        let client = self.client.clone();
        let contract = contract.to_string();
        let wallet = wallet.to_string();

        self.cache
            .identity(key, async move { client.fetch_identity(&contract, &wallet).await })
            .await
    }

    /// Drop every cached snapshot so the next call refetches
    pub fn invalidate_registry(&self) {
        self.cache.invalidate_snapshots();
    }

    /// Drop one cached identity
    pub async fn invalidate_identity(&self, contract: &str, wallet: &str) {
        let key = self.client.identity_url(contract, wallet);
        self.cache.invalidate_identity(&key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use crate::transport::{Transport, TransportResponse};
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Transport serving canned bodies by URL, counting requests
    struct ScriptedTransport {
        responses: Mutex<HashMap<String, TransportResponse>>,
        hits: AtomicU32,
    }

    impl ScriptedTransport {
        fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                hits: AtomicU32::new(0),
            }
        }

        fn script(&self, url: &str, status: u16, body: serde_json::Value) {
            self.responses.lock().unwrap().insert(
                url.to_string(),
                TransportResponse {
                    status,
                    body: body.to_string(),
                },
            );
        }

        fn hits(&self) -> u32 {
            self.hits.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn request(&self, url: &str) -> RegistryResult<TransportResponse> {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or_else(|| RegistryError::Network(format!("No script for {}", url)))
        }
    }

    fn identity_json(address: &str, legal_name: &str) -> serde_json::Value {
        json!({
            "address": address,
            "contractAddress": "0xf260000000000000000000000000000000000001",
            "tokenId": "1",
            "txHash": "0xabc",
            "lastSyncedBlock": 100,
            "blockTime": 1_700_000_000,
            "legalName": legal_name,
            "credentials": {},
            "createdAt": "2023-04-18T09:30:00Z",
            "updatedAt": "2023-04-18T09:30:00Z"
        })
    }

    fn resolver(transport: Arc<ScriptedTransport>) -> RegistryResolver {
        let config = RegistryConfig {
            base_url: "http://registry.test".to_string(),
            page_size: 2,
            ..Default::default()
        };
        let cache = RegistryCache::new(&config);
        let client = RegistryClient::new(config, transport).unwrap();
        RegistryResolver::new(client, cache)
    }

    #[tokio::test]
    async fn test_registry_is_served_from_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [identity_json("0xaaa", "First GmbH")],
                "meta": { "total": 1, "page": 1, "lastPage": 1 }
            }),
        );

        let resolver = resolver(transport.clone());
        let first = resolver.registry(false).await.unwrap();
        let second = resolver.registry(false).await.unwrap();

        assert_eq!(first.total(), 1);
        assert_eq!(second.total(), 1);
        assert_eq!(transport.hits(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_registry_forces_refetch() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [identity_json("0xaaa", "First GmbH")],
                "meta": { "total": 1, "page": 1, "lastPage": 1 }
            }),
        );

        let resolver = resolver(transport.clone());
        resolver.registry(false).await.unwrap();
        resolver.invalidate_registry();
        resolver.registry(false).await.unwrap();

        assert_eq!(transport.hits(), 2);
    }

    #[tokio::test]
    async fn test_legacy_outage_degrades_to_primary_records() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [identity_json("0xaaa", "First GmbH")],
                "meta": { "total": 1, "page": 1, "lastPage": 1 }
            }),
        );
        transport.script(
            "http://localhost:3000/legacy/identities.json",
            503,
            json!({}),
        );

        let resolver = resolver(transport);
        let snapshot = resolver.registry(true).await.unwrap();

        assert_eq!(snapshot.total(), 1);
        assert!(matches!(
            snapshot.legacy_error,
            Some(RegistryError::Http { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_legacy_entries_are_merged_into_snapshot() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [identity_json("0xaaa", "First GmbH")],
                "meta": { "total": 1, "page": 1, "lastPage": 1 }
            }),
        );
        transport.script(
            "http://localhost:3000/legacy/identities.json",
            200,
            json!({
                "0xAAA": "Shadowed Corp",
                "0xbbb": "Old Corp"
            }),
        );

        let resolver = resolver(transport);
        let snapshot = resolver.registry(true).await.unwrap();

        assert_eq!(snapshot.total(), 2);
        assert!(snapshot.legacy_error.is_none());
        // The primary record shadows the legacy entry at the same address
        let hit = snapshot.find(Some("0xAaA")).unwrap();
        assert_eq!(hit.legal_name(), Some("First GmbH"));
    }

    #[tokio::test]
    async fn test_search_filters_cached_snapshot() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [
                    identity_json("0xaaa", "deltaDAO AG"),
                    identity_json("0xbbb", "Other Corp")
                ],
                "meta": { "total": 2, "page": 1, "lastPage": 1 }
            }),
        );

        let resolver = resolver(transport.clone());
        let filter = SearchFilter {
            legal_name: Some("deltadao".to_string()),
            ..Default::default()
        };
        let matches = resolver.search(&filter, false).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].address(), "0xaaa");

        let none = SearchFilter {
            legal_name: Some("NonExistentCompany".to_string()),
            ..Default::default()
        };
        assert!(resolver.search(&none, false).await.unwrap().is_empty());
        assert_eq!(transport.hits(), 1);
    }

    #[tokio::test]
    async fn test_resolve_address_scans_snapshot() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities?page=1&limit=2",
            200,
            json!({
                "data": [identity_json("0xAbCd", "deltaDAO AG")],
                "meta": { "total": 1, "page": 1, "lastPage": 1 }
            }),
        );

        let resolver = resolver(transport);
        let hit = resolver.resolve_address(Some("0xABCD"), false).await.unwrap();
        assert_eq!(hit.map(|r| r.address().to_string()), Some("0xAbCd".to_string()));

        let miss = resolver.resolve_address(None, false).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_identity_fetch_is_cached_and_invalidated() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities/0xf26/0xaaa",
            200,
            identity_json("0xaaa", "First GmbH"),
        );

        let resolver = resolver(transport.clone());
        resolver.identity("0xf26", "0xaaa").await.unwrap();
        resolver.identity("0xf26", "0xaaa").await.unwrap();
        assert_eq!(transport.hits(), 1);

        resolver.invalidate_identity("0xf26", "0xaaa").await;
        resolver.identity("0xf26", "0xaaa").await.unwrap();
        assert_eq!(transport.hits(), 2);
    }

    #[tokio::test]
    async fn test_identity_not_found_is_distinct() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.script(
            "http://registry.test/api/identities/0xf26/0xdead",
            404,
            json!({ "message": "not found" }),
        );

        let resolver = resolver(transport);
        let error = resolver.identity("0xf26", "0xdead").await.unwrap_err();
        assert!(error.is_not_found());
    }
}
