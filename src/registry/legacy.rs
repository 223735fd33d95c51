/// Deprecated flat-registry source and the merge into the primary listing
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{RegistryError, RegistryResult};
use crate::identity::{IdentityRecord, LegacyIdentity};
use crate::registry::RegistryClient;

impl RegistryClient {
    /// Fetch the legacy registry, a flat JSON object mapping wallet
    /// addresses to legal names
    pub async fn fetch_legacy(&self) -> RegistryResult<Vec<LegacyIdentity>> {
        let url = self.config().legacy_url.clone();
        debug!("Fetching legacy registry from {}", url);

        let response = self.transport.request(&url).await?;
        if !response.is_success() {
            return Err(RegistryError::Http {
                status: response.status,
                page: None,
            });
        }

        let entries: HashMap<String, String> = serde_json::from_str(&response.body)
            .map_err(|e| RegistryError::Decode(format!("Invalid legacy payload: {e}")))?;

        let identities: Vec<LegacyIdentity> = entries
            .into_iter()
            .map(|(address, legal_name)| LegacyIdentity {
                address,
                legal_name,
            })
            .collect();

        debug!("Fetched {} legacy identities", identities.len());
        Ok(identities)
    }
}

/// Append legacy entries to the primary listing, deduplicating by address
///
/// Primary records always win: a legacy entry whose address already appears
/// in the primary set, compared case-insensitively, is dropped. Addresses
/// keep whatever casing their source stored.
pub fn merge_with_legacy(
    primary: Vec<IdentityRecord>,
    legacy: Vec<LegacyIdentity>,
) -> Vec<IdentityRecord> {
    let mut known: HashSet<String> = primary
        .iter()
        .map(|record| record.address().to_lowercase())
        .collect();

    let mut merged = primary;
    for entry in legacy {
        if known.insert(entry.address.to_lowercase()) {
            merged.push(IdentityRecord::Legacy(entry));
        }
    }
    merged
}
