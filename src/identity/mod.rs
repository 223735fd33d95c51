/// Identity records served by the on-chain registry
///
/// The current registry mints one verified identity per wallet address and
/// attaches the credential documents presented at verification time. The
/// deprecated registry only ever mapped addresses to legal names. Both kinds
/// flow through the client as one version-tagged record.
pub mod country;
pub mod search;

pub use search::SearchFilter;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Version tag naming the source a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceVersion {
    /// Current on-chain registry
    #[serde(rename = "v1")]
    V1,
    /// Deprecated flat registry
    #[serde(rename = "legacy")]
    Legacy,
}

/// Identity minted in the current registry
///
/// Immutable once fetched; `credentials` maps each credential-type name to
/// the arbitrary key-value document the registry stored for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    pub address: String,
    pub contract_address: String,
    /// Token id as emitted by the chain (uint256, so kept as a string)
    pub token_id: String,
    pub tx_hash: String,
    pub last_synced_block: u64,
    /// Block timestamp, epoch seconds
    pub block_time: u64,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub presentation_url: Option<String>,
    #[serde(default)]
    pub credentials: HashMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry parsed from the deprecated flat registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyIdentity {
    pub address: String,
    pub legal_name: String,
}

/// A registry entry from either source
///
/// Tagged union so consumers (the match evaluator in particular) handle the
/// two sources exhaustively instead of probing for missing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "version")]
pub enum IdentityRecord {
    #[serde(rename = "v1")]
    Verified(VerifiedIdentity),
    #[serde(rename = "legacy")]
    Legacy(LegacyIdentity),
}

impl IdentityRecord {
    /// Wallet address of the entry, as stored
    pub fn address(&self) -> &str {
        match self {
            IdentityRecord::Verified(identity) => &identity.address,
            IdentityRecord::Legacy(identity) => &identity.address,
        }
    }

    /// Legal name, if the source carries one
    pub fn legal_name(&self) -> Option<&str> {
        match self {
            IdentityRecord::Verified(identity) => identity.legal_name.as_deref(),
            IdentityRecord::Legacy(identity) => Some(identity.legal_name.as_str()),
        }
    }

    /// Version tag of the originating source
    pub fn version(&self) -> SourceVersion {
        match self {
            IdentityRecord::Verified(_) => SourceVersion::V1,
            IdentityRecord::Legacy(_) => SourceVersion::Legacy,
        }
    }
}
