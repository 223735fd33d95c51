/// entity-registry - resolve blockchain wallet addresses to legal entities
///
/// Client library for an on-chain identity registry: paginated fetching with
/// concurrent aggregation, merge with the deprecated flat registry, and
/// client-side filtered search over the combined set.
pub mod cache;
pub mod config;
pub mod error;
pub mod identity;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use cache::RegistryCache;
pub use config::RegistryConfig;
pub use error::{RegistryError, RegistryResult};
pub use identity::{IdentityRecord, LegacyIdentity, SearchFilter, SourceVersion, VerifiedIdentity};
pub use registry::legacy::merge_with_legacy;
pub use registry::{PageMeta, RegistryClient, RegistryPage};
pub use resolver::{RegistryResolver, RegistrySnapshot};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
