/// Unified error types for registry operations
use thiserror::Error;

/// Main error type for the registry client
///
/// Variants carry owned strings and primitives so the enum stays `Clone`;
/// cached results (and the errors moka shares between coalesced callers) are
/// handed to more than one caller.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// Transport failed before a status code was received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success status from the registry API
    #[error("Registry returned HTTP {status}{}", .page.map(|p| format!(" for page {p}")).unwrap_or_default())]
    Http { status: u16, page: Option<u32> },

    /// No identity registered for the requested contract + wallet pair
    #[error("No identity registered for {address} under contract {contract}")]
    NotFound { contract: String, address: String },

    /// Response body did not decode to the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (task join failures and the like)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RegistryError {
    /// True for the distinct "identity does not exist" outcome of a direct
    /// fetch, as opposed to a transient failure
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
