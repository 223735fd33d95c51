/// Client-side filtering over merged identity records
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::{country, IdentityRecord, VerifiedIdentity};

/// Search criteria applied against the aggregated registry
///
/// All criteria are optional and combined with AND semantics. An empty
/// string is treated the same as an absent criterion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    /// Exact wallet address, compared case-insensitively
    pub address: Option<String>,
    /// Case-insensitive substring of the legal name
    pub legal_name: Option<String>,
    /// Case-insensitive substring matched against every credential value
    pub registration_number: Option<String>,
    /// ISO 3166-1 alpha-2 country code
    pub country: Option<String>,
}

impl SearchFilter {
    /// True when no usable criterion is present
    pub fn is_empty(&self) -> bool {
        present(&self.address).is_none()
            && present(&self.legal_name).is_none()
            && present(&self.registration_number).is_none()
            && present(&self.country).is_none()
    }

    /// Check a single record against every present criterion
    pub fn matches(&self, record: &IdentityRecord) -> bool {
        if let Some(address) = present(&self.address) {
            if !record.address().eq_ignore_ascii_case(address) {
                return false;
            }
        }

        if let Some(name) = present(&self.legal_name) {
            let needle = name.to_lowercase();
            match record.legal_name() {
                Some(legal_name) if legal_name.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        if let Some(number) = present(&self.registration_number) {
            // Legacy entries carry no credentials, so they can never match
            match record {
                IdentityRecord::Verified(identity) => {
                    if !credential_contains(identity, &number.to_lowercase()) {
                        return false;
                    }
                }
                IdentityRecord::Legacy(_) => return false,
            }
        }

        if let Some(code) = present(&self.country) {
            match record {
                IdentityRecord::Verified(identity) => {
                    if !matches_country(identity, code) {
                        return false;
                    }
                }
                IdentityRecord::Legacy(_) => return false,
            }
        }

        true
    }
}

/// Locate a record by wallet address, case-insensitively
///
/// A missing or empty address never matches anything.
pub fn find_by_address<'a>(
    records: &'a [IdentityRecord],
    address: Option<&str>,
) -> Option<&'a IdentityRecord> {
    let target = address.filter(|address| !address.is_empty())?;
    records
        .iter()
        .find(|record| record.address().eq_ignore_ascii_case(target))
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Collect every string value reachable inside a credential payload,
/// descending through nested objects and arrays
fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(text) => out.push(text),
        Value::Array(items) => {
            for item in items {
                collect_strings(item, out);
            }
        }
        Value::Object(fields) => {
            for field in fields.values() {
                collect_strings(field, out);
            }
        }
        _ => {}
    }
}

fn credential_strings(identity: &VerifiedIdentity) -> Vec<&str> {
    let mut values = Vec::new();
    for value in identity.credentials.values() {
        collect_strings(value, &mut values);
    }
    values
}

fn credential_contains(identity: &VerifiedIdentity, needle: &str) -> bool {
    credential_strings(identity)
        .iter()
        .any(|value| value.to_lowercase().contains(needle))
}

/// A record matches a country code when some credential value equals the
/// code itself or contains the resolved country name
fn matches_country(identity: &VerifiedIdentity, code: &str) -> bool {
    let name = match country::country_name(code) {
        Some(name) => name,
        None => return false,
    };
    let name_lower = name.to_lowercase();
    credential_strings(identity).iter().any(|value| {
        value.eq_ignore_ascii_case(code) || value.to_lowercase().contains(&name_lower)
    })
}
