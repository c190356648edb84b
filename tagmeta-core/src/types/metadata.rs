//! Payloads exchanged with the metadata service and the registry contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::TAGS_LIMIT;
use crate::types::Tag;

/// Request for the `address_metadata_info` resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    /// Addresses to fetch metadata for
    pub addresses: Vec<String>,
    /// Chain the metadata is scoped to
    pub chain_id: String,
    /// Maximum number of tags per address
    pub tags_limit: u32,
}

impl MetadataRequest {
    /// Creates a request with the default tags limit.
    pub fn new(addresses: Vec<String>, chain_id: impl Into<String>) -> Self {
        Self {
            addresses,
            chain_id: chain_id.into(),
            tags_limit: TAGS_LIMIT,
        }
    }

    /// Returns the query parameters in wire form.
    ///
    /// List values are comma-joined; the tags limit is sent as a string.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("addresses", self.addresses.join(",")),
            ("chainId", self.chain_id.clone()),
            ("tagsLimit", self.tags_limit.to_string()),
        ]
    }
}

/// Per-address entry of the metadata service response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAddressRecord {
    /// Tags in service order
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Reputation value, passed through untouched
    #[serde(default)]
    pub reputation: serde_json::Value,
}

/// Response of the `address_metadata_info` resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataResponse {
    /// Address (as returned by the service) to record
    #[serde(default)]
    pub addresses: BTreeMap<String, RawAddressRecord>,
}

/// One `(address, result)` pair returned by the registry reverse lookup.
///
/// `address` is rendered exactly as the chain client returns it; matching
/// against a queried address is byte-exact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseRecord {
    /// Address the entry belongs to
    pub address: String,
    /// Opaque identity identifier, empty when unregistered
    pub result: String,
}

impl ReverseRecord {
    /// Creates a reverse record.
    pub fn new(address: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            result: result.into(),
        }
    }

    /// Returns true if this entry is a registry hit for `address`.
    pub fn matches(&self, address: &str) -> bool {
        !self.result.is_empty() && self.address == address
    }
}
