//! Collaborator interfaces.
//!
//! Each external service the enrichment pipeline talks to sits behind one of
//! these traits so clients are injected explicitly and can be replaced by
//! test doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MetadataRequest, MetadataResponse, ReverseRecord};

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only access to the on-chain identity registry.
#[async_trait]
pub trait ReverseRegistry: Send + Sync {
    /// Calls `getMultipleReverse(address[])` with the given addresses.
    ///
    /// The returned entries may cover other addresses or carry empty results;
    /// callers must filter.
    async fn reverse_lookup(&self, addresses: &[String]) -> Result<Vec<ReverseRecord>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME LOOKUP TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Off-chain mapping from an identity identifier to a human-readable handle.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Looks up the handle for `id`.
    ///
    /// Returns `Ok(None)` when the service answers but has no handle for `id`.
    async fn lookup_name(&self, id: &str) -> Result<Option<String>>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// METADATA SERVICE TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Primary source of per-address tags and reputation.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Fetches the `address_metadata_info` resource.
    async fn fetch_metadata(&self, request: &MetadataRequest) -> Result<MetadataResponse>;
}
