//! Query and application configuration.

use serde::{Deserialize, Serialize};

use tagmeta_core::constants::{
    DEFAULT_CHAIN_ID, DEFAULT_METADATA_API_URL, DEFAULT_TIMEOUT_SECONDS, TAGS_LIMIT,
};
use tagmeta_identity::IdentityConfig;

/// Settings of the metadata query itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Chain the metadata is requested for
    pub chain_id: String,
    /// Maximum tags per address
    pub tags_limit: u32,
    /// Feature availability toggle; when false no request is ever issued
    pub feature_enabled: bool,
    /// Whether identity tags are resolved and merged
    pub identity_enabled: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID.into(),
            tags_limit: TAGS_LIMIT,
            feature_enabled: true,
            identity_enabled: true,
        }
    }
}

impl QueryConfig {
    /// Creates a configuration for the given chain.
    pub fn new(chain_id: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            ..Default::default()
        }
    }

    /// Turns the feature off.
    pub fn disabled(mut self) -> Self {
        self.feature_enabled = false;
        self
    }

    /// Skips identity resolution.
    pub fn without_identity(mut self) -> Self {
        self.identity_enabled = false;
        self
    }

    /// Returns true if a query for `addresses` may issue requests.
    pub fn is_enabled_for(&self, addresses: &[String], enabled: bool) -> bool {
        enabled && self.feature_enabled && !addresses.is_empty()
    }
}

/// Metadata service client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataServiceConfig {
    /// Base URL of the metadata service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for MetadataServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_METADATA_API_URL.into(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl MetadataServiceConfig {
    /// Creates a configuration with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// Everything needed to build a [`MetadataQuery`](crate::MetadataQuery).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Query settings
    pub query: QueryConfig,
    /// Metadata service client
    pub metadata: MetadataServiceConfig,
    /// Identity resolver
    pub identity: IdentityConfig,
}

impl AppConfig {
    /// Loads configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |key: &str| {
            lookup(key)
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true)
        };

        let defaults = Self::default();

        let mut identity = defaults.identity;
        if let Some(url) = lookup("TAGMETA_IDENTITY_RPC_URL") {
            identity.registry.rpc_url = url;
        }
        if let Some(url) = lookup("TAGMETA_IDENTITY_NAMES_URL") {
            identity.names.base_url = url;
        }
        if let Some(limit) = lookup("TAGMETA_IDENTITY_CONCURRENCY").and_then(|v| v.parse().ok()) {
            identity.concurrency_limit = limit;
        }

        Self {
            query: QueryConfig {
                chain_id: lookup("TAGMETA_CHAIN_ID").unwrap_or(defaults.query.chain_id),
                tags_limit: TAGS_LIMIT,
                feature_enabled: flag("TAGMETA_ADDRESS_METADATA_ENABLED"),
                identity_enabled: flag("TAGMETA_IDENTITY_ENABLED"),
            },
            metadata: MetadataServiceConfig {
                base_url: lookup("TAGMETA_METADATA_API_URL").unwrap_or(defaults.metadata.base_url),
                ..defaults.metadata
            },
            identity,
        }
    }
}
