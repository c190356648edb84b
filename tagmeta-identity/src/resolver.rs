//! Combined registry + name API identity resolver.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use tagmeta_core::constants::DEFAULT_IDENTITY_CONCURRENCY;
use tagmeta_core::error::Result;
use tagmeta_core::traits::{NameLookup, ReverseRegistry};
use tagmeta_core::types::{ReverseRecord, Tag};

use crate::names::{NamesClient, NamesConfig};
use crate::registry::{RegistryClient, RegistryConfig};

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Registry contract client configuration
    pub registry: RegistryConfig,
    /// Name API client configuration
    pub names: NamesConfig,
    /// Maximum resolutions in flight during a batch
    pub concurrency_limit: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            registry: RegistryConfig::default(),
            names: NamesConfig::default(),
            concurrency_limit: DEFAULT_IDENTITY_CONCURRENCY,
        }
    }
}

impl IdentityConfig {
    /// Sets the registry RPC URL.
    pub fn with_rpc(mut self, rpc_url: impl Into<String>) -> Self {
        self.registry.rpc_url = rpc_url.into();
        self
    }

    /// Sets the name API base URL.
    pub fn with_names_api(mut self, base_url: impl Into<String>) -> Self {
        self.names.base_url = base_url.into();
        self
    }

    /// Sets the batch concurrency limit.
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }
}

/// Outcome of resolving one address.
///
/// `NotFound` and `Failed` both surface as `None` from
/// [`IdentityResolver::resolve`]; the distinction is kept for logging and
/// for callers that want it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A handle was resolved.
    Found(Tag),
    /// The address has no registry entry, or its identifier has no handle.
    NotFound,
    /// A lookup step failed.
    Failed(String),
}

impl Resolution {
    /// Collapses the outcome to the public optional form.
    pub fn into_tag(self) -> Option<Tag> {
        match self {
            Resolution::Found(tag) => Some(tag),
            Resolution::NotFound | Resolution::Failed(_) => None,
        }
    }

    /// Returns true if a tag was resolved.
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Resolves addresses to identity tags.
///
/// Resolution is best-effort: the public entry points never return an error.
/// 1. Call the registry's reverse lookup with the address
/// 2. Pick the first entry whose address is byte-equal and whose result is non-empty
/// 3. Look the identifier up in the name API
/// 4. Lowercase the handle and wrap it into an identity tag
pub struct IdentityResolver {
    registry: Arc<dyn ReverseRegistry>,
    names: Arc<dyn NameLookup>,
    concurrency_limit: usize,
}

impl IdentityResolver {
    /// Creates a resolver over injected collaborators.
    pub fn new(registry: Arc<dyn ReverseRegistry>, names: Arc<dyn NameLookup>) -> Self {
        Self {
            registry,
            names,
            concurrency_limit: DEFAULT_IDENTITY_CONCURRENCY,
        }
    }

    /// Creates a resolver backed by HTTP clients built from `config`.
    pub fn with_config(config: IdentityConfig) -> Result<Self> {
        let registry = RegistryClient::with_config(config.registry)?;
        let names = NamesClient::with_config(config.names)?;

        Ok(Self::new(Arc::new(registry), Arc::new(names)).concurrency(config.concurrency_limit))
    }

    /// Sets the batch concurrency limit (at least 1).
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Returns the batch concurrency limit.
    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    /// Resolves the identity tag for `address`, or `None`.
    ///
    /// Never fails: every error collapses to `None`.
    pub async fn resolve(&self, address: &str) -> Option<Tag> {
        self.resolve_outcome(address).await.into_tag()
    }

    /// Resolves `address`, keeping the reason when nothing is produced.
    #[instrument(skip(self))]
    pub async fn resolve_outcome(&self, address: &str) -> Resolution {
        match self.try_resolve(address).await {
            Ok(Some(tag)) => {
                info!(address, "Resolved identity");
                Resolution::Found(tag)
            }
            Ok(None) => {
                debug!(address, "No identity");
                Resolution::NotFound
            }
            Err(e) => {
                warn!(address, error = %e, recoverable = e.is_recoverable(), "Identity resolution failed");
                Resolution::Failed(e.to_string())
            }
        }
    }

    /// Resolves every address with bounded concurrency.
    ///
    /// Results are returned once the whole batch has settled, in completion
    /// order. An empty batch issues no calls.
    #[instrument(skip(self, addresses), fields(count = addresses.len()))]
    pub async fn resolve_batch(&self, addresses: &[String]) -> Vec<(String, Resolution)> {
        if addresses.is_empty() {
            return Vec::new();
        }

        stream::iter(addresses.iter().cloned())
            .map(|address| async move {
                let outcome = self.resolve_outcome(&address).await;
                (address, outcome)
            })
            .buffer_unordered(self.concurrency_limit)
            .collect()
            .await
    }

    /// Runs the raw registry reverse lookup for a batch of addresses.
    pub async fn lookup_registry(&self, addresses: &[String]) -> Result<Vec<ReverseRecord>> {
        self.registry.reverse_lookup(addresses).await
    }

    async fn try_resolve(&self, address: &str) -> Result<Option<Tag>> {
        let records = self.registry.reverse_lookup(&[address.to_string()]).await?;

        let Some(id) = find_identifier(&records, address) else {
            return Ok(None);
        };
        debug!(address, id, "Registry hit");

        // A registry hit without a handle is NotFound, not a raw-id fallback.
        match self.names.lookup_name(id).await? {
            Some(handle) if !handle.is_empty() => Ok(Some(Tag::identity(&handle))),
            _ => Ok(None),
        }
    }
}

/// Returns the identifier of the first record matching `address` exactly
/// with a non-empty result.
pub fn find_identifier<'a>(records: &'a [ReverseRecord], address: &str) -> Option<&'a str> {
    records
        .iter()
        .find(|record| record.matches(address))
        .map(|record| record.result.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tagmeta_core::error::TagmetaError;
    use tagmeta_core::IDENTITY_TAG_SLUG;

    const ABC: &str = "0xABC0000000000000000000000000000000000001";
    const DEF: &str = "0xDEF0000000000000000000000000000000000002";

    #[derive(Default)]
    struct MockRegistry {
        records: Vec<ReverseRecord>,
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseRegistry for MockRegistry {
        async fn reverse_lookup(&self, _addresses: &[String]) -> Result<Vec<ReverseRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(TagmetaError::RpcError("execution reverted".into()));
            }
            // Every configured record, including ones for other addresses.
            Ok(self.records.clone())
        }
    }

    #[derive(Default)]
    struct MockNames {
        names: HashMap<String, String>,
        status: Option<u16>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NameLookup for MockNames {
        async fn lookup_name(&self, id: &str) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.status {
                return Err(TagmetaError::api_status("names api", status, "boom"));
            }
            Ok(self.names.get(id).cloned())
        }
    }

    fn build(registry: MockRegistry, names: MockNames) -> (IdentityResolver, Arc<MockRegistry>, Arc<MockNames>) {
        let registry = Arc::new(registry);
        let names = Arc::new(names);
        (IdentityResolver::new(registry.clone(), names.clone()), registry, names)
    }

    fn names_of(pairs: &[(&str, &str)]) -> MockNames {
        MockNames {
            names: pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_resolve_found_lowercases_handle() {
        let registry = MockRegistry {
            records: vec![ReverseRecord::new(ABC, "42")],
            ..Default::default()
        };
        let (resolver, _, _) = build(registry, names_of(&[("42", "Alice")]));

        let tag = resolver.resolve(ABC).await.unwrap();
        assert_eq!(tag.slug, IDENTITY_TAG_SLUG);
        assert_eq!(tag.format().identity_handle(), Some("alice"));
    }

    #[tokio::test]
    async fn test_resolve_not_in_registry() {
        let (resolver, _, names) = build(MockRegistry::default(), names_of(&[("42", "Alice")]));

        assert_eq!(resolver.resolve_outcome(ABC).await, Resolution::NotFound);
        assert_eq!(names.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_ignores_other_addresses_and_empty_results() {
        let registry = MockRegistry {
            records: vec![
                ReverseRecord::new(DEF, "7"),
                ReverseRecord::new(ABC, ""),
                ReverseRecord::new(ABC.to_lowercase(), "9"),
                ReverseRecord::new(ABC, "42"),
            ],
            ..Default::default()
        };
        let (resolver, _, _) = build(
            registry,
            names_of(&[("7", "dave"), ("9", "lower"), ("42", "alice")]),
        );

        let tag = resolver.resolve(ABC).await.unwrap();
        assert_eq!(tag.format().identity_handle(), Some("alice"));
    }

    #[tokio::test]
    async fn test_resolve_registry_failure_is_none() {
        let registry = MockRegistry {
            fail: true,
            ..Default::default()
        };
        let (resolver, _, _) = build(registry, names_of(&[]));

        assert!(resolver.resolve(ABC).await.is_none());
        assert!(matches!(resolver.resolve_outcome(ABC).await, Resolution::Failed(_)));
    }

    #[tokio::test]
    async fn test_resolve_names_error_discards_registry_hit() {
        let registry = MockRegistry {
            records: vec![ReverseRecord::new(ABC, "42")],
            ..Default::default()
        };
        let mock_names = MockNames {
            status: Some(500),
            ..Default::default()
        };
        let (resolver, _, _) = build(registry, mock_names);

        let outcome = resolver.resolve_outcome(ABC).await;
        assert!(matches!(outcome, Resolution::Failed(ref m) if m.contains("500")));
        assert!(outcome.into_tag().is_none());
    }

    #[tokio::test]
    async fn test_resolve_missing_handle_is_not_found() {
        let registry = MockRegistry {
            records: vec![ReverseRecord::new(ABC, "42")],
            ..Default::default()
        };
        let (resolver, _, _) = build(registry, names_of(&[("43", "someone")]));

        assert_eq!(resolver.resolve_outcome(ABC).await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_empty_handle_is_not_found() {
        let registry = MockRegistry {
            records: vec![ReverseRecord::new(ABC, "42")],
            ..Default::default()
        };
        let (resolver, _, names) = build(registry, names_of(&[("42", "")]));

        assert_eq!(resolver.resolve_outcome(ABC).await, Resolution::NotFound);
        assert_eq!(names.calls.load(Ordering::SeqCst), 1);
    }

    /// Registry double that records the highest number of overlapping calls.
    #[derive(Default)]
    struct PeakRegistry {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReverseRegistry for PeakRegistry {
        async fn reverse_lookup(&self, _addresses: &[String]) -> Result<Vec<ReverseRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(std::time::Duration::from_millis(20)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_resolve_batch_bounds_in_flight_lookups() {
        let registry = Arc::new(PeakRegistry::default());
        let resolver =
            IdentityResolver::new(registry.clone(), Arc::new(names_of(&[]))).concurrency(3);

        let batch: Vec<String> = (0..10).map(|i| format!("0x{:040x}", i)).collect();
        let results = resolver.resolve_batch(&batch).await;

        assert_eq!(results.len(), 10);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 10);
        assert_eq!(registry.peak.load(Ordering::SeqCst), 3);
        assert_eq!(registry.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_batch_covers_every_address() {
        let registry = MockRegistry {
            records: vec![ReverseRecord::new(ABC, "42")],
            ..Default::default()
        };
        let (resolver, registry, _) = build(registry, names_of(&[("42", "Alice")]));
        let resolver = resolver.concurrency(2);

        let batch = vec![ABC.to_string(), DEF.to_string()];
        let results: HashMap<_, _> = resolver.resolve_batch(&batch).await.into_iter().collect();

        assert_eq!(results.len(), 2);
        assert!(results[ABC].is_found());
        assert_eq!(results[DEF], Resolution::NotFound);
        assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_resolve_batch_empty_issues_no_calls() {
        let (resolver, registry, _) = build(MockRegistry::default(), names_of(&[]));

        assert!(tokio_test::block_on(resolver.resolve_batch(&[])).is_empty());
        assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_concurrency_floor() {
        let (resolver, _, _) = build(MockRegistry::default(), names_of(&[]));
        assert_eq!(resolver.concurrency(0).concurrency_limit(), 1);
    }

    #[test]
    fn test_config_builder() {
        let config = IdentityConfig::default()
            .with_rpc("https://rpc.test")
            .with_names_api("https://names.test")
            .concurrency(3);

        assert_eq!(config.registry.rpc_url, "https://rpc.test");
        assert_eq!(config.names.base_url, "https://names.test");
        assert_eq!(config.concurrency_limit, 3);
    }

    #[test]
    fn test_find_identifier() {
        let records = vec![ReverseRecord::new(DEF, "1"), ReverseRecord::new(ABC, "2")];
        assert_eq!(find_identifier(&records, ABC), Some("2"));
        assert_eq!(find_identifier(&records, "0x0"), None);
    }
}
