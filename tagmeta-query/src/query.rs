//! Address metadata query with background identity enrichment.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use tagmeta_core::error::Result;
use tagmeta_core::traits::MetadataService;
use tagmeta_core::types::{MetadataRequest, MetadataResponse, ResultMap};
use tagmeta_identity::IdentityResolver;

use crate::config::{AppConfig, QueryConfig};
use crate::merge::merge_metadata;
use crate::service::HttpMetadataService;
use crate::state::{ResolutionPhase, ResolutionState};

// ═══════════════════════════════════════════════════════════════════════════════
// SNAPSHOTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Status of the primary metadata fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryStatus {
    /// No request is issued (empty list or feature off).
    Disabled,
    /// Waiting for the metadata service.
    Loading,
    /// Primary metadata is available.
    Success,
    /// The metadata service call failed.
    Error(String),
}

/// What a consumer observes for the current generation.
#[derive(Clone, Debug)]
pub struct QuerySnapshot {
    /// Generation the snapshot belongs to
    pub generation: u64,
    /// Primary fetch status
    pub status: QueryStatus,
    /// Identity resolution progress
    pub identity_phase: ResolutionPhase,
    /// Merged result, present only once primary metadata has arrived
    pub data: Option<ResultMap>,
}

impl QuerySnapshot {
    fn initial() -> Self {
        Self {
            generation: 0,
            status: QueryStatus::Disabled,
            identity_phase: ResolutionPhase::Skipped,
            data: None,
        }
    }

    /// Returns true if no further update is expected for this generation.
    pub fn is_settled(&self) -> bool {
        match self.status {
            QueryStatus::Disabled | QueryStatus::Error(_) => true,
            QueryStatus::Loading => false,
            QueryStatus::Success => self.identity_phase.is_final(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATE
// ═══════════════════════════════════════════════════════════════════════════════

enum PrimaryState {
    Idle,
    Loading,
    Loaded(MetadataResponse),
    Failed(String),
}

struct QueryState {
    generation: u64,
    addresses: Vec<String>,
    enabled: bool,
    primary: PrimaryState,
    resolution: ResolutionState,
}

impl QueryState {
    fn snapshot(&self) -> QuerySnapshot {
        let (status, data) = match &self.primary {
            PrimaryState::Idle => (QueryStatus::Disabled, None),
            PrimaryState::Loading => (QueryStatus::Loading, None),
            PrimaryState::Failed(message) => (QueryStatus::Error(message.clone()), None),
            PrimaryState::Loaded(response) => (
                QueryStatus::Success,
                Some(merge_metadata(&self.addresses, response, &self.resolution)),
            ),
        };

        QuerySnapshot {
            generation: self.generation,
            status,
            identity_phase: self.resolution.phase(),
            data,
        }
    }
}

struct Inner {
    config: QueryConfig,
    service: Arc<dyn MetadataService>,
    resolver: Arc<IdentityResolver>,
    state: Mutex<QueryState>,
    snapshots: watch::Sender<QuerySnapshot>,
}

impl Inner {
    /// Applies a completion if it still belongs to the current generation.
    fn apply(&self, generation: u64, update: impl FnOnce(&mut QueryState)) -> bool {
        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(generation, current = state.generation, "Discarding stale completion");
            return false;
        }

        update(&mut state);
        self.publish(&state);
        true
    }

    fn publish(&self, state: &QueryState) {
        self.snapshots.send_replace(state.snapshot());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetches metadata for an address list and merges identity tags into it.
///
/// Each [`submit`](Self::submit) with a new list starts a generation. The
/// primary fetch and the identity fan-out run as separate tasks; each
/// completion re-derives the merged map and publishes a [`QuerySnapshot`].
/// Completions from an older generation are dropped.
///
/// Submitting requires a Tokio runtime.
#[derive(Clone)]
pub struct MetadataQuery {
    inner: Arc<Inner>,
}

impl MetadataQuery {
    /// Creates a query over injected collaborators.
    pub fn new(
        config: QueryConfig,
        service: Arc<dyn MetadataService>,
        resolver: Arc<IdentityResolver>,
    ) -> Self {
        let (snapshots, _) = watch::channel(QuerySnapshot::initial());
        let state = QueryState {
            generation: 0,
            addresses: Vec::new(),
            enabled: true,
            primary: PrimaryState::Idle,
            resolution: {
                let mut resolution = ResolutionState::new(0);
                resolution.skip();
                resolution
            },
        };

        Self {
            inner: Arc::new(Inner {
                config,
                service,
                resolver,
                state: Mutex::new(state),
                snapshots,
            }),
        }
    }

    /// Creates a query backed by HTTP clients built from `config`.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let service = HttpMetadataService::with_config(config.metadata)?;
        let resolver = IdentityResolver::with_config(config.identity)?;

        Ok(Self::new(config.query, Arc::new(service), Arc::new(resolver)))
    }

    /// Returns the query configuration.
    pub fn config(&self) -> &QueryConfig {
        &self.inner.config
    }

    /// Submits an address list. Returns its generation.
    pub fn submit(&self, addresses: Vec<String>) -> u64 {
        self.submit_with(addresses, true)
    }

    /// Submits an address list with an explicit enable flag.
    ///
    /// Resubmitting the current list with the same flag is a no-op and
    /// returns the current generation.
    pub fn submit_with(&self, addresses: Vec<String>, enabled: bool) -> u64 {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        if state.addresses == addresses && state.enabled == enabled {
            return state.generation;
        }

        state.generation += 1;
        let generation = state.generation;
        let active = inner.config.is_enabled_for(&addresses, enabled);
        let resolve_identity = active && inner.config.identity_enabled;

        state.addresses = addresses.clone();
        state.enabled = enabled;
        state.primary = if active {
            PrimaryState::Loading
        } else {
            PrimaryState::Idle
        };
        state.resolution = ResolutionState::new(generation);
        if resolve_identity {
            state.resolution.start();
        } else {
            state.resolution.skip();
        }
        inner.publish(&state);
        drop(state);

        if !active {
            debug!(generation, count = addresses.len(), "Query disabled");
            return generation;
        }

        info!(generation, count = addresses.len(), resolve_identity, "Submitting metadata query");

        if resolve_identity {
            self.spawn_identity(generation, addresses.clone());
        }
        self.spawn_primary(generation, addresses);

        generation
    }

    fn spawn_primary(&self, generation: u64, addresses: Vec<String>) {
        let inner = self.inner.clone();
        let mut request = MetadataRequest::new(addresses, inner.config.chain_id.clone());
        request.tags_limit = inner.config.tags_limit;

        tokio::spawn(async move {
            let outcome = inner.service.fetch_metadata(&request).await;
            inner.apply(generation, |state| {
                state.primary = match outcome {
                    Ok(response) => PrimaryState::Loaded(response),
                    Err(e) => {
                        warn!(generation, error = %e, "Metadata fetch failed");
                        PrimaryState::Failed(e.to_string())
                    }
                };
            });
        });
    }

    fn spawn_identity(&self, generation: u64, addresses: Vec<String>) {
        let inner = self.inner.clone();

        tokio::spawn(async move {
            let outcomes = inner.resolver.resolve_batch(&addresses).await;
            let found = outcomes.iter().filter(|(_, outcome)| outcome.is_found()).count();
            if inner.apply(generation, |state| state.resolution.settle(outcomes)) {
                debug!(generation, found, "Identity batch settled");
            }
        });
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.inner.state.lock().generation
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> QuerySnapshot {
        self.inner.snapshots.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<QuerySnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Waits until `generation` has settled or has been superseded.
    ///
    /// A generation that was never issued returns the latest snapshot.
    pub async fn wait_settled(&self, generation: u64) -> QuerySnapshot {
        let mut receiver = self.subscribe();
        if generation > receiver.borrow().generation {
            return self.snapshot();
        }

        let settled = receiver
            .wait_for(|s| s.generation > generation || (s.generation == generation && s.is_settled()))
            .await
            .map(|snapshot| snapshot.clone());

        match settled {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }
}
