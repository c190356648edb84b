//! Per-generation identity resolution state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tagmeta_core::types::Tag;
use tagmeta_identity::Resolution;

/// Lifecycle of identity resolution for one address batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionPhase {
    /// Batch submitted, resolution not started yet.
    NotStarted,
    /// Resolution tasks are in flight.
    Resolving,
    /// Every address has a result.
    Settled,
    /// Resolution will not run for this batch (disabled or gated off).
    Skipped,
}

impl ResolutionPhase {
    /// Returns true if no further identity results will arrive.
    pub fn is_final(self) -> bool {
        matches!(self, ResolutionPhase::Settled | ResolutionPhase::Skipped)
    }
}

/// Identity results for one generation.
///
/// Entries are keyed by the address exactly as handed to the resolver and
/// are published all at once when the batch settles.
#[derive(Clone, Debug)]
pub struct ResolutionState {
    generation: u64,
    phase: ResolutionPhase,
    entries: HashMap<String, Option<Tag>>,
}

impl ResolutionState {
    /// Creates an empty state for `generation`.
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            phase: ResolutionPhase::NotStarted,
            entries: HashMap::new(),
        }
    }

    /// Generation this state belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase.
    pub fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    pub(crate) fn start(&mut self) {
        self.phase = ResolutionPhase::Resolving;
    }

    pub(crate) fn skip(&mut self) {
        self.phase = ResolutionPhase::Skipped;
    }

    /// Stores a settled batch, replacing anything held before.
    pub fn settle(&mut self, outcomes: impl IntoIterator<Item = (String, Resolution)>) {
        self.entries = outcomes
            .into_iter()
            .map(|(address, outcome)| (address, outcome.into_tag()))
            .collect();
        self.phase = ResolutionPhase::Settled;
    }

    /// Returns the identity tag for `address` once the batch has settled.
    ///
    /// `None` while resolution is pending, and for addresses without one.
    pub fn identity_for(&self, address: &str) -> Option<&Tag> {
        if self.phase != ResolutionPhase::Settled {
            return None;
        }
        self.entries.get(address).and_then(Option::as_ref)
    }

    /// Number of addresses with a resolved tag.
    pub fn found(&self) -> usize {
        self.entries.values().filter(|tag| tag.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_hides_entries() {
        let mut state = ResolutionState::new(1);
        state.start();
        assert_eq!(state.phase(), ResolutionPhase::Resolving);
        assert!(state.identity_for("0xA").is_none());

        state.settle(vec![
            ("0xA".to_string(), Resolution::Found(Tag::identity("alice"))),
            ("0xB".to_string(), Resolution::Failed("timeout".into())),
        ]);

        assert!(state.phase().is_final());
        assert!(state.identity_for("0xA").is_some());
        assert!(state.identity_for("0xa").is_none());
        assert!(state.identity_for("0xB").is_none());
        assert_eq!(state.found(), 1);
    }

    #[test]
    fn test_settle_replaces_wholesale() {
        let mut state = ResolutionState::new(1);
        state.settle(vec![("0xA".to_string(), Resolution::Found(Tag::identity("a")))]);
        state.settle(vec![("0xB".to_string(), Resolution::Found(Tag::identity("b")))]);

        assert!(state.identity_for("0xA").is_none());
        assert!(state.identity_for("0xB").is_some());
    }
}
