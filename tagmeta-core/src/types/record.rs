//! Enriched per-address output.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::FormattedTag;

/// Tags and reputation for one address after enrichment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Primary tags in service order, followed by the identity tag if any
    pub tags: Vec<FormattedTag>,
    /// Reputation value as delivered by the metadata service
    pub reputation: serde_json::Value,
}

impl AddressRecord {
    /// Returns the identity tag, if one was merged in.
    pub fn identity_tag(&self) -> Option<&FormattedTag> {
        self.tags.iter().rev().find(|tag| tag.is_identity())
    }
}

/// Lowercase address to enriched record.
pub type ResultMap = BTreeMap<String, AddressRecord>;
