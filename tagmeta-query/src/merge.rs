//! Merge of primary metadata with resolved identity tags.

use std::collections::HashSet;

use tagmeta_core::format::format_tags;
use tagmeta_core::types::{AddressRecord, MetadataResponse, ResultMap};

use crate::state::ResolutionState;

/// Builds the result map for one generation.
///
/// For every address in the response: the identity tag resolved for that
/// exact key (if the batch has settled) is appended after the primary tags,
/// every tag is formatted, and the key is lowercased. Entries whose
/// lowercased key was not requested are dropped. Tags are never
/// de-duplicated by slug.
pub fn merge_metadata(
    requested: &[String],
    response: &MetadataResponse,
    identities: &ResolutionState,
) -> ResultMap {
    let requested: HashSet<String> = requested.iter().map(|a| a.to_lowercase()).collect();

    response
        .addresses
        .iter()
        .filter_map(|(address, raw)| {
            let key = address.to_lowercase();
            if !requested.contains(&key) {
                return None;
            }

            let identity = identities.identity_for(address).cloned();
            let tags = format_tags(raw.tags.iter().cloned().chain(identity));

            Some((
                key,
                AddressRecord {
                    tags,
                    reputation: raw.reputation.clone(),
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagmeta_core::types::{RawAddressRecord, Tag};
    use tagmeta_core::IDENTITY_TAG_SLUG;
    use tagmeta_identity::Resolution;

    fn response(entries: &[(&str, Vec<Tag>)]) -> MetadataResponse {
        MetadataResponse {
            addresses: entries
                .iter()
                .map(|(address, tags)| {
                    (
                        address.to_string(),
                        RawAddressRecord {
                            tags: tags.clone(),
                            reputation: serde_json::json!({ "score": 1 }),
                        },
                    )
                })
                .collect(),
        }
    }

    fn primary_tag(slug: &str) -> Tag {
        Tag::new(slug, slug.to_uppercase(), "generic", 1, Some(r##"{"bgColor":"#123"}"##.into()))
    }

    fn settled(entries: Vec<(&str, Resolution)>) -> ResolutionState {
        let mut state = ResolutionState::new(1);
        state.settle(entries.into_iter().map(|(a, r)| (a.to_string(), r)));
        state
    }

    #[test]
    fn test_keys_are_lowercased_requested_addresses() {
        let requested = vec!["0xABC".to_string(), "0xDeF".to_string()];
        let resp = response(&[
            ("0xABC", vec![primary_tag("a")]),
            ("0xDeF", vec![]),
            ("0x999", vec![primary_tag("x")]),
        ]);

        let result = merge_metadata(&requested, &resp, &ResolutionState::new(1));
        let keys: Vec<_> = result.keys().cloned().collect();

        assert_eq!(keys, vec!["0xabc".to_string(), "0xdef".to_string()]);
    }

    #[test]
    fn test_identity_appended_last() {
        let requested = vec!["0xABC".to_string(), "0xDEF".to_string()];
        let resp = response(&[
            ("0xABC", vec![primary_tag("a"), primary_tag("b")]),
            ("0xDEF", vec![primary_tag("c")]),
        ]);
        let identities = settled(vec![
            ("0xABC", Resolution::Found(Tag::identity("Alice"))),
            ("0xDEF", Resolution::NotFound),
        ]);

        let result = merge_metadata(&requested, &resp, &identities);

        let abc = &result["0xabc"];
        assert_eq!(abc.tags.len(), 3);
        assert_eq!(abc.tags[0].slug, "a");
        assert_eq!(abc.tags[1].slug, "b");
        assert_eq!(abc.tags[2].slug, IDENTITY_TAG_SLUG);
        assert_eq!(abc.tags[2].identity_handle(), Some("alice"));
        assert_eq!(abc.tags[0].meta.bg_color.as_deref(), Some("#123"));
        assert_eq!(abc.reputation, serde_json::json!({ "score": 1 }));

        let def = &result["0xdef"];
        assert_eq!(def.tags, format_tags(vec![primary_tag("c")]));
        assert!(def.identity_tag().is_none());
    }

    #[test]
    fn test_pending_resolution_emits_primary_only() {
        let requested = vec!["0xABC".to_string()];
        let resp = response(&[("0xABC", vec![primary_tag("a")])]);
        let mut identities = ResolutionState::new(1);
        identities.start();

        let result = merge_metadata(&requested, &resp, &identities);
        assert_eq!(result["0xabc"].tags.len(), 1);
    }

    #[test]
    fn test_identity_lookup_uses_exact_key() {
        let requested = vec!["0xabc".to_string()];
        let resp = response(&[("0xabc", vec![])]);
        let identities = settled(vec![("0xABC", Resolution::Found(Tag::identity("alice")))]);

        let result = merge_metadata(&requested, &resp, &identities);
        assert!(result["0xabc"].tags.is_empty());
    }

    #[test]
    fn test_duplicate_slug_not_filtered() {
        let requested = vec!["0xABC".to_string()];
        let existing = Tag::new(IDENTITY_TAG_SLUG, "IDriss", "protocol", 0, None);
        let resp = response(&[("0xABC", vec![existing])]);
        let identities = settled(vec![("0xABC", Resolution::Found(Tag::identity("alice")))]);

        let result = merge_metadata(&requested, &resp, &identities);
        let slugs: Vec<_> = result["0xabc"].tags.iter().map(|t| t.slug.as_str()).collect();
        assert_eq!(slugs, vec![IDENTITY_TAG_SLUG, IDENTITY_TAG_SLUG]);
    }
}
