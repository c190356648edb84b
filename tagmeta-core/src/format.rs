//! Tag meta payload formatting.
//!
//! The metadata service ships each tag's `meta` as a serialized JSON object
//! whose fields are all optional and consumer-defined. Parsing is total: an
//! absent, empty or malformed payload yields [`StructuredMeta::default`].

use serde_json::{Map, Value};

use crate::types::{FormattedTag, StructuredMeta, Tag};

/// Parses a raw meta payload into its structured form.
///
/// Only string-valued fields survive; a field holding any other JSON type is
/// dropped on its own without affecting its siblings.
pub fn format_meta(raw: Option<&str>) -> StructuredMeta {
    let Some(object) = parse_object(raw) else {
        return StructuredMeta::default();
    };

    let strings: Map<String, Value> = object
        .into_iter()
        .filter(|(_, value)| value.is_string())
        .collect();

    serde_json::from_value(Value::Object(strings)).unwrap_or_default()
}

/// Formats every tag of a list, keeping order.
pub fn format_tags(tags: impl IntoIterator<Item = Tag>) -> Vec<FormattedTag> {
    tags.into_iter().map(Tag::format).collect()
}

fn parse_object(raw: Option<&str>) -> Option<Map<String, Value>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
