//! Tag types.
//!
//! Tags arrive from the metadata service with an opaque, serialized `meta`
//! payload. Formatting replaces it with [`StructuredMeta`].

use serde::{Deserialize, Serialize};

use crate::constants::{
    IDENTITY_TAG_BG_COLOR, IDENTITY_TAG_ICON, IDENTITY_TAG_NAME, IDENTITY_TAG_ORDINAL,
    IDENTITY_TAG_SLUG, IDENTITY_TAG_TEXT_COLOR, IDENTITY_TAG_TOOLTIP, IDENTITY_TAG_TYPE,
};
use crate::format::format_meta;

/// A metadata tag attached to an address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Stable identifier of the tag
    pub slug: String,
    /// Display name
    pub name: String,
    /// Provider-defined category (e.g. "protocol", "generic")
    pub tag_type: String,
    /// Sort position among an address's tags
    pub ordinal: i64,
    /// Serialized meta payload, untyped at rest
    #[serde(default)]
    pub meta: Option<String>,
}

impl Tag {
    /// Creates a new tag.
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        tag_type: impl Into<String>,
        ordinal: i64,
        meta: Option<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            tag_type: tag_type.into(),
            ordinal,
            meta,
        }
    }

    /// Builds the identity tag for a resolved handle.
    ///
    /// The handle is lowercased before it is embedded.
    pub fn identity(handle: &str) -> Self {
        let meta = StructuredMeta {
            bg_color: Some(IDENTITY_TAG_BG_COLOR.into()),
            tag_icon: Some(IDENTITY_TAG_ICON.into()),
            text_color: Some(IDENTITY_TAG_TEXT_COLOR.into()),
            tooltip_description: Some(IDENTITY_TAG_TOOLTIP.into()),
            idriss_handle: Some(handle.to_lowercase()),
            ..Default::default()
        };

        Self {
            slug: IDENTITY_TAG_SLUG.into(),
            name: IDENTITY_TAG_NAME.into(),
            tag_type: IDENTITY_TAG_TYPE.into(),
            ordinal: IDENTITY_TAG_ORDINAL,
            meta: Some(meta.to_payload()),
        }
    }

    /// Returns true if this is a synthesized identity tag.
    pub fn is_identity(&self) -> bool {
        self.slug == IDENTITY_TAG_SLUG
    }

    /// Parses the meta payload, producing a [`FormattedTag`].
    pub fn format(self) -> FormattedTag {
        let meta = format_meta(self.meta.as_deref());
        FormattedTag {
            slug: self.slug,
            name: self.name,
            tag_type: self.tag_type,
            ordinal: self.ordinal,
            meta,
        }
    }
}

/// Parsed tag meta payload.
///
/// Every field is optional. Unknown keys and non-string values are dropped
/// during parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMeta {
    /// Text color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    /// Background color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    /// Icon, usually a data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_icon: Option<String>,
    /// Link opened from the tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_url: Option<String>,
    /// Tooltip icon
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_icon: Option<String>,
    /// Tooltip title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_title: Option<String>,
    /// Tooltip body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_description: Option<String>,
    /// Tooltip link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip_url: Option<String>,
    /// Marketplace app id
    #[serde(default, rename = "appID", skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Marketplace app URL
    #[serde(default, rename = "appMarketplaceURL", skip_serializing_if = "Option::is_none")]
    pub app_marketplace_url: Option<String>,
    /// Marketplace app logo URL
    #[serde(default, rename = "appLogoURL", skip_serializing_if = "Option::is_none")]
    pub app_logo_url: Option<String>,
    /// Marketplace action button label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_action_button_text: Option<String>,
    /// Warpcast handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warpcast_handle: Option<String>,
    /// Resolved identity handle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idriss_handle: Option<String>,
}

impl StructuredMeta {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Serializes back into the payload form carried by [`Tag::meta`].
    pub fn to_payload(&self) -> String {
        // Only `Option<String>` fields; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}

/// A tag whose meta payload has been parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedTag {
    /// Stable identifier of the tag
    pub slug: String,
    /// Display name
    pub name: String,
    /// Provider-defined category
    pub tag_type: String,
    /// Sort position among an address's tags
    pub ordinal: i64,
    /// Parsed meta payload
    pub meta: StructuredMeta,
}

impl FormattedTag {
    /// Returns true if this is a synthesized identity tag.
    pub fn is_identity(&self) -> bool {
        self.slug == IDENTITY_TAG_SLUG
    }

    /// Returns the identity handle carried in the meta, if any.
    pub fn identity_handle(&self) -> Option<&str> {
        self.meta.idriss_handle.as_deref()
    }
}

impl From<Tag> for FormattedTag {
    fn from(tag: Tag) -> Self {
        tag.format()
    }
}
