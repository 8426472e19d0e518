//! Album model
//!
//! The cacheable unit: an album as returned by the remote photo service.

use serde::{Deserialize, Serialize};

/// An album in the remote photo service.
///
/// `title` is the cache key. The remaining fields are remote-assigned
/// metadata a caller may choose to cache alongside it. Every field defaults
/// to its zero value, so a partially populated album is still valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Album {
    /// Identifier assigned by the remote service
    pub id: String,
    /// Human-readable title, unique within the cache
    pub title: String,
    /// URL to the album in the remote service's web UI
    pub product_url: String,
    /// Whether media items can be added to the album
    pub is_writeable: bool,
    /// Number of media items, as reported by the remote service
    pub media_items_count: String,
    /// Base URL for the cover photo bytes
    pub cover_photo_base_url: String,
    /// Identifier of the media item used as cover
    pub cover_photo_media_item_id: String,
}

impl Album {
    /// Creates an album carrying only a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
