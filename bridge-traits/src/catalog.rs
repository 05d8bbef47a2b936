//! Media Catalog Abstraction
//!
//! Read-only contract for a remote video platform. The sync core only needs
//! three lookups (playlist snippet, one page of playlist items, video snippet)
//! plus the ability to recognise identifiers inside user-supplied URLs.
//!
//! A lookup that finds nothing returns `Ok(None)` (or an empty page). Transport
//! failures and non-2xx responses surface as `Err`; callers in the sync core
//! fold both into "no data" and keep going.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single thumbnail rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Thumbnail {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
        }
    }
}

/// The named thumbnail renditions a snippet may carry. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailSet {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
    #[serde(default)]
    pub standard: Option<Thumbnail>,
    #[serde(default)]
    pub maxres: Option<Thumbnail>,
}

impl ThumbnailSet {
    pub fn is_empty(&self) -> bool {
        self.default.is_none()
            && self.medium.is_none()
            && self.high.is_none()
            && self.standard.is_none()
            && self.maxres.is_none()
    }
}

/// Title, description and thumbnails of a playlist or video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSnippet {
    pub title: String,
    pub description: String,
    pub thumbnails: ThumbnailSet,
}

/// One item of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    /// Video identifier the item points to
    pub video_id: String,
    pub snippet: MediaSnippet,
}

/// One page of playlist items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistPage {
    pub entries: Vec<PlaylistEntry>,
    /// Items the provider returned that carry no video id or no snippet
    pub unusable: u32,
    /// Token for the next page, `None` on the last page
    pub next_page_token: Option<String>,
}

/// Remote video platform catalog
///
/// Implementations must be cheap to share behind `Arc` and must never retry
/// on their own: one call is one request.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::catalog::MediaCatalog;
///
/// async fn title_of(catalog: &dyn MediaCatalog, url: &str) -> Option<String> {
///     let id = catalog.video_id_from_url(url)?;
///     catalog.fetch_video(&id).await.ok().flatten().map(|s| s.title)
/// }
/// ```
#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Extract a playlist identifier from a URL, if it carries one.
    fn playlist_id_from_url(&self, url: &str) -> Option<String>;

    /// Extract a video identifier from a URL, if it carries one.
    fn video_id_from_url(&self, url: &str) -> Option<String>;

    /// Canonical watch URL for a video identifier.
    fn canonical_video_url(&self, video_id: &str) -> String;

    /// Fetch the snippet of a playlist.
    ///
    /// Returns `Ok(None)` when the platform reports no such playlist.
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Option<MediaSnippet>>;

    /// Fetch one page of playlist items.
    ///
    /// `page_token` is `None` for the first page.
    async fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<PlaylistPage>;

    /// Fetch the snippet of a video.
    ///
    /// Returns `Ok(None)` when the platform reports no such video.
    async fn fetch_video(&self, video_id: &str) -> Result<Option<MediaSnippet>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_set_deserializes_partial() {
        let json = r#"{
            "medium": {"url": "https://i.ytimg.com/vi/abc/mqdefault.jpg", "width": 320, "height": 180}
        }"#;
        let set: ThumbnailSet = serde_json::from_str(json).unwrap();

        assert!(set.default.is_none());
        assert_eq!(set.medium.as_ref().map(|t| t.width), Some(Some(320)));
        assert!(set.maxres.is_none());
        assert!(!set.is_empty());
    }

    #[test]
    fn test_thumbnail_without_url_still_deserializes() {
        let json = r#"{"medium": {"width": 320, "height": 180}, "default": {"url": "https://i.ytimg.com/d.jpg"}}"#;
        let set: ThumbnailSet = serde_json::from_str(json).unwrap();

        assert_eq!(set.medium.as_ref().map(|t| t.url.as_str()), Some(""));
        assert!(set.default.is_some());
    }

    #[test]
    fn test_empty_thumbnail_set() {
        let set: ThumbnailSet = serde_json::from_str("{}").unwrap();
        assert!(set.is_empty());
        assert_eq!(set, ThumbnailSet::default());
    }
}
