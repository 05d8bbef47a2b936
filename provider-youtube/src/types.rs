//! YouTube Data API response types
//!
//! Data structures for deserializing YouTube Data API v3 list responses.
//! Only the fields the synchronizer reads are modelled; everything else in
//! the payload is ignored.

use bridge_traits::catalog::{MediaSnippet, ThumbnailSet};
use serde::Deserialize;

/// Envelope shared by `playlists.list`, `playlistItems.list` and `videos.list`
///
/// See: https://developers.google.com/youtube/v3/docs/playlistItems/list#response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    /// Matching resources (absent or empty when nothing matched)
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,

    /// Token for next page
    #[serde(default)]
    pub next_page_token: Option<String>,

    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: Option<u32>,
    #[serde(default)]
    pub results_per_page: Option<u32>,
}

/// `snippet` part of a playlist, playlist item or video
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub thumbnails: ThumbnailSet,

    /// Only present on playlist items
    #[serde(default)]
    pub resource_id: Option<ResourceId>,
}

impl From<Snippet> for MediaSnippet {
    fn from(snippet: Snippet) -> Self {
        MediaSnippet {
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Playlist or video resource
#[derive(Debug, Deserialize)]
pub struct SnippetResource {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub snippet: Option<Snippet>,
}

/// Playlist item resource
///
/// See: https://developers.google.com/youtube/v3/docs/playlistItems#resource
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemResource {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub snippet: Option<Snippet>,

    #[serde(default)]
    pub content_details: Option<PlaylistItemContentDetails>,
}

impl PlaylistItemResource {
    /// Video id from `contentDetails`, falling back to `snippet.resourceId`
    pub fn video_id(&self) -> Option<&str> {
        self.content_details
            .as_ref()
            .and_then(|details| details.video_id.as_deref())
            .or_else(|| {
                self.snippet
                    .as_ref()
                    .and_then(|s| s.resource_id.as_ref())
                    .and_then(|r| r.video_id.as_deref())
            })
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

/// Error payload returned with non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}
