//! YouTube Data API connector implementation
//!
//! Implements the `MediaCatalog` trait for the YouTube Data API v3.

use async_trait::async_trait;
use bridge_traits::catalog::{MediaCatalog, MediaSnippet, PlaylistEntry, PlaylistPage};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use core_runtime::logging::redact_url_key;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::{Result, YouTubeError};
use crate::types::{ApiErrorResponse, ListResponse, PlaylistItemResource, SnippetResource};
use crate::urls;

/// YouTube Data API base URL
pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Maximum results per playlistItems page (API limit)
pub const MAX_PAGE_SIZE: u32 = 50;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// YouTube Data API connector
///
/// Implements `MediaCatalog` on top of an injected [`HttpClient`].
///
/// # Features
///
/// - Playlist snippet lookup (`playlists.list`)
/// - Token-driven playlist item pages (`playlistItems.list`)
/// - Video snippet lookup (`videos.list`)
/// - API key authentication via the `key` query parameter
///
/// Every call is a single request with a fixed timeout. An empty `items` array
/// is reported as `None` (or an empty page), not as an error.
///
/// # Example
///
/// ```ignore
/// use provider_youtube::YouTubeConnector;
/// use bridge_traits::MediaCatalog;
///
/// let connector = YouTubeConnector::new(http_client, api_key);
/// let snippet = connector.fetch_video("dQw4w9WgXcQ").await?;
/// ```
pub struct YouTubeConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// Data API key
    api_key: String,

    base_url: String,

    timeout: Duration,
}

impl YouTubeConnector {
    /// Create a new YouTube connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `api_key` - YouTube Data API v3 key
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: YOUTUBE_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the connector at a different API root (for tests and proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build an endpoint URL with query parameters and the API key appended
    fn endpoint(&self, resource: &str, params: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, resource))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            query.append_pair("key", &self.api_key);
        }
        Ok(url.into())
    }

    /// Issue one GET and decode a list response
    async fn get_list<T: DeserializeOwned>(&self, url: String) -> Result<ListResponse<T>> {
        let request = HttpRequest::new(HttpMethod::Get, url.clone())
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self.http_client.execute(request).await.map_err(|e| {
            warn!(url = %redact_url_key(&url), error = %e, "YouTube API request failed");
            YouTubeError::Bridge(e)
        })?;

        if !response.is_success() {
            let error = Self::api_error(&response);
            warn!(url = %redact_url_key(&url), error = %error, "YouTube API returned an error");
            return Err(error);
        }

        debug!(url = %redact_url_key(&url), status = response.status, "YouTube API request succeeded");

        serde_json::from_slice(&response.body)
            .map_err(|e| YouTubeError::ParseError(e.to_string()))
    }

    fn api_error(response: &HttpResponse) -> YouTubeError {
        let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
            .map(|payload| payload.error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).into_owned());

        YouTubeError::ApiError {
            status_code: response.status,
            message,
        }
    }

    /// First snippet of a list response, if any
    fn first_snippet(response: ListResponse<SnippetResource>) -> Option<MediaSnippet> {
        response
            .items
            .into_iter()
            .next()
            .and_then(|item| item.snippet)
            .map(MediaSnippet::from)
    }

    async fn playlist(&self, playlist_id: &str) -> Result<Option<MediaSnippet>> {
        let url = self.endpoint(
            "playlists",
            &[("part", "id,snippet"), ("id", playlist_id), ("maxResults", "1")],
        )?;
        let response = self.get_list::<SnippetResource>(url).await?;
        Ok(Self::first_snippet(response))
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> Result<PlaylistPage> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let mut params = vec![
            ("part", "id,snippet,status,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let url = self.endpoint("playlistItems", &params)?;
        let response = self.get_list::<PlaylistItemResource>(url).await?;

        let mut entries = Vec::with_capacity(response.items.len());
        let mut unusable = 0;
        for item in response.items {
            let video_id = item.video_id().map(str::to_string);
            match (video_id, item.snippet) {
                (Some(video_id), Some(snippet)) => entries.push(PlaylistEntry {
                    video_id,
                    snippet: snippet.into(),
                }),
                _ => {
                    debug!(%playlist_id, item = %item.id, "Playlist item without video id or snippet");
                    unusable += 1;
                }
            }
        }

        Ok(PlaylistPage {
            entries,
            unusable,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn video(&self, video_id: &str) -> Result<Option<MediaSnippet>> {
        let url = self.endpoint(
            "videos",
            &[("id", video_id), ("part", "snippet,contentDetails"), ("maxResults", "1")],
        )?;
        let response = self.get_list::<SnippetResource>(url).await?;
        Ok(Self::first_snippet(response))
    }
}

#[async_trait]
impl MediaCatalog for YouTubeConnector {
    fn playlist_id_from_url(&self, url: &str) -> Option<String> {
        urls::playlist_id_from_url(url)
    }

    fn video_id_from_url(&self, url: &str) -> Option<String> {
        urls::video_id_from_url(url)
    }

    fn canonical_video_url(&self, video_id: &str) -> String {
        urls::canonical_video_url(video_id)
    }

    #[instrument(skip(self))]
    async fn fetch_playlist(&self, playlist_id: &str) -> BridgeResult<Option<MediaSnippet>> {
        Ok(self.playlist(playlist_id).await?)
    }

    #[instrument(skip(self))]
    async fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        page_size: u32,
    ) -> BridgeResult<PlaylistPage> {
        Ok(self.playlist_page(playlist_id, page_token, page_size).await?)
    }

    #[instrument(skip(self))]
    async fn fetch_video(&self, video_id: &str) -> BridgeResult<Option<MediaSnippet>> {
        Ok(self.video(video_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn json_response(status: u16, body: &str) -> BridgeResult<HttpResponse> {
        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        })
    }

    fn query_of(url: &str) -> HashMap<String, String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_endpoint_encodes_params_and_key() {
        let connector = YouTubeConnector::new(Arc::new(MockHttpClient::new()), "k&y");
        let url = connector
            .endpoint("videos", &[("id", "abc"), ("part", "snippet,contentDetails")])
            .unwrap();

        assert!(url.starts_with("https://www.googleapis.com/youtube/v3/videos?"));
        let query = query_of(&url);
        assert_eq!(query.get("id").map(String::as_str), Some("abc"));
        assert_eq!(query.get("part").map(String::as_str), Some("snippet,contentDetails"));
        assert_eq!(query.get("key").map(String::as_str), Some("k&y"));
    }

    #[tokio::test]
    async fn test_fetch_playlist_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| {
                let query = query_of(&req.url);
                req.url.contains("/playlists?")
                    && query.get("id").map(String::as_str) == Some("PL123")
                    && query.get("part").map(String::as_str) == Some("id,snippet")
                    && req.timeout == Some(Duration::from_secs(20))
            })
            .returning(|_| {
                json_response(
                    200,
                    r#"{
                        "items": [{
                            "id": "PL123",
                            "snippet": {
                                "title": "MyCon 2024 Panels",
                                "description": "All panels",
                                "thumbnails": {"maxres": {"url": "https://i.ytimg.com/pl/max.jpg"}}
                            }
                        }]
                    }"#,
                )
            });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let snippet = connector.fetch_playlist("PL123").await.unwrap().unwrap();

        assert_eq!(snippet.title, "MyCon 2024 Panels");
        assert_eq!(snippet.description, "All panels");
        assert_eq!(
            snippet.thumbnails.maxres.map(|t| t.url),
            Some("https://i.ytimg.com/pl/max.jpg".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_playlist_empty_items_is_none() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| json_response(200, r#"{"items": []}"#));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        assert!(connector.fetch_playlist("PLgone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_playlist_page_with_token() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| {
                let query = query_of(&req.url);
                query.get("playlistId").map(String::as_str) == Some("PL123")
                    && query.get("pageToken").map(String::as_str) == Some("CDIQAA")
                    && query.get("maxResults").map(String::as_str) == Some("50")
            })
            .returning(|_| {
                json_response(
                    200,
                    r#"{
                        "nextPageToken": "CGQQAA",
                        "items": [
                            {
                                "id": "i1",
                                "snippet": {"title": "Panel A", "description": "a", "thumbnails": {}},
                                "contentDetails": {"videoId": "aaaaaaaaaaa"}
                            },
                            {
                                "id": "i2",
                                "snippet": {"title": "Deleted video", "description": ""}
                            },
                            {
                                "id": "i3",
                                "snippet": {"title": "Panel B", "description": "b"},
                                "contentDetails": {"videoId": "bbbbbbbbbbb"}
                            }
                        ]
                    }"#,
                )
            });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let page = connector
            .fetch_playlist_page("PL123", Some("CDIQAA"), 50)
            .await
            .unwrap();

        assert_eq!(page.next_page_token.as_deref(), Some("CGQQAA"));
        let ids: Vec<_> = page.entries.iter().map(|e| e.video_id.as_str()).collect();
        assert_eq!(ids, vec!["aaaaaaaaaaa", "bbbbbbbbbbb"]);
        assert_eq!(page.entries[1].snippet.title, "Panel B");
        assert_eq!(page.unusable, 1);
    }

    #[tokio::test]
    async fn test_fetch_playlist_page_clamps_page_size() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| query_of(&req.url).get("maxResults").map(String::as_str) == Some("50"))
            .returning(|_| json_response(200, r#"{"items": []}"#));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let page = connector.fetch_playlist_page("PL123", None, 500).await.unwrap();
        assert!(page.entries.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[tokio::test]
    async fn test_fetch_video_success() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .withf(|req| {
                let query = query_of(&req.url);
                req.url.contains("/videos?")
                    && query.get("id").map(String::as_str) == Some("dQw4w9WgXcQ")
                    && query.get("part").map(String::as_str) == Some("snippet,contentDetails")
            })
            .returning(|_| {
                json_response(
                    200,
                    r#"{"items": [{"id": "dQw4w9WgXcQ", "snippet": {
                        "title": "MyCon - Closing",
                        "description": "bye",
                        "thumbnails": {"medium": {"url": "https://i.ytimg.com/m.jpg"}}
                    }}]}"#,
                )
            });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let snippet = connector.fetch_video("dQw4w9WgXcQ").await.unwrap().unwrap();
        assert_eq!(snippet.title, "MyCon - Closing");
        assert!(snippet.thumbnails.medium.is_some());
    }

    #[tokio::test]
    async fn test_api_error_is_reported_once() {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(|_| {
            json_response(
                403,
                r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#,
            )
        });

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let err = connector.fetch_video("dQw4w9WgXcQ").await.unwrap_err();

        match err {
            BridgeError::OperationFailed(message) => {
                assert!(message.contains("403"));
                assert!(message.contains("quotaExceeded"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| json_response(200, "<html>oops</html>"));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        assert!(connector.fetch_video("dQw4w9WgXcQ").await.is_err());
    }

    #[tokio::test]
    async fn test_transport_timeout_passes_through() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::Timeout(20)));

        let connector = YouTubeConnector::new(Arc::new(mock_http), "test_key");
        let err = connector.fetch_playlist("PL123").await.unwrap_err();
        assert!(matches!(err, BridgeError::Timeout(20)));
    }

    #[test]
    fn test_url_recognition_delegates() {
        let connector = YouTubeConnector::new(Arc::new(MockHttpClient::new()), "test_key")
            .with_base_url("http://localhost:8080/youtube/v3/");

        assert_eq!(connector.base_url, "http://localhost:8080/youtube/v3");
        assert_eq!(
            connector.playlist_id_from_url("https://www.youtube.com/playlist?list=PL9"),
            Some("PL9".to_string())
        );
        assert_eq!(
            connector.video_id_from_url("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            connector.canonical_video_url("dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
