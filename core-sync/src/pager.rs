//! Lazy, bounded iteration over the pages of a remote playlist.

use bridge_traits::catalog::{MediaCatalog, PlaylistPage};
use bridge_traits::error::Result as BridgeResult;
use tracing::debug;

/// Pages of one playlist, fetched on demand.
///
/// Each call to [`next_page`](Self::next_page) issues at most one request. The
/// pager stops after `max_pages` pages, after the last page, or after the first
/// failed fetch. If it stopped because of the page bound,
/// [`continuation_token`](Self::continuation_token) can seed a later
/// [`resume`](Self::resume).
pub struct PlaylistPager<'a> {
    catalog: &'a dyn MediaCatalog,
    playlist_id: String,
    page_size: u32,
    max_pages: u32,
    next_token: Option<String>,
    fetched: u32,
    finished: bool,
}

impl<'a> PlaylistPager<'a> {
    pub fn new(
        catalog: &'a dyn MediaCatalog,
        playlist_id: impl Into<String>,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            catalog,
            playlist_id: playlist_id.into(),
            page_size,
            max_pages,
            next_token: None,
            fetched: 0,
            finished: false,
        }
    }

    /// Continue a playlist from a token returned by a previous pager.
    pub fn resume(
        catalog: &'a dyn MediaCatalog,
        playlist_id: impl Into<String>,
        page_token: impl Into<String>,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        let mut pager = Self::new(catalog, playlist_id, page_size, max_pages);
        pager.next_token = Some(page_token.into());
        pager
    }

    /// Fetch the next page, or `None` once the pager is done.
    pub async fn next_page(&mut self) -> Option<BridgeResult<PlaylistPage>> {
        if self.finished || self.fetched >= self.max_pages {
            return None;
        }

        let result = self
            .catalog
            .fetch_playlist_page(&self.playlist_id, self.next_token.as_deref(), self.page_size)
            .await;
        self.fetched += 1;

        match &result {
            Ok(page) => {
                self.next_token = page.next_page_token.clone();
                if self.next_token.is_none() {
                    self.finished = true;
                }
                debug!(
                    playlist_id = %self.playlist_id,
                    page = self.fetched,
                    entries = page.entries.len(),
                    has_more = !self.finished,
                    "Fetched playlist page"
                );
            }
            Err(_) => {
                self.finished = true;
            }
        }

        Some(result)
    }

    /// Pages requested so far, including a failed one.
    pub fn pages_fetched(&self) -> u32 {
        self.fetched
    }

    /// Token of the first page not yet fetched, when the playlist has more.
    pub fn continuation_token(&self) -> Option<&str> {
        if self.finished {
            None
        } else {
            self.next_token.as_deref()
        }
    }
}
