//! # Archive Synchronizer
//!
//! Refreshes one archive record from the remote catalog and commits the result.
//!
//! ## Playlist records
//!
//! 1. Extract the playlist id from the `list` query parameter; skip if absent
//! 2. Drop the existing children (immediately, or inside the commit when
//!    [`ChildReplacement::SwapOnCommit`] is configured)
//! 3. Refresh name, description and thumbnail from the playlist snippet when
//!    the lookup succeeds
//! 4. Expand the playlist items into child video records, skipping private
//!    videos and items without a usable thumbnail
//! 5. Advance `synchronized_at`, even when the remote calls failed
//!
//! ## Video records
//!
//! 1. Extract the video id; skip if absent
//! 2. Rewrite `source_url` to the canonical watch URL
//! 3. Fetch the video snippet; on failure leave the record untouched
//! 4. Overwrite metadata and advance `synchronized_at`
//!
//! Every call ends with exactly one commit of the record's change set, even
//! when nothing was queued.

use std::sync::Arc;

use bridge_traits::catalog::{MediaCatalog, PlaylistEntry};
use bridge_traits::time::Clock;
use core_library::{ArchiveChangeSet, ArchiveKind, ArchiveRecord, ArchiveRepository};
use core_runtime::config::{ChildReplacement, SyncSettings};
use tracing::{debug, instrument, warn};

use crate::normalize::{filter_name, resolve_thumbnail};
use crate::pager::PlaylistPager;
use crate::Result;

/// Why a record was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Playlist URL has no `list` parameter
    NoPlaylistId,
    /// No video id could be recognised in the URL
    NoVideoId,
    /// Children are only refreshed through their playlist
    ChildRecord,
}

/// Result of expanding one playlist record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistExpansion {
    pub playlist_id: String,
    /// Playlist snippet was fetched and applied
    pub metadata_refreshed: bool,
    pub pages_fetched: u32,
    /// An item page failed; children from earlier pages were kept
    pub items_failed: bool,
    pub children_created: u64,
    /// Items dropped as private or without thumbnail
    pub children_excluded: u64,
    pub children_removed: u64,
    /// Token of the first unfetched page when the page bound was hit
    pub continuation_token: Option<String>,
}

/// What [`ArchiveSynchronizer::synchronize`] did with a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Skipped { reason: SkipReason },
    PlaylistExpanded(PlaylistExpansion),
    /// Video metadata overwritten; `private` when the title was the sentinel
    VideoRefreshed { video_id: String, private: bool },
    /// Video lookup failed or returned nothing; record unchanged
    VideoUnavailable { video_id: String },
}

impl SyncOutcome {
    /// Whether `synchronized_at` was advanced.
    pub fn advanced(&self) -> bool {
        matches!(
            self,
            SyncOutcome::PlaylistExpanded(_) | SyncOutcome::VideoRefreshed { .. }
        )
    }
}

/// Reconciles single archive records against a [`MediaCatalog`].
pub struct ArchiveSynchronizer {
    archives: Arc<dyn ArchiveRepository>,
    catalog: Arc<dyn MediaCatalog>,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
}

impl ArchiveSynchronizer {
    pub fn new(
        archives: Arc<dyn ArchiveRepository>,
        catalog: Arc<dyn MediaCatalog>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            archives,
            catalog,
            clock,
            settings,
        }
    }

    /// Synchronize one record and commit its changes.
    ///
    /// Remote failures never surface as errors. Only store failures do.
    #[instrument(skip(self, record), fields(archive_id = %record.id, kind = %record.kind))]
    pub async fn synchronize(&self, record: &ArchiveRecord) -> Result<SyncOutcome> {
        let now = self.clock.now().timestamp();
        let mut changes = ArchiveChangeSet::new();

        let mut outcome = if !record.is_top_level() {
            SyncOutcome::Skipped {
                reason: SkipReason::ChildRecord,
            }
        } else {
            match record.kind {
                ArchiveKind::Playlist => self.sync_playlist(record, now, &mut changes).await?,
                ArchiveKind::Video => self.sync_video(record, now, &mut changes).await,
            }
        };

        let summary = self.archives.commit(&changes).await?;

        if let SyncOutcome::PlaylistExpanded(expansion) = &mut outcome {
            expansion.children_created = summary.inserted;
            expansion.children_removed += summary.children_removed;
        }

        debug!(?outcome, "Archive record synchronized");
        Ok(outcome)
    }

    async fn sync_playlist(
        &self,
        record: &ArchiveRecord,
        now: i64,
        changes: &mut ArchiveChangeSet,
    ) -> Result<SyncOutcome> {
        let Some(playlist_id) = self.catalog.playlist_id_from_url(&record.source_url) else {
            debug!(source_url = %record.source_url, "No playlist id in source URL");
            return Ok(SyncOutcome::Skipped {
                reason: SkipReason::NoPlaylistId,
            });
        };

        let mut expansion = PlaylistExpansion {
            playlist_id: playlist_id.clone(),
            ..Default::default()
        };

        match self.settings.child_replacement {
            ChildReplacement::DeleteBeforeFetch => {
                expansion.children_removed = self.archives.delete_children(&record.id).await?;
            }
            ChildReplacement::SwapOnCommit => changes.replace_children_of(record.id.clone()),
        }

        let mut updated = record.clone();

        match self.catalog.fetch_playlist(&playlist_id).await {
            Ok(Some(snippet)) => {
                updated.thumbnail_url = resolve_thumbnail(&snippet.thumbnails);
                updated.name = Some(snippet.title);
                updated.description = Some(snippet.description);
                expansion.metadata_refreshed = true;
            }
            Ok(None) => debug!(%playlist_id, "Playlist not found"),
            Err(e) => warn!(%playlist_id, error = %e, "Failed to fetch playlist metadata"),
        }

        let mut pager = PlaylistPager::new(
            self.catalog.as_ref(),
            playlist_id.as_str(),
            self.settings.playlist_page_size,
            self.settings.max_playlist_pages,
        );

        while let Some(page) = pager.next_page().await {
            match page {
                Ok(page) => {
                    expansion.children_excluded += u64::from(page.unusable);
                    for entry in page.entries {
                        match self.child_from_entry(record, entry, now) {
                            Some(child) => changes.insert(child),
                            None => expansion.children_excluded += 1,
                        }
                    }
                }
                Err(e) => {
                    warn!(
                        %playlist_id,
                        page = pager.pages_fetched(),
                        error = %e,
                        "Failed to fetch playlist items"
                    );
                    expansion.items_failed = true;
                }
            }
        }

        expansion.pages_fetched = pager.pages_fetched();
        expansion.continuation_token = pager.continuation_token().map(str::to_string);

        updated.synchronized_at = Some(now);
        changes.update(updated);

        Ok(SyncOutcome::PlaylistExpanded(expansion))
    }

    /// Child record for a playlist item, unless the item is private, its
    /// filtered name is empty or it has no usable thumbnail.
    fn child_from_entry(
        &self,
        parent: &ArchiveRecord,
        entry: PlaylistEntry,
        now: i64,
    ) -> Option<ArchiveRecord> {
        let name = filter_name(&parent.convention_name, &entry.snippet.title)
            .filter(|name| !name.is_empty())?;
        let thumbnail_url = resolve_thumbnail(&entry.snippet.thumbnails)?;

        Some(ArchiveRecord::child_of(
            parent,
            self.catalog.canonical_video_url(&entry.video_id),
            name,
            entry.snippet.description,
            thumbnail_url,
            now,
        ))
    }

    async fn sync_video(
        &self,
        record: &ArchiveRecord,
        now: i64,
        changes: &mut ArchiveChangeSet,
    ) -> SyncOutcome {
        let Some(video_id) = self.catalog.video_id_from_url(&record.source_url) else {
            debug!(source_url = %record.source_url, "No video id in source URL");
            return SyncOutcome::Skipped {
                reason: SkipReason::NoVideoId,
            };
        };

        let snippet = match self.catalog.fetch_video(&video_id).await {
            Ok(Some(snippet)) => snippet,
            Ok(None) => {
                debug!(%video_id, "Video not found");
                return SyncOutcome::VideoUnavailable { video_id };
            }
            Err(e) => {
                warn!(%video_id, error = %e, "Failed to fetch video metadata");
                return SyncOutcome::VideoUnavailable { video_id };
            }
        };

        let name = filter_name(&record.convention_name, &snippet.title);
        let private = name.is_none();

        let mut updated = record.clone();
        updated.source_url = self.catalog.canonical_video_url(&video_id);
        updated.name = name;
        updated.description = Some(snippet.description);
        updated.thumbnail_url = resolve_thumbnail(&snippet.thumbnails);
        updated.synchronized_at = Some(now);
        changes.update(updated);

        SyncOutcome::VideoRefreshed { video_id, private }
    }
}
