//! Selection of archive records that are due for a refresh.

use std::sync::Arc;

use bridge_traits::time::Clock;
use chrono::{DateTime, Duration, Utc};
use core_library::{ArchiveRecord, ArchiveRepository};
use core_runtime::config::SyncSettings;
use tracing::{debug, instrument};

use crate::{Result, SyncError};

/// Timestamp bounds of the due predicate for one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueWindow {
    /// Oldest creation time still refreshed (inclusive)
    pub created_after: i64,
    /// Latest last-sync time that is stale again (inclusive)
    pub synced_before: i64,
}

/// Queries the store for top-level records eligible for refresh.
pub struct ArchiveSelector {
    archives: Arc<dyn ArchiveRepository>,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
}

impl ArchiveSelector {
    pub fn new(
        archives: Arc<dyn ArchiveRepository>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            archives,
            clock,
            settings,
        }
    }

    /// Compute the due window relative to `now`.
    pub fn window_at(&self, now: DateTime<Utc>) -> Result<DueWindow> {
        let creation_window = to_chrono(self.settings.creation_window)?;
        let refresh_interval = to_chrono(self.settings.refresh_interval)?;

        let created_after = now
            .checked_sub_signed(creation_window)
            .ok_or_else(|| SyncError::InvalidTimestamp("creation window".to_string()))?;
        let synced_before = now
            .checked_sub_signed(refresh_interval)
            .ok_or_else(|| SyncError::InvalidTimestamp("refresh interval".to_string()))?;

        Ok(DueWindow {
            created_after: created_after.timestamp(),
            synced_before: synced_before.timestamp(),
        })
    }

    /// Records due at `now`, least recently synchronized first.
    ///
    /// Never-synchronized records come first. At most `max_records_per_run`
    /// records are returned when a limit is configured.
    #[instrument(skip(self))]
    pub async fn select_due_records(&self, now: DateTime<Utc>) -> Result<Vec<ArchiveRecord>> {
        let window = self.window_at(now)?;
        let records = self
            .archives
            .find_due_for_sync(
                window.created_after,
                window.synced_before,
                self.settings.max_records_per_run,
            )
            .await?;

        debug!(
            due = records.len(),
            created_after = window.created_after,
            synced_before = window.synced_before,
            "Selected archive records for refresh"
        );

        Ok(records)
    }

    /// [`select_due_records`](Self::select_due_records) at the clock's current time.
    pub async fn select_due(&self) -> Result<Vec<ArchiveRecord>> {
        self.select_due_records(self.clock.now()).await
    }

    /// Number of records due now, ignoring the per-run limit.
    pub async fn count_due(&self) -> Result<i64> {
        let window = self.window_at(self.clock.now())?;
        Ok(self
            .archives
            .count_due(window.created_after, window.synced_before)
            .await?)
    }
}

fn to_chrono(duration: std::time::Duration) -> Result<Duration> {
    Duration::from_std(duration).map_err(|e| SyncError::InvalidTimestamp(e.to_string()))
}
