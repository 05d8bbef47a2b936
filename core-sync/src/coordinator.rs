//! # Sync Coordinator
//!
//! Runs one full selection-and-sync pass over the archive store.
//!
//! ## Workflow
//!
//! 1. Select every top-level record due for refresh, least recently
//!    synchronized first (optionally bounded by `max_records_per_run`)
//! 2. Synchronize the records strictly one at a time
//! 3. Commit each record's changes before moving to the next one
//! 4. Summarise the pass in a [`SyncReport`]
//!
//! A store failure aborts the pass; records committed before it stay
//! committed. Remote failures only affect the record being processed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::ArchiveSyncCoordinator;
//!
//! let coordinator = ArchiveSyncCoordinator::new(archives, catalog, clock, settings)?;
//! let report = coordinator.run().await?;
//! println!("{} of {} records synchronized", report.synchronized, report.selected);
//! ```

use std::sync::Arc;

use bridge_traits::catalog::MediaCatalog;
use bridge_traits::time::Clock;
use core_library::ArchiveRepository;
use core_runtime::config::SyncSettings;
use tracing::{info, instrument};

use crate::selector::ArchiveSelector;
use crate::synchronizer::{ArchiveSynchronizer, SyncOutcome};
use crate::Result;

/// Totals for one coordinator pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records returned by the selector
    pub selected: u64,
    /// Records whose `synchronized_at` advanced
    pub synchronized: u64,
    /// Records left alone (no recognisable id)
    pub skipped: u64,
    pub playlists_expanded: u64,
    pub videos_refreshed: u64,
    /// Video lookups that failed or found nothing
    pub videos_unavailable: u64,
    pub children_created: u64,
    pub children_removed: u64,
}

impl SyncReport {
    /// Fold one record's outcome into the totals.
    pub fn record(&mut self, outcome: &SyncOutcome) {
        if outcome.advanced() {
            self.synchronized += 1;
        }

        match outcome {
            SyncOutcome::Skipped { .. } => self.skipped += 1,
            SyncOutcome::PlaylistExpanded(expansion) => {
                self.playlists_expanded += 1;
                self.children_created += expansion.children_created;
                self.children_removed += expansion.children_removed;
            }
            SyncOutcome::VideoRefreshed { .. } => self.videos_refreshed += 1,
            SyncOutcome::VideoUnavailable { .. } => self.videos_unavailable += 1,
        }
    }
}

/// Read-only snapshot of the archive store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStatus {
    pub top_level: i64,
    /// Top-level records due now, ignoring the per-run limit
    pub due: i64,
    pub children: i64,
}

/// Drives the selector and synchronizer for a whole pass.
pub struct ArchiveSyncCoordinator {
    archives: Arc<dyn ArchiveRepository>,
    selector: ArchiveSelector,
    synchronizer: ArchiveSynchronizer,
}

impl ArchiveSyncCoordinator {
    /// Create a coordinator
    ///
    /// # Errors
    ///
    /// Returns `InvalidSettings` if the sync settings fail validation.
    pub fn new(
        archives: Arc<dyn ArchiveRepository>,
        catalog: Arc<dyn MediaCatalog>,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Result<Self> {
        settings.validate()?;

        Ok(Self {
            selector: ArchiveSelector::new(archives.clone(), clock.clone(), settings.clone()),
            synchronizer: ArchiveSynchronizer::new(archives.clone(), catalog, clock, settings),
            archives,
        })
    }

    /// Perform one selection-and-sync pass.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SyncReport> {
        let records = self.selector.select_due().await?;
        let mut report = SyncReport {
            selected: records.len() as u64,
            ..Default::default()
        };

        info!("Synchronizing {} archive records", records.len());

        for record in &records {
            let outcome = self.synchronizer.synchronize(record).await?;
            report.record(&outcome);
        }

        info!(
            selected = report.selected,
            synchronized = report.synchronized,
            skipped = report.skipped,
            playlists_expanded = report.playlists_expanded,
            videos_refreshed = report.videos_refreshed,
            videos_unavailable = report.videos_unavailable,
            children_created = report.children_created,
            children_removed = report.children_removed,
            "Archive sync pass completed"
        );

        Ok(report)
    }

    /// Count top-level, due and child records.
    pub async fn status(&self) -> Result<ArchiveStatus> {
        Ok(ArchiveStatus {
            top_level: self.archives.count_top_level().await?,
            due: self.selector.count_due().await?,
            children: self.archives.count_children().await?,
        })
    }
}
