//! # Archive Sync Module
//!
//! Keeps stored archive records in step with the remote video platform.
//!
//! ## Components
//!
//! - **Name filter** (`normalize`): strips the convention name from remote titles and picks thumbnails
//! - **Selector** (`selector`): finds top-level records due for refresh
//! - **Playlist pager** (`pager`): lazy, bounded paging over playlist items
//! - **Synchronizer** (`synchronizer`): reconciles one record and commits it
//! - **Sync Coordinator** (`coordinator`): runs a full pass and reports totals

pub mod coordinator;
pub mod error;
pub mod normalize;
pub mod pager;
pub mod selector;
pub mod synchronizer;

pub use coordinator::{ArchiveStatus, ArchiveSyncCoordinator, SyncReport};
pub use error::{Result, SyncError};
pub use normalize::{filter_name, resolve_thumbnail, PRIVATE_VIDEO_TITLE};
pub use pager::PlaylistPager;
pub use selector::{ArchiveSelector, DueWindow};
pub use synchronizer::{ArchiveSynchronizer, PlaylistExpansion, SkipReason, SyncOutcome};
