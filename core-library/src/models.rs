//! Domain models for the archive store
//!
//! This module contains the archive and convention models with validation and
//! database mapping.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Archive kind
// =============================================================================

/// What an archive record points at on the remote platform.
///
/// Persisted as `"yt_playlist"` / `"yt_video"`. Any other stored value decodes
/// to [`ArchiveKind::Video`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArchiveKind {
    #[serde(rename = "yt_playlist")]
    Playlist,
    #[serde(rename = "yt_video")]
    Video,
}

impl ArchiveKind {
    pub const PLAYLIST: &'static str = "yt_playlist";
    pub const VIDEO: &'static str = "yt_video";

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveKind::Playlist => Self::PLAYLIST,
            ArchiveKind::Video => Self::VIDEO,
        }
    }

    /// Decode a stored kind, falling back to `Video` for unknown values.
    pub fn from_stored(value: &str) -> Self {
        match value {
            Self::PLAYLIST => ArchiveKind::Playlist,
            Self::VIDEO => ArchiveKind::Video,
            other => {
                tracing::debug!(kind = other, "Unrecognised archive kind, treating as video");
                ArchiveKind::Video
            }
        }
    }
}

impl From<String> for ArchiveKind {
    fn from(value: String) -> Self {
        Self::from_stored(&value)
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Convention
// =============================================================================

/// Owning entity of archive records. Only `name` matters to the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Convention {
    pub id: String,
    pub name: String,
    pub created_at: i64,
}

impl Convention {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Convention id cannot be empty".to_string());
        }
        if self.name.trim().is_empty() {
            return Err("Convention name cannot be empty".to_string());
        }
        Ok(())
    }
}

// =============================================================================
// Archive record
// =============================================================================

/// One external media reference, top-level or produced by playlist expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ArchiveRecord {
    /// Unique identifier
    pub id: String,
    /// Owning convention
    pub convention_id: String,
    /// Owning convention's name, joined in on read
    #[sqlx(default)]
    pub convention_name: String,
    #[sqlx(try_from = "String")]
    pub kind: ArchiveKind,
    /// URL as entered by the user (or canonicalised by a video sync)
    pub source_url: String,
    /// Set on children created from a playlist
    pub parent_archive_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Opaque grouping, copied from parent to children
    pub folder: Option<String>,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds of the last successful sync
    pub synchronized_at: Option<i64>,
}

impl ArchiveRecord {
    /// Create a new top-level record as a user submission would.
    pub fn new(convention: &Convention, kind: ArchiveKind, source_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            convention_id: convention.id.clone(),
            convention_name: convention.name.clone(),
            kind,
            source_url: source_url.into(),
            parent_archive_id: None,
            name: None,
            description: None,
            thumbnail_url: None,
            folder: None,
            created_at: chrono::Utc::now().timestamp(),
            synchronized_at: None,
        }
    }

    /// Create a child video record under a playlist record.
    ///
    /// The child inherits convention and folder and is never synchronized on
    /// its own.
    pub fn child_of(
        parent: &ArchiveRecord,
        source_url: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        thumbnail_url: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            convention_id: parent.convention_id.clone(),
            convention_name: parent.convention_name.clone(),
            kind: ArchiveKind::Video,
            source_url: source_url.into(),
            parent_archive_id: Some(parent.id.clone()),
            name: Some(name.into()),
            description: Some(description.into()),
            thumbnail_url: Some(thumbnail_url.into()),
            folder: parent.folder.clone(),
            created_at,
            synchronized_at: None,
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent_archive_id.is_none()
    }

    /// Validate record data
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Archive id cannot be empty".to_string());
        }

        if self.convention_id.trim().is_empty() {
            return Err("Archive must belong to a convention".to_string());
        }

        if self.source_url.trim().is_empty() {
            return Err("Source URL cannot be empty".to_string());
        }

        if let Some(parent) = &self.parent_archive_id {
            if parent == &self.id {
                return Err("Archive cannot be its own parent".to_string());
            }
            if self.kind != ArchiveKind::Video {
                return Err("Child archives must be video references".to_string());
            }
        }

        if let Some(synced) = self.synchronized_at {
            if synced < 0 {
                return Err(format!("Invalid synchronized_at timestamp: {}", synced));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Change set
// =============================================================================

/// Pending mutations for one synchronized record, flushed in one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveChangeSet {
    /// Delete every child of this record before inserting
    pub replace_children_of: Option<String>,
    pub inserts: Vec<ArchiveRecord>,
    pub updates: Vec<ArchiveRecord>,
}

impl ArchiveChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_children_of(&mut self, parent_id: impl Into<String>) {
        self.replace_children_of = Some(parent_id.into());
    }

    pub fn insert(&mut self, record: ArchiveRecord) {
        self.inserts.push(record);
    }

    pub fn update(&mut self, record: ArchiveRecord) {
        self.updates.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.replace_children_of.is_none() && self.inserts.is_empty() && self.updates.is_empty()
    }
}

/// What a flushed change set did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub children_removed: u64,
    pub inserted: u64,
    pub updated: u64,
}
