//! # Archive Store Module
//!
//! Owns the archive database and provides repository patterns for data access.
//!
//! ## Overview
//!
//! This module manages:
//! - SQLite schema and embedded migrations
//! - Archive and convention models
//! - Repositories for selecting due records and committing one record's
//!   changes atomically

pub mod db;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::{LibraryError, Result};
pub use models::{ArchiveChangeSet, ArchiveKind, ArchiveRecord, CommitSummary, Convention};
pub use repositories::{
    ArchiveRepository, ConventionRepository, SqliteArchiveRepository, SqliteConventionRepository,
};
