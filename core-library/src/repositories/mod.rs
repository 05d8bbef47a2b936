//! # Repository Pattern Implementation
//!
//! Repository traits and SQLite implementations for the archive store.
//!
//! ## Architecture
//!
//! - Traits define the interface for each repository so the sync core can be
//!   driven by fakes in tests
//! - SQLite implementations use sqlx for async database access
//! - All operations return `Result<T>` for error handling
//!
//! ## Available Repositories
//!
//! - `ArchiveRepository` - Archive records, due-for-sync selection, child
//!   replacement and atomic change-set commits
//! - `ConventionRepository` - Owning conventions (name lookup for title filtering)

pub mod archive;
pub mod convention;

pub use archive::{ArchiveRepository, SqliteArchiveRepository};
pub use convention::{ConventionRepository, SqliteConventionRepository};
