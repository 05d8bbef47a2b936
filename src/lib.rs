//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates. Host applications can depend on `archive-sync-workspace`
//! with the `desktop-shims` feature to get the fully wired [`CoreService`].

#[cfg(feature = "desktop-shims")]
pub use core_service::{archive_status, CoreError, CoreService};
