//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the archive synchronizer:
//! - Logging and tracing bootstrap
//! - Configuration management (builder, validation, environment loading)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other crates depend on. It
//! establishes the logging conventions and the configuration surface shared by
//! the sync core and the `archive-sync` binary.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    ChildReplacement, CoreConfig, CoreConfigBuilder, StoreConfig, SyncSettings, YouTubeApiConfig,
};
pub use error::{Error, Result};
