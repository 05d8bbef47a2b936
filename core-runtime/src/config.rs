//! # Core Configuration Module
//!
//! Provides configuration management for the archive synchronizer.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds every setting the sync run needs: where the archive
//! store lives, how to reach the video platform API, and the selection and
//! reconciliation policy. It enforces fail-fast validation so a misconfigured
//! run stops before touching the store or the network.
//!
//! ## Required Settings
//!
//! - `database_path` - SQLite archive store
//! - `api_key` - YouTube Data API key
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/var/lib/archive-sync/archives.db")
//!     .api_key("AIza...")
//!     .build()?;
//! ```
//!
//! ### Loading from the environment
//!
//! ```ignore
//! use core_runtime::config::CoreConfigBuilder;
//!
//! let config = CoreConfigBuilder::from_env()?
//!     .max_playlist_pages(4)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::logging::{LogFormat, LoggingConfig};
use bridge_traits::{HttpClient, LogLevel};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the archive store path
pub const ENV_DATABASE: &str = "ARCHIVE_SYNC_DATABASE";
/// Environment variable holding the YouTube Data API key
pub const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
/// Environment variable overriding the per-request timeout, in seconds
pub const ENV_TIMEOUT_SECS: &str = "ARCHIVE_SYNC_TIMEOUT_SECS";
/// Environment variable bounding how many records one run selects
pub const ENV_MAX_RECORDS: &str = "ARCHIVE_SYNC_MAX_RECORDS";
/// Environment variable bounding how many playlist item pages are fetched
pub const ENV_MAX_PAGES: &str = "ARCHIVE_SYNC_MAX_PAGES";
/// Environment variable holding the log level or a full filter directive
pub const ENV_LOG: &str = "ARCHIVE_SYNC_LOG";

/// Largest page the playlistItems endpoint will return
pub const MAX_PLAYLIST_PAGE_SIZE: u32 = 50;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_CREATION_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Core configuration for the archive synchronizer.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Path to the SQLite database file
    pub database_path: PathBuf,

    /// Remote API access settings
    pub youtube: YouTubeApiConfig,

    /// Selection and reconciliation policy
    pub sync: SyncSettings,

    /// HTTP client for making API requests (optional with desktop default)
    pub http_client: Option<Arc<dyn HttpClient>>,

    pub logging: LoggingConfig,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("database_path", &self.database_path)
            .field("youtube", &self.youtube)
            .field("sync", &self.sync)
            .field(
                "http_client",
                &self.http_client.as_ref().map(|_| "HttpClient { ... }"),
            )
            .field("logging", &self.logging)
            .finish()
    }
}

/// YouTube Data API access settings.
#[derive(Clone, PartialEq, Eq)]
pub struct YouTubeApiConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,

    /// Connect + response timeout applied to every call
    pub request_timeout: Duration,

    /// Reuse the underlying connection across calls
    pub keep_alive: bool,
}

impl std::fmt::Debug for YouTubeApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YouTubeApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("request_timeout", &self.request_timeout)
            .field("keep_alive", &self.keep_alive)
            .finish()
    }
}

/// How a playlist's prior child records are replaced during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildReplacement {
    /// Delete existing children as soon as the playlist id is known, before any
    /// remote call is made.
    #[default]
    DeleteBeforeFetch,

    /// Fetch first, then delete old children and insert new ones in the same
    /// commit.
    SwapOnCommit,
}

/// Selection and reconciliation policy for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Records created longer ago than this are no longer refreshed
    pub creation_window: Duration,

    /// Minimum time between two refreshes of the same record
    pub refresh_interval: Duration,

    /// Upper bound on records selected per run (`None` = unbounded)
    pub max_records_per_run: Option<u32>,

    /// Items requested per playlistItems page
    pub playlist_page_size: u32,

    /// Upper bound on playlistItems pages fetched per playlist
    pub max_playlist_pages: u32,

    pub child_replacement: ChildReplacement,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            creation_window: DEFAULT_CREATION_WINDOW,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_records_per_run: None,
            playlist_page_size: MAX_PLAYLIST_PAGE_SIZE,
            max_playlist_pages: 1,
            child_replacement: ChildReplacement::default(),
        }
    }
}

impl SyncSettings {
    /// Validates the policy values
    pub fn validate(&self) -> Result<()> {
        if self.creation_window.is_zero() {
            return Err(Error::Config(
                "Creation window must be greater than zero".to_string(),
            ));
        }

        if self.refresh_interval.is_zero() {
            return Err(Error::Config(
                "Refresh interval must be greater than zero".to_string(),
            ));
        }

        if self.playlist_page_size == 0 || self.playlist_page_size > MAX_PLAYLIST_PAGE_SIZE {
            return Err(Error::Config(format!(
                "Playlist page size must be between 1 and {}",
                MAX_PLAYLIST_PAGE_SIZE
            )));
        }

        if self.max_playlist_pages == 0 {
            return Err(Error::Config(
                "Max playlist pages must be at least 1".to_string(),
            ));
        }

        if self.max_records_per_run == Some(0) {
            return Err(Error::Config(
                "Max records per run must be greater than 0 when set".to_string(),
            ));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database path is not empty
    /// - API key is not empty
    /// - Request timeout is within (0, 300] seconds
    /// - Sync policy values are in range
    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        if self.youtube.api_key.trim().is_empty() {
            return Err(Error::CapabilityMissing {
                capability: "YouTube API key".to_string(),
                message: format!(
                    "An API key is required for the YouTube Data API. \
                     Set {} or pass --api-key.",
                    ENV_API_KEY
                ),
            });
        }

        if self.youtube.request_timeout.is_zero() {
            return Err(Error::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.youtube.request_timeout > MAX_REQUEST_TIMEOUT {
            return Err(Error::Config(format!(
                "Request timeout exceeds maximum of {} seconds",
                MAX_REQUEST_TIMEOUT.as_secs()
            )));
        }

        self.sync.validate()
    }
}

/// Store-only settings for read-only commands.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub database_path: PathBuf,
    pub sync: SyncSettings,
    pub logging: LoggingConfig,
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    database_path: Option<PathBuf>,
    api_key: Option<String>,
    request_timeout: Option<Duration>,
    keep_alive: Option<bool>,
    sync: SyncSettings,
    http_client: Option<Arc<dyn HttpClient>>,
    logging: LoggingConfig,
}

impl CoreConfigBuilder {
    /// Seeds a builder from the process environment.
    ///
    /// Unset variables leave the corresponding default in place. Set but
    /// unparseable variables are a configuration error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Seeds a builder from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::default();

        if let Some(path) = non_empty(lookup(ENV_DATABASE)) {
            builder = builder.database_path(path);
        }

        if let Some(key) = non_empty(lookup(ENV_API_KEY)) {
            builder = builder.api_key(key);
        }

        if let Some(raw) = non_empty(lookup(ENV_TIMEOUT_SECS)) {
            let secs = parse_number::<u64>(ENV_TIMEOUT_SECS, &raw)?;
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        if let Some(raw) = non_empty(lookup(ENV_MAX_RECORDS)) {
            let limit = parse_number::<u32>(ENV_MAX_RECORDS, &raw)?;
            builder = builder.max_records_per_run(limit);
        }

        if let Some(raw) = non_empty(lookup(ENV_MAX_PAGES)) {
            let pages = parse_number::<u32>(ENV_MAX_PAGES, &raw)?;
            builder = builder.max_playlist_pages(pages);
        }

        if let Some(raw) = non_empty(lookup(ENV_LOG)) {
            builder.logging = match raw.parse::<LogLevel>() {
                Ok(level) => builder.logging.with_level(level),
                Err(_) => builder.logging.with_filter(raw),
            };
        }

        Ok(builder)
    }

    /// Sets the archive store path (required).
    pub fn database_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.database_path = Some(path.into());
        self
    }

    /// Sets the YouTube Data API key (required).
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-call timeout (default: 20 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enables or disables connection reuse (default: enabled).
    pub fn keep_alive(mut self, enabled: bool) -> Self {
        self.keep_alive = Some(enabled);
        self
    }

    pub fn creation_window(mut self, window: Duration) -> Self {
        self.sync.creation_window = window;
        self
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.sync.refresh_interval = interval;
        self
    }

    pub fn max_records_per_run(mut self, limit: u32) -> Self {
        self.sync.max_records_per_run = Some(limit);
        self
    }

    pub fn playlist_page_size(mut self, size: u32) -> Self {
        self.sync.playlist_page_size = size;
        self
    }

    pub fn max_playlist_pages(mut self, pages: u32) -> Self {
        self.sync.max_playlist_pages = pages;
        self
    }

    pub fn child_replacement(mut self, strategy: ChildReplacement) -> Self {
        self.sync.child_replacement = strategy;
        self
    }

    /// Injects a custom HTTP client instead of the desktop default.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Overrides only the log output format.
    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.logging = self.logging.with_format(format);
        self
    }

    /// Builds the subset of settings needed to read the store.
    ///
    /// Unlike [`build`](Self::build) this does not require an API key, so
    /// read-only commands work without remote credentials.
    pub fn build_store_config(self) -> Result<StoreConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config(format!(
                "Database path is required. Use .database_path() or set {}.",
                ENV_DATABASE
            ))
        })?;

        if database_path.as_os_str().is_empty() {
            return Err(Error::Config("Database path cannot be empty".to_string()));
        }

        self.sync.validate()?;

        Ok(StoreConfig {
            database_path,
            sync: self.sync,
            logging: self.logging,
        })
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error with an actionable message if a required setting is
    /// missing or a value is out of range.
    pub fn build(self) -> Result<CoreConfig> {
        let database_path = self.database_path.ok_or_else(|| {
            Error::Config(format!(
                "Database path is required. Use .database_path() or set {}.",
                ENV_DATABASE
            ))
        })?;

        let api_key = self.api_key.ok_or_else(|| Error::CapabilityMissing {
            capability: "YouTube API key".to_string(),
            message: format!(
                "An API key is required for the YouTube Data API. \
                 Use .api_key() or set {}.",
                ENV_API_KEY
            ),
        })?;

        let config = CoreConfig {
            database_path,
            youtube: YouTubeApiConfig {
                api_key,
                request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
                keep_alive: self.keep_alive.unwrap_or(true),
            },
            sync: self.sync,
            http_client: self.http_client,
            logging: self.logging,
        };

        config.validate()?;

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, raw)))
}
