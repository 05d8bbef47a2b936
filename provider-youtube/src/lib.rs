//! # YouTube Provider
//!
//! Implements the `MediaCatalog` trait for the YouTube Data API v3.
//!
//! ## Overview
//!
//! This crate provides:
//! - Playlist and video snippet lookups
//! - Token-driven paging over playlist items
//! - Recognition of playlist and video ids in user-supplied URLs
//! - Mapping of API error payloads into [`YouTubeError`]
//!
//! ## Usage
//!
//! ```ignore
//! use provider_youtube::YouTubeConnector;
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let connector = YouTubeConnector::new(http_client, api_key);
//! ```

pub mod connector;
pub mod error;
pub mod types;
pub mod urls;

pub use connector::{YouTubeConnector, MAX_PAGE_SIZE, YOUTUBE_API_BASE};
pub use error::{Result, YouTubeError};
pub use urls::{canonical_video_url, playlist_id_from_url, video_id_from_url, WATCH_URL_PREFIX};
