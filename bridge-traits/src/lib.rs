//! # Host Bridge Traits
//!
//! Capability contracts that the archive synchronization core depends on but
//! does not implement itself.
//!
//! ## Overview
//!
//! The core never reaches for ambient globals. Every capability it needs is
//! injected as a trait object:
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with a bounded timeout
//! - [`MediaCatalog`](catalog::MediaCatalog) - Remote video platform metadata
//!   (playlist snippets, playlist items, video snippets) and URL recognition
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//!
//! ## Implementations
//!
//! | Trait          | Implementation Crate | Backend |
//! |----------------|----------------------|---------|
//! | `HttpClient`   | `bridge-desktop`     | reqwest |
//! | `MediaCatalog` | `provider-youtube`   | YouTube Data API v3 |
//! | `Clock`        | this crate           | `SystemClock` |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Callers in
//! the sync core treat any `BridgeError` coming out of a remote call as "no data"
//! for that call; it never aborts a run on its own.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so implementations can be shared
//! behind `Arc` across async tasks.

pub mod catalog;
pub mod error;
pub mod http;
pub mod time;

pub use error::BridgeError;

pub use catalog::{MediaCatalog, MediaSnippet, PlaylistEntry, PlaylistPage, Thumbnail, ThumbnailSet};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use time::{Clock, LogLevel, SystemClock};
