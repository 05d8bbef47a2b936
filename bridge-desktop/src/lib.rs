//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and server hosts
//! (macOS, Windows, Linux).
//!
//! - `HttpClient` using `reqwest` with rustls, a 20 second default timeout and
//!   keep-alive connection pooling
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{HttpClientConfig, ReqwestHttpClient};
//! use std::sync::Arc;
//!
//! let http = Arc::new(ReqwestHttpClient::from_config(HttpClientConfig::default())?);
//! ```

mod http;

pub use http::{HttpClientConfig, ReqwestHttpClient};
