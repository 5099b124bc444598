//! Orbix Core Library
//!
//! Core plumbing for the orbix Roblox API client: endpoint routing,
//! response caching, rate admission, retry, error taxonomy, metrics, and
//! the HTTP request executor itself.
//!
//! # Features
//!
//! - **Error Handling**: Comprehensive classified error types with `thiserror`
//! - **Async/Await**: Built on tokio and reqwest for non-blocking I/O
//! - **Caching**: TTL and LRU bounded response cache for GET requests
//! - **Rate Limiting**: Per-operation sliding-window admission
//!
//! # Example
//!
//! ```rust,no_run
//! use orbix_core::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let client = HttpClient::new(HttpConfig::default())?;
//! let user = client
//!     .get(ApiDomain::Users, "/v1/users/1", None, true)
//!     .await?;
//! println!("{user}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Global suppressions: these lints apply broadly across the codebase and
// would require excessive local annotations.
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]

// Re-exports of external dependencies
pub use serde;
pub use serde_json;

// Core modules
pub mod cache;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod metrics;
pub mod rate_limiter;
pub mod retry;

// Re-exports of core types for convenience
pub use cache::{ApiCache, CacheStats, cache_key};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use endpoints::{ApiDomain, DEFAULT_BASE_URL, base_url_for};
pub use error::{ApiErrorDetails, Error, NetworkError, ParseError, Result};
pub use http_client::{HttpClient, HttpConfig};
pub use metrics::{MetricsRecorder, MetricsSummary, RequestMetrics};
pub use rate_limiter::RateLimiter;
pub use retry::{RetryConfig, RetryPolicy};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use orbix_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::cache::{ApiCache, CacheStats, cache_key};
    pub use crate::config::{ClientConfig, ClientConfigBuilder};
    pub use crate::endpoints::{ApiDomain, base_url_for};
    pub use crate::error::{Error, NetworkError, ParseError, Result};
    pub use crate::http_client::{HttpClient, HttpConfig};
    pub use crate::logging::{LogConfig, LogFormat, LogLevel, init_logging, try_init_logging};
    pub use crate::metrics::{MetricsRecorder, MetricsSummary, RequestMetrics};
    pub use crate::rate_limiter::RateLimiter;
    pub use crate::retry::{RetryConfig, RetryPolicy};
    pub use serde::{Deserialize, Serialize};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
