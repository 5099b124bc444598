//! # Orbix
//!
//! An async Rust client library for the Roblox web APIs, providing typed
//! access to user profiles, avatars, friends, badges, presence, games, and
//! inventory.
//!
//! ## Features
//!
//! - **Async/Await**: Built on tokio and reqwest for non-blocking I/O
//! - **Caching**: TTL and LRU bounded response cache for GET requests
//! - **Rate Limiting**: Per-operation sliding-window admission
//! - **Resilience**: Bounded exponential-backoff retry with classified errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use orbix::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = OrbixClient::with_defaults()?;
//!     let user = client.get_user(156).await?;
//!     println!("{} has {} followers", user.display_name, user.follower_count);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// Re-export the core execution layer
pub use orbix_core::{
    cache::{ApiCache, CacheStats},
    config::{ClientConfig, ClientConfigBuilder},
    endpoints::ApiDomain,
    error::{Error, NetworkError, ParseError, Result},
    http_client::{HttpClient, HttpConfig},
    logging::{init_logging, try_init_logging, LogConfig, LogFormat, LogLevel},
    metrics::{MetricsRecorder, MetricsSummary, RequestMetrics},
    rate_limiter::RateLimiter,
    retry::{RetryConfig, RetryPolicy},
};

// Re-export the high-level client and models
pub use orbix_client::{
    models::{
        AvatarSizes, BadgePage, FavouriteGame, FavouriteGamesPage, Game, LimitedItem,
        LimitedItemsPage, SortOrder, UserAvatar, UserBadge, UserPresence, UserProfile, WearingItem,
    },
    OrbixClient,
};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use orbix::prelude::*;
/// ```
pub mod prelude {
    pub use orbix_client::prelude::*;
    pub use orbix_core::logging::{try_init_logging, LogConfig};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
