//! Orbix Client Library
//!
//! High-level async client for the Roblox platform APIs: user profiles,
//! avatars, friends, badges, presence, games, and inventory, built on the
//! request execution layer in `orbix-core`.
//!
//! # Example
//!
//! ```rust,no_run
//! use orbix_client::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let client = OrbixClient::with_defaults()?;
//!
//! let user = client.get_user(156).await?;
//! println!("{} ({} followers)", user.display_name, user.follower_count);
//!
//! let avatar = client.get_user_avatar(156).await?;
//! println!("headshot: {}", avatar.headshot_url);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]

pub mod client;
pub mod models;

mod parse;

pub use client::OrbixClient;
pub use models::{
    AvatarSizes, BadgePage, FavouriteGame, FavouriteGamesPage, Game, LimitedItem,
    LimitedItemsPage, SortOrder, UserAvatar, UserBadge, UserPresence, UserProfile, WearingItem,
};

// Re-export the core surface callers routinely need alongside the client.
pub use orbix_core::config::{ClientConfig, ClientConfigBuilder};
pub use orbix_core::error::{Error, Result};

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```rust
/// use orbix_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::OrbixClient;
    pub use crate::models::{
        AvatarSizes, BadgePage, FavouriteGame, FavouriteGamesPage, Game, LimitedItem,
        LimitedItemsPage, SortOrder, UserAvatar, UserBadge, UserPresence, UserProfile, WearingItem,
    };
    pub use orbix_core::config::{ClientConfig, ClientConfigBuilder};
    pub use orbix_core::error::{Error, Result};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "orbix-client");
    }
}
