//! Endpoint domain table for Roblox API routing.
//!
//! The Roblox platform splits its REST surface across several independently
//! hosted subdomains. [`ApiDomain`] names the ones the client talks to, and
//! [`base_url_for`] maps a domain key to its base URL. Unknown keys resolve
//! to the generic fallback host rather than failing; `avatar` and
//! `inventory` are intentionally unmapped and land on the fallback.

use serde::{Deserialize, Serialize};

/// Fallback host for domain keys without a dedicated subdomain.
pub const DEFAULT_BASE_URL: &str = "https://api.roblox.com";

/// Upstream API domain, each served from its own host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiDomain {
    /// User profiles and batch lookups.
    Users,
    /// Avatar thumbnail rendering.
    Thumbnails,
    /// Game/universe details and favourites.
    Games,
    /// Badge listings.
    Badges,
    /// Friends, followers and followings.
    Friends,
    /// Online presence.
    Presence,
    /// Currently-worn avatar assets.
    Avatar,
    /// Collectible inventory.
    Inventory,
}

impl ApiDomain {
    /// Returns the stable string key for this domain.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Thumbnails => "thumbnails",
            Self::Games => "games",
            Self::Badges => "badges",
            Self::Friends => "friends",
            Self::Presence => "presence",
            Self::Avatar => "avatar",
            Self::Inventory => "inventory",
        }
    }

    /// Returns the base URL this domain resolves to.
    #[must_use]
    pub fn base_url(self) -> &'static str {
        base_url_for(self.key())
    }
}

impl std::fmt::Display for ApiDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Resolves a domain key to its base URL.
///
/// Unknown keys never fail; they fall back to [`DEFAULT_BASE_URL`].
#[must_use]
pub fn base_url_for(key: &str) -> &'static str {
    match key {
        "users" => "https://users.roblox.com",
        "thumbnails" => "https://thumbnails.roblox.com",
        "games" => "https://games.roblox.com",
        "badges" => "https://badges.roblox.com",
        "friends" => "https://friends.roblox.com",
        "presence" => "https://presence.roblox.com",
        _ => DEFAULT_BASE_URL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_domains() {
        assert_eq!(ApiDomain::Users.base_url(), "https://users.roblox.com");
        assert_eq!(
            ApiDomain::Thumbnails.base_url(),
            "https://thumbnails.roblox.com"
        );
        assert_eq!(ApiDomain::Games.base_url(), "https://games.roblox.com");
        assert_eq!(ApiDomain::Badges.base_url(), "https://badges.roblox.com");
        assert_eq!(ApiDomain::Friends.base_url(), "https://friends.roblox.com");
        assert_eq!(
            ApiDomain::Presence.base_url(),
            "https://presence.roblox.com"
        );
    }

    #[test]
    fn test_unmapped_domains_fall_back() {
        assert_eq!(ApiDomain::Avatar.base_url(), DEFAULT_BASE_URL);
        assert_eq!(ApiDomain::Inventory.base_url(), DEFAULT_BASE_URL);
        assert_eq!(base_url_for("bogus"), DEFAULT_BASE_URL);
        assert_eq!(base_url_for(""), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_domain_key_display() {
        assert_eq!(ApiDomain::Users.key(), "users");
        assert_eq!(ApiDomain::Inventory.to_string(), "inventory");
    }
}
