//! Typed boundary models for the Roblox platform APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sort order accepted by paged list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Asc,
    /// Newest first.
    Desc,
}

impl SortOrder {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        }
    }
}

/// A user profile.
///
/// `follower_count`, `following_count` and `friend_count` are only populated
/// by lookups that fan out to the counting endpoints; list endpoints leave
/// them at zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Numeric user id.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Display name shown in the UI.
    pub display_name: String,
    /// Profile description, empty when absent.
    pub description: String,
    /// Account creation time, when the endpoint reports it.
    pub created_date: Option<DateTime<Utc>>,
    /// Number of followers.
    pub follower_count: u64,
    /// Number of users followed.
    pub following_count: u64,
    /// Number of friends.
    pub friend_count: u64,
    /// Whether the account carries a verified badge.
    pub is_verified: bool,
}

impl UserProfile {
    /// Canonical web profile URL for this user.
    #[must_use]
    pub fn profile_url(&self) -> String {
        format!("https://www.roblox.com/users/{}/profile", self.id)
    }
}

/// Thumbnail URLs for a user's avatar.
///
/// A URL is the empty string when the corresponding thumbnail lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAvatar {
    /// Numeric user id.
    pub user_id: u64,
    /// Headshot thumbnail URL.
    pub headshot_url: String,
    /// Bust thumbnail URL.
    pub bust_url: String,
    /// Full-body thumbnail URL.
    pub full_body_url: String,
}

/// Requested thumbnail sizes for an avatar lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarSizes {
    /// Headshot size, e.g. `"48x48"`.
    pub headshot: String,
    /// Bust size, e.g. `"48x48"`.
    pub bust: String,
    /// Full-body size, e.g. `"150x150"`.
    pub full_body: String,
}

impl Default for AvatarSizes {
    fn default() -> Self {
        Self {
            headshot: "48x48".to_string(),
            bust: "48x48".to_string(),
            full_body: "150x150".to_string(),
        }
    }
}

/// A badge awarded to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBadge {
    /// Badge id.
    pub id: u64,
    /// Badge name.
    pub name: String,
    /// Badge description, empty when absent.
    pub description: String,
    /// Whether the badge is still enabled.
    pub enabled: bool,
    /// Asset id of the badge icon.
    pub icon_image_id: u64,
    /// Badge creation time.
    pub created: Option<DateTime<Utc>>,
    /// Total number of awards.
    pub awarded_count: u64,
    /// Percentage of players who earned the badge.
    pub win_rate_percentage: f64,
}

/// One page of a user's badges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgePage {
    /// Badges on this page; malformed upstream entries are dropped.
    pub badges: Vec<UserBadge>,
    /// Cursor of the previous page, if any.
    pub previous_cursor: Option<String>,
    /// Cursor of the next page, if any.
    pub next_cursor: Option<String>,
}

/// A user's current presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPresence {
    /// Numeric user id.
    pub user_id: u64,
    /// Presence kind: 0 offline, 1 online, 2 in game, 3 in studio.
    pub presence_type: u8,
    /// Human-readable location, empty when absent.
    pub last_location: String,
    /// Place currently being played, if any.
    pub place_id: Option<u64>,
    /// Root place of the current universe, if any.
    pub root_place_id: Option<u64>,
    /// Opaque game session id, if any.
    pub game_id: Option<String>,
    /// Universe currently being played, if any.
    pub universe_id: Option<u64>,
}

/// A game (universe) listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Universe id.
    pub id: u64,
    /// Root place id.
    pub root_place_id: u64,
    /// Game name.
    pub name: String,
    /// Game description, empty when absent.
    pub description: String,
    /// Creator id.
    pub creator_id: u64,
    /// Creator name.
    pub creator_name: String,
    /// Creator kind, `"User"` or `"Group"`.
    pub creator_type: String,
    /// Current concurrent player count.
    pub playing: u64,
    /// Total visit count.
    pub visits: u64,
    /// Server size.
    pub max_players: u64,
    /// Game creation time.
    pub created: Option<DateTime<Utc>>,
    /// Genre label.
    pub genre: String,
}

/// A game a user has favourited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteGame {
    /// The favourited game.
    pub game: Game,
}

/// One page of a user's favourite games.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavouriteGamesPage {
    /// Favourites on this page; malformed upstream entries are dropped.
    pub favourite_games: Vec<FavouriteGame>,
    /// Cursor of the previous page, if any.
    pub previous_cursor: Option<String>,
    /// Cursor of the next page, if any.
    pub next_cursor: Option<String>,
}

/// A limited (collectible) item held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitedItem {
    /// Id of this specific copy.
    pub user_asset_id: u64,
    /// Serial number of this copy.
    pub serial_number: u64,
    /// Catalog asset id.
    pub asset_id: u64,
    /// Item name.
    pub name: String,
    /// Recent average resale price in Robux.
    pub recent_average_price: u64,
    /// Original sale price in Robux.
    pub original_price: u64,
    /// Remaining stock, when reported.
    pub asset_stock: i64,
    /// Whether the copy is on trade hold.
    pub is_on_hold: bool,
}

/// One page of a user's limited items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitedItemsPage {
    /// Items on this page; malformed upstream entries are dropped.
    pub limited_items: Vec<LimitedItem>,
    /// Cursor of the previous page, if any.
    pub previous_cursor: Option<String>,
    /// Cursor of the next page, if any.
    pub next_cursor: Option<String>,
}

/// An asset a user is currently wearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WearingItem {
    /// Catalog asset id.
    pub asset_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url() {
        let profile = UserProfile {
            id: 156,
            username: "builderman".to_string(),
            display_name: "Builderman".to_string(),
            description: String::new(),
            created_date: None,
            follower_count: 0,
            following_count: 0,
            friend_count: 0,
            is_verified: true,
        };
        assert_eq!(
            profile.profile_url(),
            "https://www.roblox.com/users/156/profile"
        );
    }

    #[test]
    fn test_default_avatar_sizes() {
        let sizes = AvatarSizes::default();
        assert_eq!(sizes.headshot, "48x48");
        assert_eq!(sizes.full_body, "150x150");
    }

    #[test]
    fn test_sort_order_strings() {
        assert_eq!(SortOrder::Asc.as_str(), "Asc");
        assert_eq!(SortOrder::Desc.as_str(), "Desc");
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
