//! High-level Roblox API client.
//!
//! [`OrbixClient`] composes the core layers around each logical operation:
//! the sliding-window gate admits the call against that operation's
//! per-minute budget, the retry policy wraps the network exchange, and the
//! executor performs and classifies it. Fan-out operations run their
//! sub-requests concurrently and substitute neutral defaults for failed
//! sub-results instead of cancelling siblings.
//!
//! Lookup operations propagate failures; the discovery-flavoured ones
//! (favourite games, currently-wearing, limited items) are best-effort and
//! degrade to empty results with a warning.

use futures::future::join_all;
use orbix_core::cache::CacheStats;
use orbix_core::config::ClientConfig;
use orbix_core::endpoints::ApiDomain;
use orbix_core::error::{Error, ParseError, Result};
use orbix_core::http_client::{HttpClient, HttpConfig};
use orbix_core::metrics::MetricsRecorder;
use orbix_core::rate_limiter::RateLimiter;
use orbix_core::retry::RetryPolicy;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::models::{
    AvatarSizes, BadgePage, FavouriteGame, FavouriteGamesPage, Game, LimitedItemsPage, SortOrder,
    UserAvatar, UserPresence, UserProfile, WearingItem,
};
use crate::parse;

/// Page sizes the badge and inventory endpoints accept.
const PAGE_LIMITS: [u32; 4] = [10, 25, 50, 100];
/// Maximum user ids per batch lookup.
const MAX_BATCH_USERS: usize = 100;
/// Maximum user ids per presence lookup.
const MAX_PRESENCE_USERS: usize = 20;
/// Maximum universe ids per game details lookup.
const MAX_UNIVERSE_IDS: usize = 100;
/// Chunk size used when pre-warming the cache.
const WARM_CACHE_CHUNK: usize = 50;

/// Async client for the Roblox platform APIs.
///
/// Cheap to share behind an `Arc`; all interior state is synchronized.
#[derive(Debug)]
pub struct OrbixClient {
    http: HttpClient,
    gate: RateLimiter,
    retry: RetryPolicy,
}

impl OrbixClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let retry = RetryPolicy::new(config.retry);
        let http = HttpClient::new(HttpConfig::from(&config))?;
        Ok(Self {
            http,
            gate: RateLimiter::new(),
            retry,
        })
    }

    /// Creates a client with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be constructed.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Returns the shared metrics recorder.
    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.http.metrics()
    }

    /// Returns response cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.http.cache_stats()
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.http.clear_cache();
    }

    /// Pre-fills the response cache for the given users in chunks,
    /// ignoring individual chunk failures.
    pub async fn warm_cache(&self, user_ids: &[u64]) {
        if user_ids.is_empty() {
            return;
        }
        let chunks = user_ids
            .chunks(WARM_CACHE_CHUNK)
            .map(|chunk| self.get_users_batch(chunk));
        for result in join_all(chunks).await {
            if let Err(e) = result {
                warn!(error = %e, "cache warm chunk failed");
            }
        }
    }

    /// Fetches a user profile with follower, following and friend counts.
    ///
    /// The three count lookups run concurrently; a failed count defaults to
    /// zero and is logged, without failing the profile lookup.
    ///
    /// # Errors
    ///
    /// [`Error::UserNotFound`] when the user does not exist; otherwise any
    /// classified failure of the profile exchange itself.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: u64) -> Result<UserProfile> {
        self.gate.admit("get_user", 120).await?;
        let path = format!("/v1/users/{user_id}");
        let response = self.get_json(ApiDomain::Users, &path, None).await?;
        let mut profile = parse::user_profile(&response)?;

        let (followers, following, friends) = tokio::join!(
            self.get_user_follower_count(user_id),
            self.get_user_following_count(user_id),
            self.get_user_friend_count(user_id),
        );
        profile.follower_count = count_or_zero(followers, user_id, "follower");
        profile.following_count = count_or_zero(following, user_id, "following");
        profile.friend_count = count_or_zero(friends, user_id, "friend");

        Ok(profile)
    }

    /// Fetches up to 100 user profiles in one request.
    ///
    /// Counts are not populated for batch lookups. An empty input returns an
    /// empty vec without I/O.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for more than 100 ids, before any I/O.
    pub async fn get_users_batch(&self, user_ids: &[u64]) -> Result<Vec<UserProfile>> {
        if user_ids.len() > MAX_BATCH_USERS {
            return Err(Error::invalid_request("batch limited to 100 users"));
        }
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.gate.admit("get_users_batch", 120).await?;
        let body = json!({"userIds": user_ids, "excludeBannedUsers": true});
        let response = self.post_json(ApiDomain::Users, "/v1/users", &body).await?;
        entries(&response, "data")
            .iter()
            .map(parse::user_profile_batch)
            .collect()
    }

    /// Resolves a username to a full profile.
    ///
    /// # Errors
    ///
    /// [`Error::UserNotFound`] when no user carries that name.
    #[instrument(skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserProfile> {
        self.gate.admit("get_user_by_username", 120).await?;
        let body = json!({"usernames": [username], "excludeBannedUsers": true});
        let response = self
            .post_json(ApiDomain::Users, "/v1/usernames/users", &body)
            .await?;

        let first = response
            .get("data")
            .and_then(Value::as_array)
            .and_then(|data| data.first())
            .ok_or_else(|| Error::user_not_found(username.to_string()))?;
        let id = first
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::from(ParseError::missing_field("id")))?;

        self.get_user(id).await
    }

    /// Fetches avatar thumbnails at the default sizes.
    ///
    /// # Errors
    ///
    /// Only admission failures; see [`OrbixClient::get_user_avatar_sized`].
    pub async fn get_user_avatar(&self, user_id: u64) -> Result<UserAvatar> {
        self.get_user_avatar_sized(user_id, &AvatarSizes::default())
            .await
    }

    /// Fetches headshot, bust and full-body thumbnails concurrently.
    ///
    /// A failed thumbnail lookup leaves that URL empty; siblings are never
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Only admission failures; sub-request failures degrade to empty URLs.
    #[instrument(skip(self, sizes))]
    pub async fn get_user_avatar_sized(
        &self,
        user_id: u64,
        sizes: &AvatarSizes,
    ) -> Result<UserAvatar> {
        self.gate.admit("get_user_avatar", 180).await?;
        let (headshot_url, bust_url, full_body_url) = tokio::join!(
            self.fetch_thumbnail(user_id, "/v1/users/avatar-headshot", &sizes.headshot),
            self.fetch_thumbnail(user_id, "/v1/users/avatar-bust", &sizes.bust),
            self.fetch_thumbnail(user_id, "/v1/users/avatar", &sizes.full_body),
        );
        Ok(UserAvatar {
            user_id,
            headshot_url,
            bust_url,
            full_body_url,
        })
    }

    /// Lists a user's followers, newest first. `limit` is clamped to 100.
    pub async fn get_user_followers(&self, user_id: u64, limit: u32) -> Result<Vec<UserProfile>> {
        self.gate.admit("get_user_followers", 120).await?;
        let path = format!("/v1/users/{user_id}/followers");
        self.fetch_profile_list(&path, limit, Some(SortOrder::Desc))
            .await
    }

    /// Lists users a user follows, newest first. `limit` is clamped to 100.
    pub async fn get_user_following(&self, user_id: u64, limit: u32) -> Result<Vec<UserProfile>> {
        self.gate.admit("get_user_following", 120).await?;
        let path = format!("/v1/users/{user_id}/followings");
        self.fetch_profile_list(&path, limit, Some(SortOrder::Desc))
            .await
    }

    /// Lists a user's friends. `limit` is clamped to 100.
    pub async fn get_user_friends(&self, user_id: u64, limit: u32) -> Result<Vec<UserProfile>> {
        self.gate.admit("get_user_friends", 120).await?;
        let path = format!("/v1/users/{user_id}/friends");
        self.fetch_profile_list(&path, limit, None).await
    }

    /// Fetches a user's follower count.
    pub async fn get_user_follower_count(&self, user_id: u64) -> Result<u64> {
        self.gate.admit("get_user_follower_count", 60).await?;
        let path = format!("/v1/users/{user_id}/followers/count");
        self.fetch_count(&path).await
    }

    /// Fetches how many users a user follows.
    pub async fn get_user_following_count(&self, user_id: u64) -> Result<u64> {
        self.gate.admit("get_user_following_count", 60).await?;
        let path = format!("/v1/users/{user_id}/followings/count");
        self.fetch_count(&path).await
    }

    /// Fetches a user's friend count.
    pub async fn get_user_friend_count(&self, user_id: u64) -> Result<u64> {
        self.gate.admit("get_user_friend_count", 60).await?;
        let path = format!("/v1/users/{user_id}/friends/count");
        self.fetch_count(&path).await
    }

    /// Fetches one page of a user's badges.
    ///
    /// `limit` is snapped to the nearest accepted page size (10, 25, 50 or
    /// 100). Malformed badge entries are skipped and logged.
    #[instrument(skip(self, cursor))]
    pub async fn get_user_badges(
        &self,
        user_id: u64,
        limit: u32,
        sort_order: SortOrder,
        cursor: Option<&str>,
    ) -> Result<BadgePage> {
        self.gate.admit("get_user_badges", 120).await?;
        let mut params = vec![
            ("limit".to_string(), snap_page_limit(limit).to_string()),
            ("sortOrder".to_string(), sort_order.as_str().to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }

        let path = format!("/v1/users/{user_id}/badges");
        let response = self
            .get_json(ApiDomain::Badges, &path, Some(&params))
            .await?;

        let badges = entries(&response, "data")
            .iter()
            .filter_map(|entry| match parse::user_badge(entry) {
                Ok(badge) => Some(badge),
                Err(e) => {
                    warn!(user_id, error = %e, "skipping malformed badge entry");
                    None
                }
            })
            .collect();

        Ok(BadgePage {
            badges,
            previous_cursor: cursor_field(&response, "previousPageCursor"),
            next_cursor: cursor_field(&response, "nextPageCursor"),
        })
    }

    /// Fetches presence for up to 20 users. Malformed entries are skipped
    /// and logged; an empty input returns an empty vec without I/O.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for more than 20 ids, before any I/O.
    pub async fn get_user_presence(&self, user_ids: &[u64]) -> Result<Vec<UserPresence>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        if user_ids.len() > MAX_PRESENCE_USERS {
            return Err(Error::invalid_request("20 user IDs allowed per request"));
        }
        self.gate.admit("get_user_presence", 120).await?;
        let body = json!({"userIds": user_ids});
        let response = self
            .post_json(ApiDomain::Presence, "/v1/presence/users", &body)
            .await?;

        Ok(entries(&response, "userPresences")
            .iter()
            .filter_map(|entry| match parse::user_presence(entry) {
                Ok(presence) => Some(presence),
                Err(e) => {
                    warn!(error = %e, "skipping malformed presence entry");
                    None
                }
            })
            .collect())
    }

    /// Fetches presence for a single user, `None` when the service reports
    /// nothing for them.
    pub async fn get_user_presence_single(&self, user_id: u64) -> Result<Option<UserPresence>> {
        self.gate.admit("get_user_presence_single", 120).await?;
        Ok(self.get_user_presence(&[user_id]).await?.into_iter().next())
    }

    /// Fetches one page of a user's favourite games. Best-effort: any
    /// failure past admission degrades to an empty page with a warning.
    #[instrument(skip(self, cursor))]
    pub async fn get_user_favourite_games(
        &self,
        user_id: u64,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<FavouriteGamesPage> {
        self.gate.admit("get_user_favourite_games", 120).await?;
        let mut params = vec![
            ("limit".to_string(), limit.min(50).to_string()),
            ("sortOrder".to_string(), SortOrder::Desc.as_str().to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }

        let path = format!("/v2/users/{user_id}/favourite/games");
        match self
            .http
            .get(ApiDomain::Games, &path, Some(&params), true)
            .await
        {
            Ok(response) => {
                let favourite_games = entries(&response, "data")
                    .iter()
                    .filter_map(|entry| match parse::game_basic(entry) {
                        Ok(game) => Some(FavouriteGame { game }),
                        Err(e) => {
                            warn!(user_id, error = %e, "skipping malformed favourite game entry");
                            None
                        }
                    })
                    .collect();
                Ok(FavouriteGamesPage {
                    favourite_games,
                    previous_cursor: cursor_field(&response, "previousPageCursor"),
                    next_cursor: cursor_field(&response, "nextPageCursor"),
                })
            }
            Err(e) => {
                warn!(user_id, error = %e, "favourite games lookup failed, returning empty page");
                Ok(FavouriteGamesPage {
                    favourite_games: Vec::new(),
                    previous_cursor: None,
                    next_cursor: None,
                })
            }
        }
    }

    /// Fetches details for up to 100 universes. Malformed entries are
    /// skipped and logged; an empty input returns an empty vec without I/O.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRequest`] for more than 100 ids, before any I/O.
    pub async fn get_game_details(&self, universe_ids: &[u64]) -> Result<Vec<Game>> {
        if universe_ids.is_empty() {
            return Ok(Vec::new());
        }
        if universe_ids.len() > MAX_UNIVERSE_IDS {
            return Err(Error::invalid_request(
                "100 universe IDs allowed per request",
            ));
        }
        self.gate.admit("get_game_details", 120).await?;
        let joined = universe_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let params = vec![("universeIds".to_string(), joined)];
        let response = self
            .get_json(ApiDomain::Games, "/v1/games", Some(&params))
            .await?;

        Ok(entries(&response, "data")
            .iter()
            .filter_map(|entry| match parse::game_detailed(entry) {
                Ok(game) => Some(game),
                Err(e) => {
                    warn!(error = %e, "skipping malformed game entry");
                    None
                }
            })
            .collect())
    }

    /// Fetches details for one universe, `None` when the service reports
    /// nothing for it.
    pub async fn get_game_details_single(&self, universe_id: u64) -> Result<Option<Game>> {
        self.gate.admit("get_game_details_single", 120).await?;
        Ok(self
            .get_game_details(&[universe_id])
            .await?
            .into_iter()
            .next())
    }

    /// Lists the assets a user is currently wearing. Best-effort: any
    /// failure past admission degrades to an empty vec with a warning.
    pub async fn get_user_currently_wearing(&self, user_id: u64) -> Result<Vec<WearingItem>> {
        self.gate.admit("get_user_currently_wearing", 120).await?;
        let path = format!("/v1/users/{user_id}/currently-wearing");
        match self.http.get(ApiDomain::Avatar, &path, None, true).await {
            Ok(response) => Ok(entries(&response, "assetIds")
                .iter()
                .filter_map(Value::as_u64)
                .map(|asset_id| WearingItem { asset_id })
                .collect()),
            Err(e) => {
                warn!(user_id, error = %e, "currently-wearing lookup failed, returning empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Fetches one page of a user's limited items. `limit` is snapped to
    /// the nearest accepted page size. Best-effort: any failure past
    /// admission degrades to an empty page with a warning.
    #[instrument(skip(self, cursor))]
    pub async fn get_user_limited_items(
        &self,
        user_id: u64,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<LimitedItemsPage> {
        self.gate.admit("get_user_limited_items", 120).await?;
        let mut params = vec![
            ("assetType".to_string(), "All".to_string()),
            ("limit".to_string(), snap_page_limit(limit).to_string()),
            ("sortOrder".to_string(), SortOrder::Desc.as_str().to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor".to_string(), cursor.to_string()));
        }

        let path = format!("/v1/users/{user_id}/assets/collectibles");
        match self
            .http
            .get(ApiDomain::Inventory, &path, Some(&params), true)
            .await
        {
            Ok(response) => {
                let limited_items = entries(&response, "data")
                    .iter()
                    .filter_map(|entry| match parse::limited_item(entry) {
                        Ok(item) => Some(item),
                        Err(e) => {
                            warn!(user_id, error = %e, "skipping malformed limited item entry");
                            None
                        }
                    })
                    .collect();
                Ok(LimitedItemsPage {
                    limited_items,
                    previous_cursor: cursor_field(&response, "previousPageCursor"),
                    next_cursor: cursor_field(&response, "nextPageCursor"),
                })
            }
            Err(e) => {
                warn!(user_id, error = %e, "limited items lookup failed, returning empty page");
                Ok(LimitedItemsPage {
                    limited_items: Vec::new(),
                    previous_cursor: None,
                    next_cursor: None,
                })
            }
        }
    }

    async fn get_json(
        &self,
        domain: ApiDomain,
        path: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value> {
        let http = &self.http;
        self.retry
            .run(move || async move { http.get(domain, path, params, true).await })
            .await
    }

    async fn post_json(&self, domain: ApiDomain, path: &str, body: &Value) -> Result<Value> {
        let http = &self.http;
        self.retry
            .run(move || async move { http.post(domain, path, Some(body), None).await })
            .await
    }

    async fn fetch_count(&self, path: &str) -> Result<u64> {
        let response = self.get_json(ApiDomain::Friends, path, None).await?;
        Ok(response.get("count").and_then(Value::as_u64).unwrap_or(0))
    }

    async fn fetch_profile_list(
        &self,
        path: &str,
        limit: u32,
        sort_order: Option<SortOrder>,
    ) -> Result<Vec<UserProfile>> {
        let mut params = vec![("limit".to_string(), limit.min(100).to_string())];
        if let Some(order) = sort_order {
            params.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        let response = self
            .get_json(ApiDomain::Friends, path, Some(&params))
            .await?;
        entries(&response, "data")
            .iter()
            .map(parse::user_profile_simple)
            .collect()
    }

    async fn fetch_thumbnail(&self, user_id: u64, path: &str, size: &str) -> String {
        let params = vec![
            ("userIds".to_string(), user_id.to_string()),
            ("size".to_string(), size.to_string()),
            ("format".to_string(), "Png".to_string()),
        ];
        match self
            .http
            .get(ApiDomain::Thumbnails, path, Some(&params), true)
            .await
        {
            Ok(response) => parse::thumbnail_url(&response),
            Err(e) => {
                warn!(user_id, path, error = %e, "thumbnail lookup failed");
                String::new()
            }
        }
    }
}

fn count_or_zero(result: Result<u64>, user_id: u64, kind: &str) -> u64 {
    match result {
        Ok(count) => count,
        Err(e) => {
            warn!(user_id, kind, error = %e, "count lookup failed, defaulting to 0");
            0
        }
    }
}

fn entries<'a>(response: &'a Value, field: &str) -> &'a [Value] {
    response
        .get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn cursor_field(response: &Value, field: &str) -> Option<String> {
    response
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Snaps an arbitrary limit to the nearest page size the endpoint accepts,
/// preferring the smaller size on ties.
fn snap_page_limit(limit: u32) -> u32 {
    PAGE_LIMITS
        .into_iter()
        .min_by_key(|allowed| allowed.abs_diff(limit))
        .unwrap_or(PAGE_LIMITS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snap_page_limit() {
        assert_eq!(snap_page_limit(10), 10);
        assert_eq!(snap_page_limit(0), 10);
        assert_eq!(snap_page_limit(17), 10);
        assert_eq!(snap_page_limit(30), 25);
        assert_eq!(snap_page_limit(80), 100);
        assert_eq!(snap_page_limit(1000), 100);
    }

    #[test]
    fn test_entries_tolerates_missing_and_non_array() {
        assert!(entries(&json!({}), "data").is_empty());
        assert!(entries(&json!({"data": 5}), "data").is_empty());
        assert_eq!(entries(&json!({"data": [1, 2]}), "data").len(), 2);
    }

    #[test]
    fn test_cursor_field() {
        let response = json!({"nextPageCursor": "abc", "previousPageCursor": null});
        assert_eq!(cursor_field(&response, "nextPageCursor").as_deref(), Some("abc"));
        assert_eq!(cursor_field(&response, "previousPageCursor"), None);
    }
}
