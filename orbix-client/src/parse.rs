//! Conversion of raw JSON responses into typed models.
//!
//! The upstream APIs are loose about optional fields, so parsing is lenient
//! by default: absent optional fields fall back to neutral values. Only
//! fields the models cannot exist without (`id`, `name`, and their kin) are
//! required; their absence produces [`ParseError::MissingField`].

use chrono::{DateTime, Utc};
use orbix_core::error::{ParseError, Result};
use serde_json::Value;

use crate::models::{Game, LimitedItem, UserBadge, UserPresence, UserProfile};

fn required_u64(data: &Value, field: &'static str) -> Result<u64> {
    data.get(field)
        .and_then(Value::as_u64)
        .ok_or_else(|| ParseError::missing_field(field).into())
}

fn required_str(data: &Value, field: &'static str) -> Result<String> {
    data.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ParseError::missing_field(field).into())
}

fn optional_str(data: &Value, field: &str) -> String {
    data.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn optional_u64(data: &Value, field: &str) -> u64 {
    data.get(field).and_then(Value::as_u64).unwrap_or(0)
}

fn optional_bool(data: &Value, field: &str, default: bool) -> bool {
    data.get(field).and_then(Value::as_bool).unwrap_or(default)
}

/// Parses an ISO-8601 timestamp field, tolerating both `Z` and offset forms.
/// Unparseable or absent values become `None`.
fn optional_datetime(data: &Value, field: &str) -> Option<DateTime<Utc>> {
    data.get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses a full user profile as returned by `/v1/users/{id}`.
///
/// Counts are left at zero; the caller fans out to the counting endpoints.
pub(crate) fn user_profile(data: &Value) -> Result<UserProfile> {
    Ok(UserProfile {
        id: required_u64(data, "id")?,
        username: required_str(data, "name")?,
        display_name: required_str(data, "displayName")?,
        description: optional_str(data, "description"),
        created_date: optional_datetime(data, "created"),
        follower_count: 0,
        following_count: 0,
        friend_count: 0,
        is_verified: optional_bool(data, "hasVerifiedBadge", false),
    })
}

/// Parses the abbreviated profile shape used by list endpoints, which omit
/// the description and creation date.
pub(crate) fn user_profile_simple(data: &Value) -> Result<UserProfile> {
    Ok(UserProfile {
        id: required_u64(data, "id")?,
        username: required_str(data, "name")?,
        display_name: required_str(data, "displayName")?,
        description: String::new(),
        created_date: None,
        follower_count: 0,
        following_count: 0,
        friend_count: 0,
        is_verified: optional_bool(data, "hasVerifiedBadge", false),
    })
}

/// Parses a batch lookup entry, which reports the creation date only for
/// some callers. Entries without `created` degrade to the simple shape with
/// the description preserved when present.
pub(crate) fn user_profile_batch(data: &Value) -> Result<UserProfile> {
    if data.get("created").is_some() {
        user_profile(data)
    } else {
        let mut profile = user_profile_simple(data)?;
        profile.description = optional_str(data, "description");
        Ok(profile)
    }
}

/// Extracts the image URL from a thumbnail response, or the empty string
/// when the response carries no usable data.
pub(crate) fn thumbnail_url(response: &Value) -> String {
    response
        .get("data")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .map(|entry| optional_str(entry, "imageUrl"))
        .unwrap_or_default()
}

pub(crate) fn user_badge(data: &Value) -> Result<UserBadge> {
    let statistics = data.get("statistics").cloned().unwrap_or(Value::Null);
    Ok(UserBadge {
        id: required_u64(data, "id")?,
        name: required_str(data, "name")?,
        description: optional_str(data, "description"),
        enabled: optional_bool(data, "enabled", true),
        icon_image_id: optional_u64(data, "iconImageId"),
        created: optional_datetime(data, "created"),
        awarded_count: optional_u64(&statistics, "awardedCount"),
        win_rate_percentage: statistics
            .get("winRatePercentage")
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
    })
}

pub(crate) fn user_presence(data: &Value) -> Result<UserPresence> {
    Ok(UserPresence {
        user_id: required_u64(data, "userId")?,
        presence_type: data
            .get("userPresenceType")
            .and_then(Value::as_u64)
            .and_then(|v| u8::try_from(v).ok())
            .unwrap_or(0),
        last_location: optional_str(data, "lastLocation"),
        place_id: data.get("placeId").and_then(Value::as_u64),
        root_place_id: data.get("rootPlaceId").and_then(Value::as_u64),
        game_id: data
            .get("gameId")
            .and_then(Value::as_str)
            .map(str::to_string),
        universe_id: data.get("universeId").and_then(Value::as_u64),
    })
}

fn game_common(data: &Value, id: u64, root_place_id: u64, name: String) -> Game {
    let creator = data.get("creator").cloned().unwrap_or(Value::Null);
    Game {
        id,
        root_place_id,
        name,
        description: optional_str(data, "description"),
        creator_id: optional_u64(&creator, "id"),
        creator_name: optional_str(&creator, "name"),
        creator_type: creator
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("User")
            .to_string(),
        playing: optional_u64(data, "playing"),
        visits: optional_u64(data, "visits"),
        max_players: optional_u64(data, "maxPlayers"),
        created: optional_datetime(data, "created"),
        genre: optional_str(data, "genre"),
    }
}

/// Parses the lenient game shape used by the favourites endpoint, where
/// even ids may be absent.
pub(crate) fn game_basic(data: &Value) -> Result<Game> {
    Ok(game_common(
        data,
        optional_u64(data, "id"),
        optional_u64(data, "rootPlaceId"),
        optional_str(data, "name"),
    ))
}

/// Parses the detailed game shape used by `/v1/games`, where identity
/// fields are required.
pub(crate) fn game_detailed(data: &Value) -> Result<Game> {
    Ok(game_common(
        data,
        required_u64(data, "id")?,
        required_u64(data, "rootPlaceId")?,
        required_str(data, "name")?,
    ))
}

pub(crate) fn limited_item(data: &Value) -> Result<LimitedItem> {
    Ok(LimitedItem {
        user_asset_id: optional_u64(data, "userAssetId"),
        serial_number: optional_u64(data, "serialNumber"),
        asset_id: optional_u64(data, "assetId"),
        name: optional_str(data, "name"),
        recent_average_price: optional_u64(data, "recentAveragePrice"),
        original_price: optional_u64(data, "originalPrice"),
        asset_stock: data.get("assetStock").and_then(Value::as_i64).unwrap_or(0),
        is_on_hold: optional_bool(data, "isOnHold", false),
    })
}
