//! End-to-end tests for `OrbixClient` against a mock server.

use orbix_client::{ClientConfig, Error, OrbixClient, SortOrder};
use orbix_core::retry::RetryConfig;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOMAIN_KEYS: [&str; 8] = [
    "users",
    "thumbnails",
    "games",
    "badges",
    "friends",
    "presence",
    "avatar",
    "inventory",
];

fn test_client(server: &MockServer) -> OrbixClient {
    test_client_with_retry(server, RetryConfig {
        max_retries: 0,
        backoff_factor: 0.0,
    })
}

fn test_client_with_retry(server: &MockServer, retry: RetryConfig) -> OrbixClient {
    let mut builder = ClientConfig::builder().retry(retry);
    for key in DOMAIN_KEYS {
        builder = builder.url_override(key, server.uri());
    }
    OrbixClient::new(builder.build()).expect("Failed to create client")
}

fn profile_body() -> serde_json::Value {
    json!({
        "id": 156,
        "name": "builderman",
        "displayName": "Builderman",
        "description": "Welcome to Roblox!",
        "created": "2006-02-27T21:06:40.3Z",
        "hasVerifiedBadge": true
    })
}

async fn mount_count(server: &MockServer, endpoint: &str, count: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/users/156/{endpoint}/count")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": count})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_get_user_populates_counts() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    mount_count(&server, "followers", 1000).await;
    mount_count(&server, "followings", 5).await;
    mount_count(&server, "friends", 42).await;

    let user = client.get_user(156).await.expect("lookup should succeed");

    assert_eq!(user.username, "builderman");
    assert_eq!(user.follower_count, 1000);
    assert_eq!(user.following_count, 5);
    assert_eq!(user.friend_count, 42);
    assert!(user.is_verified);
    assert_eq!(user.profile_url(), "https://www.roblox.com/users/156/profile");
}

#[tokio::test]
async fn test_get_user_count_failures_default_to_zero() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    mount_count(&server, "friends", 42).await;
    // followers/followings endpoints are not mocked and will 404

    let user = client.get_user(156).await.expect("lookup should succeed");

    assert_eq!(user.follower_count, 0);
    assert_eq!(user.following_count, 0);
    assert_eq!(user.friend_count, 42);
}

#[tokio::test]
async fn test_get_missing_user_fails() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/999999"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_user(999999).await.expect_err("lookup should fail");
    assert!(matches!(err, Error::UserNotFound(_)));
}

#[tokio::test]
async fn test_batch_over_limit_makes_no_network_calls() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let ids: Vec<u64> = (1..=101).collect();
    let err = client
        .get_users_batch(&ids)
        .await
        .expect_err("batch should be rejected");

    assert!(matches!(err, Error::InvalidRequest(_)));
    assert_eq!(err.to_string(), "invalid request: batch limited to 100 users");
}

#[tokio::test]
async fn test_batch_empty_input_short_circuits() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    assert!(client.get_users_batch(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_batch_handles_both_profile_shapes() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                profile_body(),
                {"id": 2, "name": "john", "displayName": "John", "description": "hi"}
            ]
        })))
        .mount(&server)
        .await;

    let users = client.get_users_batch(&[156, 2]).await.unwrap();

    assert_eq!(users.len(), 2);
    assert!(users[0].created_date.is_some());
    assert!(users[1].created_date.is_none());
    assert_eq!(users[1].description, "hi");
}

#[tokio::test]
async fn test_get_user_by_username_found() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/usernames/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 156, "name": "builderman"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/156"))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile_body()))
        .mount(&server)
        .await;
    // count endpoints 404 and default to zero

    let user = client
        .get_user_by_username("builderman")
        .await
        .expect("lookup should succeed");
    assert_eq!(user.id, 156);
}

#[tokio::test]
async fn test_get_user_by_username_not_found() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/usernames/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = client
        .get_user_by_username("nobody-here")
        .await
        .expect_err("lookup should fail");
    assert!(matches!(err, Error::UserNotFound(_)));
}

#[tokio::test]
async fn test_avatar_failed_sub_call_leaves_url_empty() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let thumb = |url: &str| json!({"data": [{"imageUrl": url}]});
    Mock::given(method("GET"))
        .and(path("/v1/users/avatar-headshot"))
        .and(query_param("userIds", "156"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thumb("https://cdn/headshot")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/avatar-bust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thumb("https://cdn/bust")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/avatar"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let avatar = client
        .get_user_avatar(156)
        .await
        .expect("avatar lookup should tolerate a failing thumbnail");

    assert_eq!(avatar.headshot_url, "https://cdn/headshot");
    assert_eq!(avatar.bust_url, "https://cdn/bust");
    assert_eq!(avatar.full_body_url, "");
}

#[tokio::test]
async fn test_followers_clamps_limit() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156/followers"))
        .and(query_param("limit", "100"))
        .and(query_param("sortOrder", "Desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 2, "name": "john", "displayName": "John"}]
        })))
        .mount(&server)
        .await;

    let followers = client.get_user_followers(156, 500).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].username, "john");
}

#[tokio::test]
async fn test_badges_snap_limit_and_page() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156/badges"))
        .and(query_param("limit", "25"))
        .and(query_param("sortOrder", "Asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previousPageCursor": null,
            "nextPageCursor": "page2",
            "data": [
                {"id": 1, "name": "Veteran", "statistics": {"awardedCount": 10}},
                {"id": 2}
            ]
        })))
        .mount(&server)
        .await;

    // 30 snaps to 25; the malformed second entry is dropped
    let page = client
        .get_user_badges(156, 30, SortOrder::Asc, None)
        .await
        .unwrap();

    assert_eq!(page.badges.len(), 1);
    assert_eq!(page.badges[0].awarded_count, 10);
    assert_eq!(page.next_cursor.as_deref(), Some("page2"));
    assert!(page.previous_cursor.is_none());
}

#[tokio::test]
async fn test_presence_over_limit_makes_no_network_calls() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/presence/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"userPresences": []})))
        .expect(0)
        .mount(&server)
        .await;

    let ids: Vec<u64> = (1..=21).collect();
    let err = client
        .get_user_presence(&ids)
        .await
        .expect_err("presence should be rejected");
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_presence_skips_malformed_entries() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/presence/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userPresences": [
                {"userId": 1, "userPresenceType": 2, "lastLocation": "Jailbreak"},
                {"userPresenceType": 1}
            ]
        })))
        .mount(&server)
        .await;

    let presences = client.get_user_presence(&[1, 2]).await.unwrap();
    assert_eq!(presences.len(), 1);
    assert_eq!(presences[0].presence_type, 2);
}

#[tokio::test]
async fn test_presence_single() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/presence/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "userPresences": [{"userId": 7, "userPresenceType": 1}]
        })))
        .mount(&server)
        .await;

    let presence = client.get_user_presence_single(7).await.unwrap();
    assert_eq!(presence.unwrap().user_id, 7);
}

#[tokio::test]
async fn test_game_details_joins_ids_and_skips_malformed() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/games"))
        .and(query_param("universeIds", "1,2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"id": 1, "rootPlaceId": 10, "name": "Adopt Me", "playing": 120000},
                {"id": 2}
            ]
        })))
        .mount(&server)
        .await;

    let games = client.get_game_details(&[1, 2]).await.unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].playing, 120000);
}

#[tokio::test]
async fn test_game_details_over_limit() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    let ids: Vec<u64> = (1..=101).collect();
    let err = client
        .get_game_details(&ids)
        .await
        .expect_err("game details should be rejected");
    assert!(matches!(err, Error::InvalidRequest(_)));
}

#[tokio::test]
async fn test_favourite_games_failure_degrades_to_empty_page() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v2/users/156/favourite/games"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let page = client
        .get_user_favourite_games(156, 10, None)
        .await
        .expect("favourites lookup is best-effort");
    assert!(page.favourite_games.is_empty());
    assert!(page.next_cursor.is_none());
}

#[tokio::test]
async fn test_currently_wearing() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156/currently-wearing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"assetIds": [11, 22]})))
        .mount(&server)
        .await;

    let items = client.get_user_currently_wearing(156).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].asset_id, 11);
}

#[tokio::test]
async fn test_currently_wearing_failure_degrades_to_empty() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    // endpoint not mocked, wiremock answers 404
    let items = client.get_user_currently_wearing(156).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_limited_items_page() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156/assets/collectibles"))
        .and(query_param("assetType", "All"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previousPageCursor": null,
            "nextPageCursor": null,
            "data": [{"userAssetId": 1, "assetId": 2, "name": "Domino Crown", "recentAveragePrice": 500000}]
        })))
        .mount(&server)
        .await;

    let page = client.get_user_limited_items(156, 10, None).await.unwrap();
    assert_eq!(page.limited_items.len(), 1);
    assert_eq!(page.limited_items[0].recent_average_price, 500000);
}

#[tokio::test]
async fn test_warm_cache_chunks_requests() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("POST"))
        .and(path("/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(3)
        .mount(&server)
        .await;

    // 120 ids split into chunks of 50, 50 and 20
    let ids: Vec<u64> = (1..=120).collect();
    client.warm_cache(&ids).await;
}

#[tokio::test]
async fn test_count_lookup_retries_transient_failure() {
    let server = MockServer::start().await;
    let client = test_client_with_retry(&server, RetryConfig {
        max_retries: 2,
        backoff_factor: 0.005,
    });

    Mock::given(method("GET"))
        .and(path("/v1/users/156/friends/count"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "hiccup"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/users/156/friends/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 42})))
        .mount(&server)
        .await;

    let count = client.get_user_friend_count(156).await.unwrap();
    assert_eq!(count, 42);
}

#[tokio::test]
async fn test_repeated_count_lookup_is_cached() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path("/v1/users/156/friends/count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 42})))
        .expect(1)
        .mount(&server)
        .await;

    for _ in 0..2 {
        assert_eq!(client.get_user_friend_count(156).await.unwrap(), 42);
    }
    assert_eq!(client.cache_stats().size, 1);

    let summary = client.metrics().summary(10);
    assert_eq!(summary.total_requests, 2);
    assert!((summary.cache_hit_rate - 50.0).abs() < f64::EPSILON);
}
