//! Smoke tests for the root facade re-exports.

use orbix::prelude::*;
use orbix::{ApiDomain, LogLevel, RetryConfig};

#[test]
fn test_facade_types_resolve() {
    let config = ClientConfig::builder()
        .retry(RetryConfig {
            max_retries: 1,
            backoff_factor: 0.5,
        })
        .url_override("users", "http://127.0.0.1:9999")
        .build();
    assert_eq!(config.retry.max_retries, 1);
    assert_eq!(ApiDomain::Users.key(), "users");
    assert_eq!(LogLevel::Info.to_string(), "info");
}

#[tokio::test]
async fn test_client_constructs_through_facade() {
    let client = OrbixClient::with_defaults().expect("client should build");
    assert_eq!(client.cache_stats().size, 0);
}
