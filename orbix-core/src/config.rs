//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache;
use crate::retry::RetryConfig;

/// Top-level configuration for an orbix client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Total per-exchange timeout, enforced by the transport.
    pub timeout: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// Time-to-live for cached GET responses.
    pub cache_ttl: Duration,
    /// Maximum number of cached responses.
    pub cache_capacity: usize,
    /// Whether GET responses are cached at all.
    pub enable_cache: bool,
    /// Optional User-Agent override.
    pub user_agent: Option<String>,
    /// Retry policy applied around each logical operation.
    pub retry: RetryConfig,
    /// Base URL overrides keyed by domain key, for mocking and testing.
    pub url_overrides: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            cache_ttl: cache::DEFAULT_TTL,
            cache_capacity: cache::DEFAULT_CAPACITY,
            enable_cache: true,
            user_agent: None,
            retry: RetryConfig::default(),
            url_overrides: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Creates a configuration builder.
    ///
    /// # Example
    ///
    /// ```rust
    /// use orbix_core::config::ClientConfig;
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .cache_ttl(Duration::from_secs(60))
    ///     .url_override("users", "http://127.0.0.1:9999")
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the total per-exchange timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the TCP connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the cache time-to-live.
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Sets the cache capacity.
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Enables or disables GET response caching.
    #[must_use]
    pub fn enable_cache(mut self, enable: bool) -> Self {
        self.config.enable_cache = enable;
        self
    }

    /// Sets the User-Agent header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Overrides the base URL for a domain key (e.g. `"users"`).
    #[must_use]
    pub fn url_override(mut self, key: impl Into<String>, url: impl Into<String>) -> Self {
        self.config.url_overrides.insert(key.into(), url.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
