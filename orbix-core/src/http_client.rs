//! Request executor.
//!
//! [`HttpClient`] turns a logical "call this endpoint domain with these
//! params" into a single classified HTTP exchange:
//!
//! 1. resolve the endpoint domain to a base URL (overrides first, then the
//!    static table, with a generic fallback for unknown keys);
//! 2. consult the response cache for GET requests;
//! 3. perform the exchange through `reqwest` (which owns pooling, DNS
//!    caching and timeout enforcement);
//! 4. classify the response into success / not-found / rate-limited /
//!    upstream error / network failure;
//! 5. populate the cache on GET success.
//!
//! Retry and rate admission are outer layers and never happen in here.
//! Identical concurrent cache-missed requests are not coalesced; each hits
//! the network (known limitation).
//!
//! Every exit path, cache hits and failures included, records one metrics
//! sample through the attached [`MetricsRecorder`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, instrument, warn};

use crate::cache::{self, ApiCache, CacheStats};
use crate::config::ClientConfig;
use crate::endpoints::{base_url_for, ApiDomain};
use crate::error::{Error, NetworkError, Result};
use crate::metrics::{MetricsRecorder, RequestMetrics};

/// HTTP executor configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Total per-exchange timeout.
    pub timeout: Duration,
    /// TCP connection timeout.
    pub connect_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Cache time-to-live.
    pub cache_ttl: Duration,
    /// Cache capacity.
    pub cache_capacity: usize,
    /// Whether GET responses are cached.
    pub enable_cache: bool,
    /// Base URL overrides keyed by domain key.
    pub url_overrides: HashMap<String, String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("orbix-rust/{}", env!("CARGO_PKG_VERSION")),
            cache_ttl: cache::DEFAULT_TTL,
            cache_capacity: cache::DEFAULT_CAPACITY,
            enable_cache: true,
            url_overrides: HashMap::new(),
        }
    }
}

impl From<&ClientConfig> for HttpConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout,
            connect_timeout: config.connect_timeout,
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("orbix-rust/{}", env!("CARGO_PKG_VERSION"))),
            cache_ttl: config.cache_ttl,
            cache_capacity: config.cache_capacity,
            enable_cache: config.enable_cache,
            url_overrides: config.url_overrides.clone(),
        }
    }
}

/// HTTP request executor with response caching and error classification.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: HttpConfig,
    cache: ApiCache,
    metrics: Arc<MetricsRecorder>,
}

impl HttpClient {
    /// Creates a new executor with its own metrics recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn new(config: HttpConfig) -> Result<Self> {
        Self::with_metrics(config, Arc::new(MetricsRecorder::default()))
    }

    /// Creates a new executor recording into a shared metrics recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn with_metrics(config: HttpConfig, metrics: Arc<MetricsRecorder>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .pool_max_idle_per_host(30)
            .build()
            .map_err(|e| Error::network(format!("failed to build HTTP client: {e}")))?;

        let cache = ApiCache::new(config.cache_ttl, config.cache_capacity);

        Ok(Self {
            client,
            config,
            cache,
            metrics,
        })
    }

    /// Returns the attached metrics recorder.
    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        Arc::clone(&self.metrics)
    }

    /// Returns cache size/capacity/TTL.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached response.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn resolve_base_url(&self, domain: ApiDomain) -> &str {
        self.config
            .url_overrides
            .get(domain.key())
            .map(String::as_str)
            .unwrap_or_else(|| base_url_for(domain.key()))
    }

    /// Executes one logical request and classifies the outcome.
    ///
    /// GET requests with `use_cache` consult the cache first and populate it
    /// on success; a hit returns immediately without touching the network.
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] for a 404 on a user resource.
    /// - [`Error::RateLimit`] for an upstream 429, with the `Retry-After`
    ///   header when present.
    /// - [`Error::Api`] for any other non-200 status.
    /// - [`Error::Network`] for transport-level failures.
    /// - [`Error::Parse`] when a 200 body is not valid JSON.
    #[instrument(
        name = "api_request",
        skip(self, params, body),
        fields(method = %method, domain = %domain, path = %path)
    )]
    pub async fn request(
        &self,
        method: Method,
        domain: ApiDomain,
        path: &str,
        params: Option<&[(String, String)]>,
        body: Option<&Value>,
        use_cache: bool,
    ) -> Result<Value> {
        let url = format!("{}{}", self.resolve_base_url(domain), path);
        let cacheable = method == Method::GET && use_cache && self.config.enable_cache;
        let key = cache::cache_key(method.as_str(), &url, params);
        let start = Instant::now();

        if cacheable {
            if let Some(hit) = self.cache.get(&key) {
                debug!(url = %url, "cache hit");
                self.record(domain, &method, start, true, true);
                return Ok(hit);
            }
        }

        let result = self.exchange(&method, &url, params, body).await;
        match &result {
            Ok(value) => {
                if cacheable {
                    self.cache.set(&key, value.clone());
                }
                self.record(domain, &method, start, true, false);
            }
            Err(e) => {
                debug!(url = %url, error = %e, "request failed");
                self.record(domain, &method, start, false, false);
            }
        }
        result
    }

    /// Executes a GET request.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(
        &self,
        domain: ApiDomain,
        path: &str,
        params: Option<&[(String, String)]>,
        use_cache: bool,
    ) -> Result<Value> {
        self.request(Method::GET, domain, path, params, None, use_cache)
            .await
    }

    /// Executes a POST request. Never cached.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        domain: ApiDomain,
        path: &str,
        body: Option<&Value>,
        params: Option<&[(String, String)]>,
    ) -> Result<Value> {
        self.request(Method::POST, domain, path, params, body, false)
            .await
    }

    async fn exchange(
        &self,
        method: &Method,
        url: &str,
        params: Option<&[(String, String)]>,
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(params) = params {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(url = %url, error = %e, "transport failure");
            Error::from(classify_transport_error(e))
        })?;

        self.process_response(response).await
    }

    async fn process_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let url = response.url().as_str().to_string();
        let headers = response.headers().clone();

        let body_text = response
            .text()
            .await
            .map_err(|e| Error::from(NetworkError::Transport(Box::new(e))))?;

        if status == StatusCode::OK {
            let value: Value = serde_json::from_str(&body_text)?;
            debug!(status = status.as_u16(), body_len = body_text.len(), "response ok");
            return Ok(value);
        }

        let err = classify_error(status, &url, &headers, &body_text);
        error!(
            status = status.as_u16(),
            url = %url,
            error = %err,
            "upstream error response"
        );
        Err(err)
    }

    fn record(&self, domain: ApiDomain, method: &Method, start: Instant, success: bool, cached: bool) {
        self.metrics.record(RequestMetrics {
            endpoint: domain.key().to_string(),
            method: method.as_str().to_string(),
            duration: start.elapsed(),
            success,
            cached,
        });
    }
}

fn classify_transport_error(e: reqwest::Error) -> NetworkError {
    if e.is_timeout() {
        NetworkError::Timeout
    } else if e.is_connect() {
        NetworkError::ConnectionFailed(e.to_string())
    } else {
        NetworkError::Transport(Box::new(e))
    }
}

/// Maps a non-200 status plus response context to a classified error.
fn classify_error(status: StatusCode, url: &str, headers: &HeaderMap, body: &str) -> Error {
    match status {
        StatusCode::NOT_FOUND => {
            // the full URL is matched, so nested user resources 404 the same way
            if url.contains("/users/") {
                Error::user_not_found(url.to_string())
            } else {
                Error::api(404, "resource not found")
            }
        }
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after = headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Error::rate_limit("rate limited upstream", retry_after)
        }
        _ => match serde_json::from_str::<Value>(body) {
            Ok(data) => {
                let message = data
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
                Error::api_with_data(status.as_u16(), message, data)
            }
            Err(_) => Error::api(status.as_u16(), format!("HTTP {}", status.as_u16())),
        },
    }
}
