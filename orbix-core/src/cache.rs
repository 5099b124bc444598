//! In-memory TTL + LRU response cache.
//!
//! [`ApiCache`] is a bounded key→JSON store used by the request executor for
//! GET responses. Expiry is enforced lazily at read time, never by a
//! background sweep; eviction removes the least-recently-used entry when an
//! insert would exceed capacity. The cache is single-process and in-memory
//! only.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 1000;

/// A cached response with its storage timestamp and recency sequence.
#[derive(Debug)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    seq: u64,
}

/// Internal cache state.
///
/// Recency is tracked with a monotonic sequence number: `recency` maps each
/// live sequence number back to its key, so the least-recently-used entry is
/// always the first element of the index.
#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    recency: BTreeMap<u64, String>,
    next_seq: u64,
}

impl CacheState {
    fn touch(&mut self, key: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(entry) = self.entries.get_mut(key) {
            self.recency.remove(&entry.seq);
            entry.seq = seq;
            self.recency.insert(seq, key.to_string());
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(entry) = self.entries.remove(key) {
            self.recency.remove(&entry.seq);
        }
    }

    fn evict_lru(&mut self) {
        if let Some((_, key)) = self.recency.pop_first() {
            self.entries.remove(&key);
        }
    }
}

/// Cache statistics snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of live entries.
    pub size: usize,
    /// Maximum number of entries before LRU eviction.
    pub capacity: usize,
    /// Configured time-to-live.
    pub ttl: Duration,
}

/// Bounded TTL + LRU cache for API responses.
///
/// Interior mutability via `std::sync::Mutex` so a shared `HttpClient` can
/// consult the cache through `&self`; the lock is never held across an await
/// point.
#[derive(Debug)]
pub struct ApiCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
}

impl ApiCache {
    /// Creates a cache with the given TTL and capacity.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            ttl,
            capacity,
        }
    }

    /// Returns the cached value for `key`, if present and not expired.
    ///
    /// An expired entry is evicted on the spot and reported as a miss. A hit
    /// marks the entry most-recently-used.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut state = self.state.lock().expect("cache lock poisoned");

        let expired = match state.entries.get(key) {
            None => return None,
            Some(entry) => entry.stored_at.elapsed() > self.ttl,
        };

        if expired {
            state.remove(key);
            return None;
        }

        state.touch(key);
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Stores `value` under `key` as the most-recently-used entry.
    ///
    /// An existing entry for the same key is replaced, resetting both its
    /// recency and its timestamp. Least-recently-used entries are evicted
    /// while the cache is at capacity. A zero-capacity cache stores nothing.
    pub fn set(&self, key: &str, value: Value) {
        if self.capacity == 0 {
            return;
        }
        let mut state = self.state.lock().expect("cache lock poisoned");

        state.remove(key);
        while state.entries.len() >= self.capacity {
            state.evict_lru();
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.recency.insert(seq, key.to_string());
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                seq,
            },
        );
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut state = self.state.lock().expect("cache lock poisoned");
        state.entries.clear();
        state.recency.clear();
    }

    /// Returns a snapshot of size, capacity and TTL.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock().expect("cache lock poisoned");
        CacheStats {
            size: state.entries.len(),
            capacity: self.capacity,
            ttl: self.ttl,
        }
    }
}

impl Default for ApiCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}

/// Builds a deterministic cache key from method, URL and query parameters.
///
/// Parameters are serialized with keys sorted, so identical logical requests
/// produce identical keys regardless of insertion order.
#[must_use]
pub fn cache_key(method: &str, url: &str, params: Option<&[(String, String)]>) -> String {
    let serialized = match params {
        Some(params) if !params.is_empty() => {
            let sorted: BTreeMap<&str, &str> = params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            serde_json::to_string(&sorted).unwrap_or_default()
        }
        _ => String::new(),
    };
    format!("{method}:{url}:{serialized}")
}
