//! Per-operation sliding-window rate admission gate.
//!
//! Each logical client operation owns its own window of recent call
//! timestamps. Admission purges timestamps older than the window, then either
//! records the call or rejects it immediately with
//! [`Error::RateLimit`](crate::error::Error) carrying the time until the
//! oldest call ages out. This is an optimistic local gate, not a token
//! bucket: it never waits, and it never shares a window between operations.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Default trailing window for admission decisions.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window call admission gate, keyed by operation.
///
/// Cheap to clone; clones share the same windows.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    window: Duration,
}

impl RateLimiter {
    /// Creates a gate with the standard 60-second window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW)
    }

    /// Creates a gate with a custom window length.
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            window,
        }
    }

    /// Admits or rejects a call for `operation` under `budget` calls per window.
    ///
    /// On rejection the returned [`Error::RateLimit`] carries
    /// `ceil(window - age_of_oldest_call)` as its retry hint. Rejection is
    /// immediate; backing off is the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RateLimit`] when the window already holds `budget`
    /// calls.
    pub async fn admit(&self, operation: &str, budget: u32) -> Result<()> {
        let mut windows = self.windows.lock().await;
        let calls = windows.entry(operation.to_string()).or_default();

        let now = Instant::now();
        while calls
            .front()
            .is_some_and(|&first| now.duration_since(first) >= self.window)
        {
            calls.pop_front();
        }

        if calls.len() >= budget as usize {
            // a zero budget has an empty window; the full window is the hint
            let remaining = calls.front().map_or(self.window, |&oldest| {
                self.window.saturating_sub(now.duration_since(oldest))
            });
            let retry_after = Duration::from_secs(remaining.as_secs_f64().ceil() as u64);

            warn!(
                operation,
                budget,
                in_window = calls.len(),
                retry_after_secs = retry_after.as_secs(),
                "rate admission rejected"
            );
            return Err(Error::rate_limit(
                format!("operation '{operation}' exceeded {budget} calls per window"),
                Some(retry_after),
            ));
        }

        calls.push_back(now);
        debug!(operation, in_window = calls.len(), budget, "call admitted");
        Ok(())
    }

    /// Clears every operation's window.
    pub async fn reset(&self) {
        self.windows.lock().await.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
