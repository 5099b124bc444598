//! Bounded retry with exponential backoff.
//!
//! [`RetryPolicy::run`] wraps an arbitrary async operation in up to
//! `max_retries + 1` attempts, sleeping `backoff_factor * 2^attempt` seconds
//! between them. The policy is deliberately error-kind-agnostic: every
//! failure is retried, and the final attempt's error is returned verbatim
//! with no wrapping or translation. Callers wanting classification-aware
//! behavior can consult [`Error::is_retryable`](crate::error::Error::is_retryable)
//! themselves.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

/// Retry configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Base backoff in seconds; attempt `i` sleeps `backoff_factor * 2^i`.
    pub backoff_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 1.0,
        }
    }
}

/// Retry policy wrapping async operations.
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Creates a policy with the given configuration.
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Returns the backoff delay applied after attempt `attempt` (0-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        Duration::from_secs_f64(self.config.backoff_factor * 2f64.powi(attempt as i32))
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Runs `operation`, retrying on any failure until the attempt budget is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// Propagates the last attempt's error unchanged once all
    /// `max_retries + 1` attempts have failed.
    pub async fn run<T, F, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    debug!(attempt = attempt + 1, "operation succeeded");
                    return Ok(value);
                }
                Err(e) if attempt >= self.config.max_retries => {
                    warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "operation failed, attempt budget exhausted"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "operation failed, retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
