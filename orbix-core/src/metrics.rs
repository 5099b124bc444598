//! In-memory request metrics recorder.
//!
//! The request executor records one [`RequestMetrics`] sample per exchange,
//! on every exit path, cache hits included. The recorder is a bounded ring:
//! once full, the oldest sample is dropped. It has no external reporting;
//! callers pull snapshots through [`MetricsRecorder::summary`].

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Default maximum number of retained samples.
pub const DEFAULT_MAX_METRICS: usize = 1000;

/// One observed request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestMetrics {
    /// Endpoint domain key (e.g. "users").
    pub endpoint: String,
    /// HTTP method.
    pub method: String,
    /// Wall-clock duration of the exchange.
    pub duration: Duration,
    /// Whether the exchange produced a success result.
    pub success: bool,
    /// Whether the result came from the cache without network I/O.
    pub cached: bool,
}

/// Aggregate view over a set of samples.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricsSummary {
    /// Number of samples aggregated.
    pub total_requests: usize,
    /// Mean duration across the samples.
    pub avg_duration: Duration,
    /// Percentage of successful requests (0.0–100.0).
    pub success_rate: f64,
    /// Percentage of cache hits (0.0–100.0).
    pub cache_hit_rate: f64,
    /// Shortest observed duration, if any samples exist.
    pub fastest: Option<Duration>,
    /// Longest observed duration, if any samples exist.
    pub slowest: Option<Duration>,
}

impl MetricsSummary {
    fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a RequestMetrics>,
    {
        let samples: Vec<&RequestMetrics> = samples.into_iter().collect();
        if samples.is_empty() {
            return Self::default();
        }

        let total = samples.len();
        let successful = samples.iter().filter(|m| m.success).count();
        let cached = samples.iter().filter(|m| m.cached).count();
        let total_duration: Duration = samples.iter().map(|m| m.duration).sum();

        Self {
            total_requests: total,
            avg_duration: total_duration / total as u32,
            success_rate: successful as f64 / total as f64 * 100.0,
            cache_hit_rate: cached as f64 / total as f64 * 100.0,
            fastest: samples.iter().map(|m| m.duration).min(),
            slowest: samples.iter().map(|m| m.duration).max(),
        }
    }
}

/// Bounded in-memory metrics sink.
#[derive(Debug)]
pub struct MetricsRecorder {
    samples: Mutex<VecDeque<RequestMetrics>>,
    max_entries: usize,
}

impl MetricsRecorder {
    /// Creates a recorder retaining at most `max_entries` samples.
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            max_entries,
        }
    }

    /// Records one sample, dropping the oldest when full.
    pub fn record(&self, metric: RequestMetrics) {
        let mut samples = self.samples.lock().expect("metrics lock poisoned");
        samples.push_back(metric);
        while samples.len() > self.max_entries {
            samples.pop_front();
        }
    }

    /// Aggregates the most recent `last_n` samples.
    pub fn summary(&self, last_n: usize) -> MetricsSummary {
        let samples = self.samples.lock().expect("metrics lock poisoned");
        let skip = samples.len().saturating_sub(last_n);
        MetricsSummary::from_samples(samples.iter().skip(skip))
    }

    /// Aggregates all retained samples grouped by endpoint key.
    pub fn endpoint_summaries(&self) -> HashMap<String, MetricsSummary> {
        let samples = self.samples.lock().expect("metrics lock poisoned");
        let mut grouped: HashMap<&str, Vec<&RequestMetrics>> = HashMap::new();
        for metric in samples.iter() {
            grouped.entry(&metric.endpoint).or_default().push(metric);
        }
        grouped
            .into_iter()
            .map(|(endpoint, group)| {
                (endpoint.to_string(), MetricsSummary::from_samples(group))
            })
            .collect()
    }

    /// Discards all retained samples.
    pub fn clear(&self) {
        self.samples.lock().expect("metrics lock poisoned").clear();
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_METRICS)
    }
}
