//! Build statistics with atomic counters.
//!
//! This module provides [`BuildStats`] for counting model factory activity
//! and [`StatsSnapshot`] for point-in-time views.
//!
//! All counters use [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering; the numbers are informational.
//!
//! # Examples
//!
//! ```
//! use em_engine::BuildStats;
//!
//! let stats = BuildStats::new();
//! stats.record_request();
//! stats.record_cache_hit();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.requests, 1);
//! assert_eq!(snapshot.cache_hits, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for model factory activity.
#[derive(Debug, Default)]
pub struct BuildStats {
    /// Model requests received.
    requests: AtomicU64,
    /// Requests answered from the cache.
    cache_hits: AtomicU64,
    /// Entity models built (root and nested).
    models_built: AtomicU64,
    /// Attribute models built.
    attributes_built: AtomicU64,
    /// Lazy handles bound to cooperating providers.
    lazy_handles: AtomicU64,
    /// Nested models skipped because of the depth bound.
    depth_truncations: AtomicU64,
    /// Nested models skipped by the self-reference or cycle guard.
    cycle_guard_hits: AtomicU64,
    /// Builds that failed with an error.
    failures: AtomicU64,
}

impl BuildStats {
    /// Creates a new [`BuildStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a model request.
    #[inline]
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a request answered from the cache.
    #[inline]
    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a completed entity model with `attributes` attributes.
    #[inline]
    pub fn record_model(&self, attributes: usize) {
        self.models_built.fetch_add(1, Ordering::Relaxed);
        self.attributes_built
            .fetch_add(attributes as u64, Ordering::Relaxed);
    }

    /// Counts a lazy handle.
    #[inline]
    pub fn record_lazy_handle(&self) {
        self.lazy_handles.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a nested model cut off by the depth bound.
    #[inline]
    pub fn record_depth_truncation(&self) {
        self.depth_truncations.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a nested model cut off by the cycle guard.
    #[inline]
    pub fn record_cycle_guard_hit(&self) {
        self.cycle_guard_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a failed build.
    #[inline]
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            models_built: self.models_built.load(Ordering::Relaxed),
            attributes_built: self.attributes_built.load(Ordering::Relaxed),
            lazy_handles: self.lazy_handles.load(Ordering::Relaxed),
            depth_truncations: self.depth_truncations.load(Ordering::Relaxed),
            cycle_guard_hits: self.cycle_guard_hits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`BuildStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Model requests received.
    pub requests: u64,
    /// Requests answered from the cache.
    pub cache_hits: u64,
    /// Entity models built (root and nested).
    pub models_built: u64,
    /// Attribute models built.
    pub attributes_built: u64,
    /// Lazy handles bound to cooperating providers.
    pub lazy_handles: u64,
    /// Nested models skipped because of the depth bound.
    pub depth_truncations: u64,
    /// Nested models skipped by the self-reference or cycle guard.
    pub cycle_guard_hits: u64,
    /// Builds that failed with an error.
    pub failures: u64,
}

impl StatsSnapshot {
    /// Returns the share of requests answered from the cache, in percent.
    ///
    /// Returns 0.0 if nothing was requested.
    ///
    /// # Examples
    ///
    /// ```
    /// use em_engine::StatsSnapshot;
    ///
    /// let snapshot = StatsSnapshot { requests: 4, cache_hits: 3, ..StatsSnapshot::default() };
    /// assert!((snapshot.hit_rate() - 75.0).abs() < 0.1);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Acceptable for statistics display
    pub fn hit_rate(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }

        (self.cache_hits as f64 / self.requests as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        assert_eq!(BuildStats::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_record_model_counts_attributes() {
        let stats = BuildStats::new();
        stats.record_model(5);
        stats.record_model(3);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.models_built, 2);
        assert_eq!(snapshot.attributes_built, 8);
    }

    #[test]
    fn test_guard_counters() {
        let stats = BuildStats::new();
        stats.record_depth_truncation();
        stats.record_cycle_guard_hit();
        stats.record_cycle_guard_hit();
        stats.record_lazy_handle();
        stats.record_failure();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.depth_truncations, 1);
        assert_eq!(snapshot.cycle_guard_hits, 2);
        assert_eq!(snapshot.lazy_handles, 1);
        assert_eq!(snapshot.failures, 1);
    }

    #[test]
    fn test_hit_rate_without_requests() {
        assert!(StatsSnapshot::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = StatsSnapshot {
            requests: 2,
            cache_hits: 1,
            ..StatsSnapshot::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
