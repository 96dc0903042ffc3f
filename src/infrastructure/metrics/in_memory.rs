//! Sink keeping counters in process memory.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::domain::metrics::MetricsSink;

/// Lock-free counters with per-code redirect tallies.
#[derive(Debug, Default)]
pub struct InMemoryMetrics {
    redirects_by_code: DashMap<String, u64>,
    failed_redirects: AtomicU64,
    visit_failures: AtomicU64,
    visits_dropped: AtomicU64,
    shorten_conflicts: AtomicU64,
    resolve_errors: AtomicU64,
}

impl InMemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful redirects recorded for `short_code`.
    pub fn redirects_for(&self, short_code: &str) -> u64 {
        self.redirects_by_code
            .get(short_code)
            .map(|count| *count)
            .unwrap_or(0)
    }

    /// Successful redirects across all codes.
    pub fn total_redirects(&self) -> u64 {
        self.redirects_by_code.iter().map(|entry| *entry.value()).sum()
    }

    pub fn failed_redirects(&self) -> u64 {
        self.failed_redirects.load(Ordering::Relaxed)
    }

    pub fn visit_failures(&self) -> u64 {
        self.visit_failures.load(Ordering::Relaxed)
    }

    pub fn visits_dropped(&self) -> u64 {
        self.visits_dropped.load(Ordering::Relaxed)
    }

    pub fn shorten_conflicts(&self) -> u64 {
        self.shorten_conflicts.load(Ordering::Relaxed)
    }

    pub fn resolve_errors(&self) -> u64 {
        self.resolve_errors.load(Ordering::Relaxed)
    }
}

impl MetricsSink for InMemoryMetrics {
    fn redirect_succeeded(&self, short_code: &str) {
        *self
            .redirects_by_code
            .entry(short_code.to_string())
            .or_insert(0) += 1;
    }

    fn redirect_failed(&self) {
        self.failed_redirects.fetch_add(1, Ordering::Relaxed);
    }

    fn visit_failed(&self) {
        self.visit_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn visit_dropped(&self) {
        self.visits_dropped.fetch_add(1, Ordering::Relaxed);
    }

    fn shorten_conflict(&self) {
        self.shorten_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    fn resolve_error(&self) {
        self.resolve_errors.fetch_add(1, Ordering::Relaxed);
    }
}
