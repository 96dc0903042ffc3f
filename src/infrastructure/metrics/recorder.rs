//! Sink forwarding counters to the `metrics` facade.

use metrics::{counter, describe_counter};

use crate::domain::metrics::{MetricsSink, names};

/// Emits counters through whatever recorder the process installed.
///
/// Without an installed recorder every increment is a no-op, so this sink is
/// safe to construct in binaries that do not export metrics.
#[derive(Debug, Default, Clone)]
pub struct RecorderMetrics;

impl RecorderMetrics {
    /// Creates the sink and registers counter descriptions.
    pub fn new() -> Self {
        describe_counter!(names::REDIRECTS, "The number of successful redirects");
        describe_counter!(names::FAILED_REDIRECTS, "The number of failed redirects");
        describe_counter!(
            names::VISIT_FAILURES,
            "Visits that could not be persisted after retries"
        );
        describe_counter!(
            names::VISITS_DROPPED,
            "Visits dropped because the queue was full or closed"
        );
        describe_counter!(
            names::SHORTEN_CONFLICTS,
            "Candidate codes rejected as already taken"
        );
        describe_counter!(
            names::RESOLVE_ERRORS,
            "Resolve requests that failed on the store"
        );
        Self
    }
}

impl MetricsSink for RecorderMetrics {
    fn redirect_succeeded(&self, short_code: &str) {
        counter!(names::REDIRECTS, "short_code" => short_code.to_string()).increment(1);
    }

    fn redirect_failed(&self) {
        counter!(names::FAILED_REDIRECTS).increment(1);
    }

    fn visit_failed(&self) {
        counter!(names::VISIT_FAILURES).increment(1);
    }

    fn visit_dropped(&self) {
        counter!(names::VISITS_DROPPED).increment(1);
    }

    fn shorten_conflict(&self) {
        counter!(names::SHORTEN_CONFLICTS).increment(1);
    }

    fn resolve_error(&self) {
        counter!(names::RESOLVE_ERRORS).increment(1);
    }
}
