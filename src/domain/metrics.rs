//! Metrics sink consumed by the coordinator and the visit worker.

/// Counter names shared by every sink implementation.
pub mod names {
    pub const REDIRECTS: &str = "url.shortener.redirects";
    pub const FAILED_REDIRECTS: &str = "url.shortener.failed_redirects";
    pub const VISIT_FAILURES: &str = "url.shortener.visit_failures";
    pub const VISITS_DROPPED: &str = "url.shortener.visits_dropped";
    pub const SHORTEN_CONFLICTS: &str = "url.shortener.shorten_conflicts";
    pub const RESOLVE_ERRORS: &str = "url.shortener.resolve_errors";
}

/// Receives counter increments from the core.
///
/// Injected into [`crate::application::services::ShortenCoordinator`] and
/// the visit worker, so tests can observe counts without a global recorder.
/// Implementations must be cheap and must never block.
pub trait MetricsSink: Send + Sync {
    /// A code resolved to a URL. Tagged with the code.
    fn redirect_succeeded(&self, short_code: &str);

    /// A resolve request named a code that does not exist.
    fn redirect_failed(&self);

    /// A visit write gave up after retries.
    fn visit_failed(&self);

    /// A visit was dropped before reaching the worker (queue full or closed).
    fn visit_dropped(&self);

    /// A candidate code collided with an existing one.
    fn shorten_conflict(&self);

    /// A resolve request failed because the store was unavailable.
    fn resolve_error(&self);
}
