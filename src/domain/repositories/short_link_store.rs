//! Store trait for short links and their visit log.

use std::time::Duration;

use crate::domain::entities::{ShortLink, Visit};
use crate::domain::short_code::ShortCode;
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a [`ShortLinkStore`].
///
/// `Conflict` is reserved for a uniqueness violation on the short code.
/// Every other failure, including other constraint violations, is one of the
/// remaining variants.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("short code `{code}` already exists")]
    Conflict { code: String },

    #[error("store call exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Durable mapping of short codes to URLs plus an append-only visit log.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgShortLinkStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - `DashMap`-backed implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShortLinkStore: Send + Sync {
    /// Inserts a new link iff `code` is not taken.
    ///
    /// The existence check and the write are a single atomic operation: two
    /// concurrent inserts of the same code yield exactly one `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the code already exists.
    /// Returns [`StoreError::Backend`] on any other failure.
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink, StoreError>;

    /// Looks up the original URL for a code.
    async fn lookup(&self, code: &ShortCode) -> Result<Option<String>, StoreError>;

    /// Lists every link, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError>;

    /// Appends a visit. Best effort; callers never roll anything back on failure.
    async fn record_visit(&self, visit: Visit) -> Result<(), StoreError>;

    /// Checks whether the backend is reachable.
    async fn health_check(&self) -> bool;
}
