//! Short link entity representing a code → URL mapping.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted mapping between a short code and the original URL.
///
/// Created once when a shorten request wins its insert, immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortLink {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(short_code: String, original_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            short_code,
            original_url,
            created_at,
        }
    }
}
