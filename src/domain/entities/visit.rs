//! Visit entity representing a single successful resolution.

use chrono::{DateTime, Utc};

/// A visit recorded when a short code is resolved.
///
/// Client metadata is optional: requests without `User-Agent` or `Referer`
/// headers still produce a visit row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub short_code: String,
    pub visited_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl Visit {
    pub fn new(
        short_code: String,
        visited_at: DateTime<Utc>,
        user_agent: Option<String>,
        referer: Option<String>,
    ) -> Self {
        Self {
            short_code,
            visited_at,
            user_agent,
            referer,
        }
    }
}
