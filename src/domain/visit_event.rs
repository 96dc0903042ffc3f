//! Visit event model for asynchronous visit recording.

use chrono::{DateTime, Utc};

use crate::domain::entities::Visit;

/// An in-memory visit handed from the resolve path to the background worker.
///
/// `visited_at` is captured when the code is resolved, so queueing delay does
/// not skew the persisted timestamp.
#[derive(Debug, Clone)]
pub struct VisitEvent {
    pub short_code: String,
    pub visited_at: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl VisitEvent {
    /// Creates an event stamped with the current time.
    pub fn new(short_code: String, user_agent: Option<String>, referer: Option<String>) -> Self {
        Self {
            short_code,
            visited_at: Utc::now(),
            user_agent,
            referer,
        }
    }

    pub fn into_visit(self) -> Visit {
        Visit::new(
            self.short_code,
            self.visited_at,
            self.user_agent,
            self.referer,
        )
    }
}
