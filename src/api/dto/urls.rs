//! DTOs for the link listing endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortLink;

/// All shortened URLs, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct UrlsResponse {
    pub urls: Vec<ShortLinkItem>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortLinkItem {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for ShortLinkItem {
    fn from(link: ShortLink) -> Self {
        Self {
            short_code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}
