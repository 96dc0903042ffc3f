//! DTOs for link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Query string accepted by `POST /shorten?url=...`.
#[derive(Debug, Deserialize)]
pub struct ShortenQuery {
    pub url: Option<String>,
}

/// JSON body accepted when no `url` query parameter is given.
#[derive(Debug, Deserialize)]
pub struct ShortenBody {
    pub url: String,
}

/// Response containing the newly created code.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
}
