//! Handler for link shortening endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::shorten::{ShortenBody, ShortenQuery, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validation::parse_absolute_url;

/// Creates a short code for a long URL.
///
/// # Endpoint
///
/// `POST /shorten?url=<url>`
///
/// A JSON body `{"url": "..."}` is accepted when the query parameter is
/// absent.
///
/// # Response
///
/// ```json
/// { "shortCode": "aZ3kQ9x" }
/// ```
///
/// # Errors
///
/// - 400 if the URL is missing or not an absolute URI (nothing is stored)
/// - 500 `code_space_exhausted` if every attempt collided
/// - 503 `store_unavailable` if the store failed or timed out
pub async fn shorten_handler(
    State(state): State<AppState>,
    Query(query): Query<ShortenQuery>,
    body: Bytes,
) -> Result<Json<ShortenResponse>, AppError> {
    let raw_url = match query.url {
        Some(url) => url,
        None => url_from_body(&body)?,
    };

    let url = parse_absolute_url(&raw_url)?;
    let link = state.coordinator.shorten(&url).await?;

    Ok(Json(ShortenResponse {
        short_code: link.short_code,
    }))
}

fn url_from_body(body: &Bytes) -> Result<String, AppError> {
    if body.is_empty() {
        return Err(AppError::bad_request(
            "Missing `url` parameter",
            json!({ "parameter": "url" }),
        ));
    }

    serde_json::from_slice::<ShortenBody>(body)
        .map(|parsed| parsed.url)
        .map_err(|e| AppError::bad_request("Malformed request body", json!({ "reason": e.to_string() })))
}
