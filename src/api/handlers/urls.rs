//! Handler for listing shortened URLs.

use axum::{Json, extract::State};

use crate::api::dto::urls::{ShortLinkItem, UrlsResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Lists every shortened URL, newest first.
///
/// # Endpoint
///
/// `GET /urls`
///
/// No pagination and no caching: the listing always reflects the store.
pub async fn urls_handler(State(state): State<AppState>) -> Result<Json<UrlsResponse>, AppError> {
    let links = state.coordinator.list_all().await?;

    Ok(Json(UrlsResponse {
        urls: links.into_iter().map(ShortLinkItem::from).collect(),
    }))
}
