//! API route configuration.

use crate::api::handlers::{health_handler, redirect_handler, shorten_handler, urls_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Public routes.
///
/// # Endpoints
///
/// - `POST /shorten`  - Create a short code
/// - `GET  /urls`     - List all shortened URLs
/// - `GET  /health`   - Component health
/// - `GET  /{code}`   - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/urls", get(urls_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
}
