//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::ShortenCoordinator;
use crate::domain::repositories::ShortLinkStore;
use crate::infrastructure::cache::CacheService;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<ShortenCoordinator>,
    pub store: Arc<dyn ShortLinkStore>,
    pub cache: Arc<dyn CacheService>,
}

impl AppState {
    pub fn new(
        coordinator: Arc<ShortenCoordinator>,
        store: Arc<dyn ShortLinkStore>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            coordinator,
            store,
            cache,
        }
    }
}
