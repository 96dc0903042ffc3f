#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use url_shortener::application::services::ShortenCoordinator;
use url_shortener::domain::entities::{ShortLink, Visit};
use url_shortener::domain::metrics::MetricsSink;
use url_shortener::domain::repositories::{ShortLinkStore, StoreError};
use url_shortener::domain::short_code::ShortCode;
use url_shortener::domain::visit_event::VisitEvent;
use url_shortener::infrastructure::cache::{CacheService, MokaCache, NullCache};
use url_shortener::infrastructure::metrics::InMemoryMetrics;
use url_shortener::infrastructure::persistence::InMemoryStore;
use url_shortener::state::AppState;

/// State plus the handles tests inspect after a request.
pub struct TestContext {
    pub state: AppState,
    pub visits: mpsc::Receiver<VisitEvent>,
    pub metrics: Arc<InMemoryMetrics>,
}

/// Application state over an [`InMemoryStore`] with caching disabled.
pub fn create_test_state(store: Arc<InMemoryStore>) -> TestContext {
    create_state_with(store, Arc::new(NullCache::new()))
}

/// Application state over an [`InMemoryStore`] with an in-process cache.
pub fn create_cached_test_state(store: Arc<InMemoryStore>) -> TestContext {
    create_state_with(
        store,
        Arc::new(MokaCache::new(1_000, std::time::Duration::from_secs(60))),
    )
}

pub fn create_state_with(
    store: Arc<dyn ShortLinkStore>,
    cache: Arc<dyn CacheService>,
) -> TestContext {
    let (tx, rx) = mpsc::channel(100);
    let metrics = Arc::new(InMemoryMetrics::new());
    let sink: Arc<dyn MetricsSink> = metrics.clone();

    let coordinator = ShortenCoordinator::new(store.clone(), cache.clone(), sink, tx);
    let state = AppState::new(Arc::new(coordinator), store, cache);

    TestContext {
        state,
        visits: rx,
        metrics,
    }
}

/// Stores a link directly, bypassing the HTTP layer.
pub async fn create_test_link(store: &InMemoryStore, code: &str, url: &str) -> ShortLink {
    let code = ShortCode::parse(code).unwrap();
    store.insert(&code, url).await.unwrap()
}

/// Store whose backend is unreachable.
pub struct FailingStore;

#[async_trait]
impl ShortLinkStore for FailingStore {
    async fn insert(&self, _: &ShortCode, _: &str) -> Result<ShortLink, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn lookup(&self, _: &ShortCode) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn record_visit(&self, _: Visit) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

/// Store where every candidate code is already taken.
pub struct CollidingStore;

#[async_trait]
impl ShortLinkStore for CollidingStore {
    async fn insert(&self, code: &ShortCode, _: &str) -> Result<ShortLink, StoreError> {
        Err(StoreError::Conflict {
            code: code.to_string(),
        })
    }

    async fn lookup(&self, _: &ShortCode) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError> {
        Ok(Vec::new())
    }

    async fn record_visit(&self, _: Visit) -> Result<(), StoreError> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
