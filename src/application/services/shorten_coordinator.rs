//! Shortening and resolution orchestration.
//!
//! The coordinator owns no shared mutable state of its own. Every shorten
//! retry loop is local to its request, uniqueness is enforced by the store,
//! and the cache and metrics sink are internally synchronized.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, warn};

use crate::domain::entities::ShortLink;
use crate::domain::metrics::MetricsSink;
use crate::domain::repositories::{ShortLinkStore, StoreError};
use crate::domain::short_code::ShortCode;
use crate::domain::visit_event::VisitEvent;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};
use crate::utils::url_validation::ValidatedUrl;

/// Insert attempts per shorten request.
pub const MAX_RETRIES: usize = 3;

/// Failures of [`ShortenCoordinator::shorten`].
///
/// Collisions never appear here unless every attempt collided.
#[derive(Debug, Error)]
pub enum ShortenError {
    #[error("no free short code found after {attempts} attempts")]
    ExhaustedRetries { attempts: usize },

    #[error(transparent)]
    Store(StoreError),
}

/// Failures of [`ShortenCoordinator::resolve`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error(transparent)]
    Store(StoreError),
}

/// Client metadata attached to the visit recorded by a successful resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitContext {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

impl VisitContext {
    pub fn new(user_agent: Option<&str>, referer: Option<&str>) -> Self {
        Self {
            user_agent: user_agent.map(str::to_string),
            referer: referer.map(str::to_string),
        }
    }
}

/// Tunables for [`ShortenCoordinator`].
#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    /// Insert attempts before giving up with [`ShortenError::ExhaustedRetries`].
    pub max_attempts: usize,
    /// Deadline applied to every store call.
    pub store_timeout: Duration,
    /// Pre-populate the cache with freshly created links.
    pub warm_cache_on_shorten: bool,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            max_attempts: MAX_RETRIES,
            store_timeout: Duration::from_secs(2),
            warm_cache_on_shorten: true,
        }
    }
}

/// Orchestrates code generation, collision retry, cached resolution and
/// visit dispatch.
pub struct ShortenCoordinator {
    store: Arc<dyn ShortLinkStore>,
    cache: Arc<dyn CacheService>,
    generator: Arc<dyn CodeGenerator>,
    metrics: Arc<dyn MetricsSink>,
    visits: mpsc::Sender<VisitEvent>,
    settings: CoordinatorSettings,
}

impl ShortenCoordinator {
    /// Creates a coordinator with the random generator and default settings.
    pub fn new(
        store: Arc<dyn ShortLinkStore>,
        cache: Arc<dyn CacheService>,
        metrics: Arc<dyn MetricsSink>,
        visits: mpsc::Sender<VisitEvent>,
    ) -> Self {
        Self {
            store,
            cache,
            generator: Arc::new(RandomCodeGenerator),
            metrics,
            visits,
            settings: CoordinatorSettings::default(),
        }
    }

    /// Replaces the code generator.
    pub fn with_generator(mut self, generator: Arc<dyn CodeGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Replaces the settings.
    pub fn with_settings(mut self, settings: CoordinatorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Creates a short link for an already validated URL.
    ///
    /// Runs `GenerateCandidate → AttemptInsert` up to `max_attempts` times.
    /// A collision discards the candidate and loops; any other store failure
    /// ends the request at once without retry.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenError::ExhaustedRetries`] if every attempt collided.
    /// Returns [`ShortenError::Store`] on the first non-collision failure,
    /// including an elapsed store deadline.
    pub async fn shorten(&self, url: &ValidatedUrl) -> Result<ShortLink, ShortenError> {
        let attempts = self.settings.max_attempts;

        for attempt in 1..=attempts {
            let candidate = self.generator.generate();

            match self
                .with_deadline(self.store.insert(&candidate, url.as_str()))
                .await
            {
                Ok(link) => {
                    info!(short_code = %link.short_code, attempt, "Short link created");
                    if self.settings.warm_cache_on_shorten {
                        self.populate_cache(&link.short_code, &link.original_url)
                            .await;
                    }
                    return Ok(link);
                }
                Err(StoreError::Conflict { code }) => {
                    debug!(short_code = %code, attempt, "Short code collision, retrying");
                    self.metrics.shorten_conflict();
                }
                Err(e) => {
                    error!(attempt, "Store failure while shortening: {}", e);
                    return Err(ShortenError::Store(e));
                }
            }
        }

        warn!(attempts, "Gave up shortening after repeated collisions");
        Err(ShortenError::ExhaustedRetries { attempts })
    }

    /// Resolves a short code to its original URL.
    ///
    /// Cache first, then the store. Only positive results are cached. A
    /// successful resolve queues one visit without waiting for it and bumps
    /// the success counter; an unknown or malformed code bumps the failure
    /// counter and records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Store`] if the store lookup fails.
    pub async fn resolve(
        &self,
        raw_code: &str,
        context: VisitContext,
    ) -> Result<Option<String>, ResolveError> {
        let Some(code) = ShortCode::parse(raw_code) else {
            debug!("Rejecting malformed short code");
            self.metrics.redirect_failed();
            return Ok(None);
        };

        let cached = match self.cache.get_url(code.as_str()).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Cache error for {}, falling back to store: {}", code, e);
                None
            }
        };

        let url = match cached {
            Some(url) => url,
            None => match self.with_deadline(self.store.lookup(&code)).await {
                Ok(Some(url)) => {
                    self.populate_cache(code.as_str(), &url).await;
                    url
                }
                Ok(None) => {
                    debug!("Short code not found: {}", code);
                    self.metrics.redirect_failed();
                    return Ok(None);
                }
                Err(e) => {
                    error!("Store failure while resolving {}: {}", code, e);
                    self.metrics.resolve_error();
                    return Err(ResolveError::Store(e));
                }
            },
        };

        self.dispatch_visit(&code, context);
        self.metrics.redirect_succeeded(code.as_str());

        Ok(Some(url))
    }

    /// Lists every link, newest first. Never cached.
    ///
    /// # Errors
    ///
    /// Returns the store error, including an elapsed deadline.
    pub async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError> {
        self.with_deadline(self.store.list_all()).await
    }

    /// Whether the visit queue still has a live worker.
    pub fn visit_queue_closed(&self) -> bool {
        self.visits.is_closed()
    }

    /// Free slots in the visit queue.
    pub fn visit_queue_capacity(&self) -> usize {
        self.visits.capacity()
    }

    async fn with_deadline<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let deadline = self.settings.store_timeout;
        tokio::time::timeout(deadline, call)
            .await
            .unwrap_or(Err(StoreError::Timeout(deadline)))
    }

    async fn populate_cache(&self, short_code: &str, url: &str) {
        if let Err(e) = self.cache.set_url(short_code, url, None).await {
            warn!("Failed to cache {}: {}", short_code, e);
        }
    }

    fn dispatch_visit(&self, code: &ShortCode, context: VisitContext) {
        let event = VisitEvent::new(code.to_string(), context.user_agent, context.referer);

        match self.visits.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!("Visit queue full, dropping visit for {}", event.short_code);
                self.metrics.visit_dropped();
            }
            Err(TrySendError::Closed(event)) => {
                warn!("Visit queue closed, dropping visit for {}", event.short_code);
                self.metrics.visit_dropped();
            }
        }
    }
}
