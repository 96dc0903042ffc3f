//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct CachedUrl {
    url: String,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct PerEntryExpiry;

impl Expiry<String, CachedUrl> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedUrl,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-process cache with TinyLFU eviction and per-entry TTL.
///
/// Used when Redis is not configured or unreachable at startup.
pub struct MokaCache {
    inner: Cache<String, CachedUrl>,
    default_ttl: Duration,
}

impl MokaCache {
    /// Creates a cache holding at most `max_capacity` entries.
    pub fn new(max_capacity: u64, default_ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        debug!(
            "MokaCache initialized with max capacity: {}, default TTL: {}s",
            max_capacity,
            default_ttl.as_secs()
        );

        Self { inner, default_ttl }
    }
}

#[async_trait]
impl CacheService for MokaCache {
    async fn get_url(&self, short_code: &str) -> CacheResult<Option<String>> {
        match self.inner.get(short_code).await {
            Some(cached) => {
                debug!("Cache HIT: {}", short_code);
                Ok(Some(cached.url))
            }
            None => {
                debug!("Cache MISS: {}", short_code);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_code: &str,
        original_url: &str,
        ttl: Option<Duration>,
    ) -> CacheResult<()> {
        let cached = CachedUrl {
            url: original_url.to_string(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.inner.insert(short_code.to_string(), cached).await;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
