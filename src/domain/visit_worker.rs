//! Background worker persisting visit events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::metrics::MetricsSink;
use crate::domain::repositories::{ShortLinkStore, StoreError};
use crate::domain::visit_event::VisitEvent;

/// Retries after the first failed write.
const MAX_WRITE_RETRIES: usize = 3;

/// Tuning for [`run_visit_worker`].
#[derive(Debug, Clone, Copy)]
pub struct VisitWorkerConfig {
    /// Maximum number of visits written concurrently.
    pub concurrency: usize,
    /// Deadline for a single write attempt.
    pub write_timeout: Duration,
}

impl Default for VisitWorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            write_timeout: Duration::from_secs(2),
        }
    }
}

/// Consumes visit events until every sender is dropped.
///
/// Writes run concurrently up to `config.concurrency`. Failed writes are
/// retried with exponential backoff, then logged and counted through
/// `metrics`; they never reach the request that produced the event.
///
/// Once the channel closes the worker drains what is still queued, waits for
/// in-flight writes and returns. Each write is a single insert, so abandoning
/// the returned future mid-way leaves no partial rows behind.
pub async fn run_visit_worker(
    mut rx: mpsc::Receiver<VisitEvent>,
    store: Arc<dyn ShortLinkStore>,
    metrics: Arc<dyn MetricsSink>,
    config: VisitWorkerConfig,
) {
    let semaphore = Arc::new(Semaphore::new(config.concurrency.max(1)));
    let mut in_flight = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        while in_flight.try_join_next().is_some() {}

        let store = store.clone();
        let metrics = metrics.clone();
        let write_timeout = config.write_timeout;
        in_flight.spawn(async move {
            let _permit = permit;
            persist_visit(store.as_ref(), metrics.as_ref(), event, write_timeout).await;
        });
    }

    while in_flight.join_next().await.is_some() {}
    info!("Visit worker stopped");
}

async fn persist_visit(
    store: &dyn ShortLinkStore,
    metrics: &dyn MetricsSink,
    event: VisitEvent,
    write_timeout: Duration,
) {
    let short_code = event.short_code.clone();
    let visit = event.into_visit();

    let strategy = ExponentialBackoff::from_millis(2)
        .factor(10)
        .max_delay(Duration::from_millis(500))
        .map(jitter)
        .take(MAX_WRITE_RETRIES);

    let result = Retry::start(strategy, || {
        let visit = visit.clone();
        async move {
            match tokio::time::timeout(write_timeout, store.record_visit(visit)).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout(write_timeout)),
            }
        }
    })
    .await;

    match result {
        Ok(()) => debug!("Visit recorded for {}", short_code),
        Err(e) => {
            warn!("Dropping visit for {} after retries: {}", short_code, e);
            metrics.visit_failed();
        }
    }
}
