//! HTTP server initialization and runtime setup.
//!
//! Handles store and cache setup, the visit worker, and the Axum server lifecycle.

use crate::application::services::{CoordinatorSettings, ShortenCoordinator};
use crate::config::{CacheBackend, Config, StoreBackend};
use crate::domain::metrics::MetricsSink;
use crate::domain::repositories::ShortLinkStore;
use crate::domain::visit_event::VisitEvent;
use crate::domain::visit_worker::{VisitWorkerConfig, run_visit_worker};
use crate::infrastructure::cache::{CacheService, MokaCache, NullCache, RedisCache};
use crate::infrastructure::metrics::RecorderMetrics;
use crate::infrastructure::persistence::{InMemoryStore, PgShortLinkStore};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Short link store (PostgreSQL with migrations, or in-memory)
/// - Cache (Redis, Moka or disabled; Redis falls back to Moka)
/// - Background visit worker
/// - Axum HTTP server with graceful shutdown
///
/// After the server stops accepting requests, the visit queue is closed and
/// the worker gets `SHUTDOWN_GRACE_SECONDS` to flush what is left.
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let store = build_store(&config).await?;
    let cache = build_cache(&config).await;
    let metrics: Arc<dyn MetricsSink> = Arc::new(RecorderMetrics::new());

    let (visit_tx, visit_rx) = mpsc::channel::<VisitEvent>(config.visit_queue_capacity);

    let worker = tokio::spawn(run_visit_worker(
        visit_rx,
        store.clone(),
        metrics.clone(),
        VisitWorkerConfig {
            concurrency: config.visit_worker_concurrency,
            write_timeout: config.store_timeout(),
        },
    ));
    tracing::info!(
        concurrency = config.visit_worker_concurrency,
        "Visit worker started"
    );

    let coordinator = ShortenCoordinator::new(store.clone(), cache.clone(), metrics, visit_tx)
        .with_settings(CoordinatorSettings {
            max_attempts: config.shorten_max_attempts,
            store_timeout: config.store_timeout(),
            warm_cache_on_shorten: config.cache_warm_on_shorten,
        });

    let state = AppState::new(Arc::new(coordinator), store, cache);
    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router (and with it the last visit sender) is gone once serve returns.
    tracing::info!("Server stopped, flushing visit queue");
    match tokio::time::timeout(config.shutdown_grace(), worker).await {
        Ok(Ok(())) => tracing::info!("Visit queue flushed"),
        Ok(Err(e)) => tracing::error!(error = %e, "Visit worker panicked"),
        Err(_) => tracing::warn!(
            grace_seconds = config.shutdown_grace_seconds,
            "Visit worker did not finish in time; pending visits dropped"
        ),
    }

    Ok(())
}

async fn build_store(config: &Config) -> Result<Arc<dyn ShortLinkStore>> {
    match (config.store_backend, &config.database_url) {
        (StoreBackend::Postgres, Some(database_url)) => {
            let pool = connect_pool(config, database_url).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            Ok(Arc::new(PgShortLinkStore::new(Arc::new(pool))))
        }
        (StoreBackend::Postgres, None) => {
            anyhow::bail!("DATABASE_URL is required when STORE_BACKEND is 'postgres'")
        }
        (StoreBackend::Memory, _) => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let memory = || -> Arc<dyn CacheService> {
        Arc::new(MokaCache::new(config.cache_max_capacity, config.cache_ttl()))
    };

    match (config.cache_backend, &config.redis_url) {
        (CacheBackend::Redis, Some(redis_url)) => {
            match RedisCache::connect(redis_url, config.cache_ttl()).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using in-memory cache.", e);
                    memory()
                }
            }
        }
        (CacheBackend::Redis, None) | (CacheBackend::Memory, _) => {
            tracing::info!("Cache enabled (in-memory)");
            memory()
        }
        (CacheBackend::None, _) => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
