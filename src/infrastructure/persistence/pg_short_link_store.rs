//! PostgreSQL implementation of the short link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{ShortLink, Visit};
use crate::domain::repositories::{ShortLinkStore, StoreError};
use crate::domain::short_code::ShortCode;
use crate::utils::db_error::{map_insert_error, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    short_code: String,
    original_url: String,
    created_at: DateTime<Utc>,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink::new(row.short_code, row.original_url, row.created_at)
    }
}

/// PostgreSQL store for short links and visits.
///
/// Uniqueness is enforced by the primary key on `shortened_urls.short_code`;
/// inserts are a single `INSERT ... RETURNING`, so the existence check and
/// the write cannot interleave with another request.
pub struct PgShortLinkStore {
    pool: Arc<PgPool>,
}

impl PgShortLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortLinkStore for PgShortLinkStore {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink, StoreError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            INSERT INTO shortened_urls (short_code, original_url)
            VALUES ($1, $2)
            RETURNING short_code, original_url, created_at
            "#,
        )
        .bind(code.as_str())
        .bind(original_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| map_insert_error(e, code.as_str()))?;

        Ok(row.into())
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT original_url
            FROM shortened_urls
            WHERE short_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError> {
        let rows = sqlx::query_as::<_, ShortLinkRow>(
            r#"
            SELECT short_code, original_url, created_at
            FROM shortened_urls
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ShortLink::from).collect())
    }

    async fn record_visit(&self, visit: Visit) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO url_visits (short_code, visited_at, user_agent, referer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(visit.short_code)
        .bind(visit.visited_at)
        .bind(visit.user_agent)
        .bind(visit.referer)
        .execute(self.pool.as_ref())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
