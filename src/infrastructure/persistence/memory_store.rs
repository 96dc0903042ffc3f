//! In-memory implementation of the short link store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::entities::{ShortLink, Visit};
use crate::domain::repositories::{ShortLinkStore, StoreError};
use crate::domain::short_code::ShortCode;

#[derive(Debug, Clone)]
struct StoredLink {
    seq: u64,
    link: ShortLink,
}

/// `DashMap`-backed store used by tests and the `memory` store backend.
///
/// Inserts go through the shard-locked entry API, which gives the same
/// one-winner guarantee as a database uniqueness constraint. Visits for codes
/// that do not exist are rejected, mirroring the foreign key in PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    links: DashMap<String, StoredLink>,
    visits: Mutex<Vec<Visit>>,
    next_seq: AtomicU64,
}

impl InMemoryStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Visits recorded for `short_code`, oldest first.
    pub fn visits_for(&self, short_code: &str) -> Vec<Visit> {
        self.visits
            .lock()
            .map(|visits| {
                visits
                    .iter()
                    .filter(|v| v.short_code == short_code)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Total number of recorded visits.
    pub fn visit_count(&self) -> usize {
        self.visits.lock().map(|v| v.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ShortLinkStore for InMemoryStore {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink, StoreError> {
        match self.links.entry(code.as_str().to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict {
                code: code.to_string(),
            }),
            Entry::Vacant(slot) => {
                let link = ShortLink::new(code.to_string(), original_url.to_string(), Utc::now());
                slot.insert(StoredLink {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    link: link.clone(),
                });
                Ok(link)
            }
        }
    }

    async fn lookup(&self, code: &ShortCode) -> Result<Option<String>, StoreError> {
        Ok(self
            .links
            .get(code.as_str())
            .map(|stored| stored.link.original_url.clone()))
    }

    async fn list_all(&self) -> Result<Vec<ShortLink>, StoreError> {
        let mut stored: Vec<StoredLink> = self.links.iter().map(|e| e.value().clone()).collect();
        stored.sort_by(|a, b| {
            b.link
                .created_at
                .cmp(&a.link.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(stored.into_iter().map(|s| s.link).collect())
    }

    async fn record_visit(&self, visit: Visit) -> Result<(), StoreError> {
        if !self.links.contains_key(&visit.short_code) {
            return Err(StoreError::Backend(format!(
                "visit references unknown short code `{}`",
                visit.short_code
            )));
        }

        self.visits
            .lock()
            .map_err(|_| StoreError::Backend("visit log lock poisoned".to_string()))?
            .push(visit);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(raw: &str) -> ShortCode {
        ShortCode::parse(raw).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_lookup() {
        let store = InMemoryStore::new();
        let link = store
            .insert(&code("abc1234"), "https://example.com")
            .await
            .unwrap();

        assert_eq!(link.short_code, "abc1234");
        assert_eq!(
            store.lookup(&code("abc1234")).await.unwrap().as_deref(),
            Some("https://example.com")
        );
        assert!(store.lookup(&code("zzz9999")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_conflicts() {
        let store = InMemoryStore::new();
        store
            .insert(&code("abc1234"), "https://a.example")
            .await
            .unwrap();

        let err = store
            .insert(&code("abc1234"), "https://b.example")
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(
            store.lookup(&code("abc1234")).await.unwrap().as_deref(),
            Some("https://a.example")
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_have_one_winner() {
        let store = Arc::new(InMemoryStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .insert(&code("race000"), &format!("https://example.com/{i}"))
                        .await
                })
            })
            .collect();

        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(e) if e.is_conflict() => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_list_all_newest_first() {
        let store = InMemoryStore::new();
        for raw in ["first01", "second2", "third03"] {
            store.insert(&code(raw), "https://example.com").await.unwrap();
        }

        let codes: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.short_code)
            .collect();

        assert_eq!(codes, vec!["third03", "second2", "first01"]);
    }

    #[tokio::test]
    async fn test_record_visit_requires_existing_link() {
        let store = InMemoryStore::new();
        let visit = Visit::new("ghost00".to_string(), Utc::now(), None, None);

        assert!(store.record_visit(visit).await.is_err());
        assert_eq!(store.visit_count(), 0);
    }

    #[tokio::test]
    async fn test_record_visit_appends() {
        let store = InMemoryStore::new();
        store
            .insert(&code("abc1234"), "https://example.com")
            .await
            .unwrap();

        for _ in 0..2 {
            let visit = Visit::new(
                "abc1234".to_string(),
                Utc::now(),
                Some("TestBot/1.0".to_string()),
                None,
            );
            store.record_visit(visit).await.unwrap();
        }

        let visits = store.visits_for("abc1234");
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].user_agent.as_deref(), Some("TestBot/1.0"));
    }
}
