//! Client-side query cache with explicit staleness flags.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::api::{ApiError, Record, RecordsApi};

/// Cache key of the records list.
pub const RECORDS_KEY: &str = "records";

/// Invalidation port handed to the submission sequencer.
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Mark `key` stale so the next read refetches. Idempotent.
    async fn invalidate(&self, key: &str);

    /// Fetch `key` now and store the result as fresh.
    async fn refetch(&self, key: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, Default)]
struct CacheEntry {
    records: Vec<Record>,
    stale: bool,
}

/// Caches the records list, following pagination cursors on every fetch.
pub struct RecordsCache {
    api: Arc<dyn RecordsApi>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl RecordsCache {
    pub fn new(api: Arc<dyn RecordsApi>) -> Self {
        Self {
            api,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The records list, served from cache unless missing or stale.
    pub async fn records(&self) -> Result<Vec<Record>, ApiError> {
        if let Some(entry) = self.entries.read().await.get(RECORDS_KEY) {
            if !entry.stale {
                return Ok(entry.records.clone());
            }
        }

        let records = self.fetch_all().await?;
        self.store(RECORDS_KEY, records.clone()).await;
        Ok(records)
    }

    /// `None` when the key was never fetched or invalidated.
    pub async fn is_stale(&self, key: &str) -> Option<bool> {
        self.entries.read().await.get(key).map(|e| e.stale)
    }

    async fn fetch_all(&self) -> Result<Vec<Record>, ApiError> {
        let mut records = Vec::new();
        let mut after: Option<String> = None;
        let mut seen = HashSet::new();

        loop {
            let page = self.api.list_records(after.as_deref()).await?;
            records.extend(page.data);

            let Some(next) = page.after else {
                break;
            };
            if !seen.insert(next.clone()) {
                tracing::warn!(cursor = %next, "Records cursor repeated, stopping pagination");
                break;
            }
            after = Some(next);
        }

        tracing::debug!(count = records.len(), "Fetched records list");
        Ok(records)
    }

    async fn store(&self, key: &str, records: Vec<Record>) {
        self.entries.write().await.insert(
            key.to_string(),
            CacheEntry {
                records,
                stale: false,
            },
        );
    }
}

#[async_trait]
impl QueryCache for RecordsCache {
    async fn invalidate(&self, key: &str) {
        let mut entries = self.entries.write().await;
        entries.entry(key.to_string()).or_default().stale = true;
        tracing::debug!(key, "Invalidated query");
    }

    async fn refetch(&self, key: &str) -> Result<(), ApiError> {
        if key != RECORDS_KEY {
            return Ok(());
        }

        let records = self.fetch_all().await?;
        self.store(key, records).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CreateRecordResponse, RecordPage, StoredRecord};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves one record per page; cursors go None -> "a" -> "b" -> "a" ...
    struct CyclingApi {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecordsApi for CyclingApi {
        async fn create_record(
            &self,
            _record: &StoredRecord,
        ) -> Result<CreateRecordResponse, ApiError> {
            Ok(CreateRecordResponse::accepted())
        }

        async fn list_records(&self, after: Option<&str>) -> Result<RecordPage, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = match after {
                None => "a",
                Some("a") => "b",
                Some(_) => "a",
            };
            Ok(RecordPage {
                data: vec![Record {
                    title: format!("after {after:?}"),
                    description: "page".to_string(),
                    url: "https://cdn.example.com/x.png".to_string(),
                    id: None,
                    ts: None,
                }],
                after: Some(next.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_cursor_cycle_terminates() {
        let api = Arc::new(CyclingApi {
            calls: AtomicUsize::new(0),
        });
        let cache = RecordsCache::new(api.clone());

        let records = tokio::time::timeout(std::time::Duration::from_secs(5), cache.records())
            .await
            .expect("pagination should stop on a repeated cursor")
            .unwrap();

        // None, "a", "b" are fetched; the second "a" is refused
        assert_eq!(api.calls.load(Ordering::SeqCst), 3);
        assert_eq!(records.len(), 3);
    }

    #[tokio::test]
    async fn test_refetch_with_cursor_cycle_terminates() {
        let api = Arc::new(CyclingApi {
            calls: AtomicUsize::new(0),
        });
        let cache = RecordsCache::new(api);

        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            cache.refetch(RECORDS_KEY),
        )
        .await
        .expect("refetch should stop on a repeated cursor")
        .unwrap();
        assert_eq!(cache.is_stale(RECORDS_KEY).await, Some(false));
    }
}
