//! TTL cache in front of another source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use super::{DataSource, SourceError};
use crate::dex::Record;

/// Default time a fetched dataset stays cached.
pub const DEFAULT_TTL_SECS: u64 = 300;

/// Maximum number of cached datasets.
const MAX_CAPACITY: u64 = 256;

/// Caches successful fetches of an inner source. Failures are not cached.
#[derive(Clone)]
pub struct CachedSource {
    inner: Arc<dyn DataSource>,
    cache: Cache<String, Arc<Vec<Record>>>,
}

impl CachedSource {
    pub fn new(inner: Arc<dyn DataSource>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_CAPACITY)
            .time_to_live(ttl)
            .build();

        Self { inner, cache }
    }

    /// Drop one cached dataset.
    pub async fn invalidate(&self, name: &str) {
        self.cache.invalidate(name).await;
        debug!(dataset = %name, "dataset cache invalidated");
    }

    /// Drop every cached dataset.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl DataSource for CachedSource {
    async fn import_sheet(&self, name: &str) -> Result<Vec<Record>, SourceError> {
        if let Some(rows) = self.cache.get(name).await {
            debug!(dataset = %name, "dataset cache hit");
            return Ok(rows.as_ref().clone());
        }

        let rows = self.inner.import_sheet(name).await?;
        self.cache
            .insert(name.to_string(), Arc::new(rows.clone()))
            .await;
        debug!(dataset = %name, source = self.inner.kind(), "dataset cached");
        Ok(rows)
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }
}

impl std::fmt::Debug for CachedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSource")
            .field("inner", &self.inner.kind())
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::json;

    fn rows(id: i64) -> Vec<Record> {
        vec![Record::from_value(json!({"id": id})).unwrap()]
    }

    #[tokio::test]
    async fn serves_cached_rows_until_invalidated() {
        let memory = MemorySource::new().with_dataset("dex", rows(1));
        let cached = CachedSource::new(Arc::new(memory.clone()), Duration::from_secs(60));

        assert_eq!(cached.import_sheet("dex").await.unwrap()[0].text("id").as_deref(), Some("1"));

        memory.insert("dex", rows(2));
        assert_eq!(cached.import_sheet("dex").await.unwrap()[0].text("id").as_deref(), Some("1"));

        cached.invalidate("dex").await;
        assert_eq!(cached.import_sheet("dex").await.unwrap()[0].text("id").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let memory = MemorySource::new();
        let cached = CachedSource::new(Arc::new(memory.clone()), Duration::from_secs(60));

        assert!(cached.import_sheet("late").await.is_err());
        memory.insert("late", rows(3));
        assert!(cached.import_sheet("late").await.is_ok());
    }
}
