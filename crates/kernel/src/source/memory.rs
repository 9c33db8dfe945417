//! In-memory datasets.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{DataSource, SourceError};
use crate::dex::Record;

/// Datasets held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    datasets: Arc<DashMap<String, Vec<Record>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MemorySource::insert`].
    pub fn with_dataset(self, name: impl Into<String>, rows: Vec<Record>) -> Self {
        self.insert(name, rows);
        self
    }

    /// Add or replace a dataset.
    pub fn insert(&self, name: impl Into<String>, rows: Vec<Record>) {
        self.datasets.insert(name.into(), rows);
    }

    /// Remove a dataset; later fetches fail with `NotFound`.
    pub fn remove(&self, name: &str) -> bool {
        self.datasets.remove(name).is_some()
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn import_sheet(&self, name: &str) -> Result<Vec<Record>, SourceError> {
        self.datasets
            .get(name)
            .map(|rows| rows.value().clone())
            .ok_or_else(|| SourceError::NotFound(name.to_string()))
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
