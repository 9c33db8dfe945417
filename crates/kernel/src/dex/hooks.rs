//! Caller hooks around the page pipeline.
//!
//! A page render accepts up to two hooks: a [`DataCallback`] that may adjust
//! the collection after enrichment and relation joins but before sorting,
//! and a [`ListCallback`] notified once the list is rendered. Each runs at
//! most once per render and is awaited before the pipeline continues.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::record::Record;
use super::view::ViewKind;
use crate::theme::RenderedList;

/// Runs before the collection is sorted.
#[async_trait]
pub trait DataCallback: Send + Sync {
    async fn before_sort(&self, records: &mut Vec<Record>) -> anyhow::Result<()>;
}

/// Runs after the list has been rendered.
#[async_trait]
pub trait ListCallback: Send + Sync {
    async fn after_render(&self, event: &ListEvent<'_>) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> DataCallback for F
where
    F: Fn(&mut Vec<Record>) -> anyhow::Result<()> + Send + Sync,
{
    async fn before_sort(&self, records: &mut Vec<Record>) -> anyhow::Result<()> {
        self(records)
    }
}

#[async_trait]
impl<F> ListCallback for F
where
    F: Fn(&ListEvent<'_>) -> anyhow::Result<()> + Send + Sync,
{
    async fn after_render(&self, event: &ListEvent<'_>) -> anyhow::Result<()> {
        self(event)
    }
}

/// What the list callback is told about a finished render.
#[derive(Debug, Clone, Serialize)]
pub struct ListEvent<'a> {
    pub kind: ViewKind,
    pub page_url: &'a str,
    /// The sorted collection (filtered for galleries).
    pub records: &'a [Record],
    pub list: &'a RenderedList,
    /// The focused record of a profile view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<&'a Record>,
}

/// Optional hooks for one render.
#[derive(Clone, Default)]
pub struct PageHooks {
    pub data: Option<Arc<dyn DataCallback>>,
    pub list: Option<Arc<dyn ListCallback>>,
}

impl PageHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, callback: impl DataCallback + 'static) -> Self {
        self.data = Some(Arc::new(callback));
        self
    }

    pub fn with_list(mut self, callback: impl ListCallback + 'static) -> Self {
        self.list = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for PageHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageHooks")
            .field("data", &self.data.is_some())
            .field("list", &self.list.is_some())
            .finish()
    }
}
