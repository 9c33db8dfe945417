//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::dex::{DexService, SiteUrls};
use crate::source::{CachedSource, DataSource, JsonDirSource, SheetApiSource};
use crate::theme::ThemeEngine;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Page registry and pipeline.
    dex: Arc<DexService>,
}

impl AppState {
    /// Build the data source, theme and page registry from configuration.
    pub async fn new(config: &Config) -> Result<Self> {
        let source = build_source(config);
        info!(source = source.kind(), "data source configured");

        let theme = ThemeEngine::new(&config.templates_dir())
            .context("failed to initialize theme engine")?;

        let urls = SiteUrls::new(&config.site_url)
            .with_external_profile_base(&config.external_profile_base);

        let dex = DexService::new(source, Arc::new(theme), urls);

        let pages_dir = config.pages_dir();
        if pages_dir.is_dir() {
            dex.load_pages(&pages_dir)
                .await
                .context("failed to load page configurations")?;
        } else {
            info!(dir = %pages_dir.display(), "no page directory, starting with no pages");
        }

        Ok(Self::from_service(dex))
    }

    /// Wrap an existing service (used by tests and the CLI).
    pub fn from_service(dex: Arc<DexService>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { dex }),
        }
    }

    /// Get the dex service.
    pub fn dex(&self) -> &Arc<DexService> {
        &self.inner.dex
    }
}

/// Remote sheet API when configured, otherwise the JSON data directory,
/// behind a TTL cache unless the TTL is zero.
fn build_source(config: &Config) -> Arc<dyn DataSource> {
    let source: Arc<dyn DataSource> = match &config.sheet_api_url {
        Some(url) => Arc::new(SheetApiSource::new(url.clone())),
        None => Arc::new(JsonDirSource::new(config.data_dir.clone())),
    };

    if config.sheet_cache_ttl.is_zero() {
        source
    } else {
        Arc::new(CachedSource::new(source, config.sheet_cache_ttl))
    }
}
