//! Dex service: page registry and pipeline execution.
//!
//! Provides:
//! - Page configuration registration and lookup
//! - Loading page configurations from YAML files
//! - The page pipeline (profile or gallery) and the grouped gallery

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::config::PageConfig;
use super::enrich::{EnrichContext, PROFILE_ID, RARITY_BADGE, enrich_all};
use super::error::{DexError, DexResult};
use super::filter::{filter_by_page_parameters, search};
use super::group::{Group, group_by_field};
use super::hooks::{ListEvent, PageHooks};
use super::pager::paginate;
use super::params::PageParameters;
use super::record::Record;
use super::relate::relate;
use super::sort::sort_with_config;
use super::text::scrub;
use super::urls::SiteUrls;
use super::view::{
    GalleryView, GroupView, GroupedGalleryView, ProfileView, ViewKind, ViewResult, ViewSummary,
};
use super::widgets::{GalleryWidgets, gallery_widgets, prev_next};
use crate::source::DataSource;
use crate::theme::{RenderedList, SharedThemeEngine};

/// Outcome of rendering a registered page.
#[derive(Debug, Clone)]
pub enum PageRender {
    View(ViewResult),
    Grouped(GroupedGalleryView),
}

impl PageRender {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::View(view) => view.kind(),
            Self::Grouped(_) => ViewKind::GroupGallery,
        }
    }

    pub fn list(&self) -> &RenderedList {
        match self {
            Self::View(view) => view.list(),
            Self::Grouped(view) => &view.list,
        }
    }

    pub fn summary(&self) -> ViewSummary {
        match self {
            Self::View(view) => ViewSummary::from(view),
            Self::Grouped(view) => ViewSummary::from(view),
        }
    }
}

/// One row of the profile field table.
#[derive(Debug, Clone, Serialize)]
struct ProfileField<'a> {
    key: &'a str,
    value: String,
    /// Value is markup produced by the enricher.
    html: bool,
}

/// Service for rendering dex pages.
pub struct DexService {
    source: Arc<dyn DataSource>,
    theme: SharedThemeEngine,
    urls: SiteUrls,
    /// Registered pages by site page id
    pages: DashMap<String, PageConfig>,
}

impl DexService {
    /// Create a new DexService.
    pub fn new(source: Arc<dyn DataSource>, theme: SharedThemeEngine, urls: SiteUrls) -> Arc<Self> {
        Arc::new(Self {
            source,
            theme,
            urls,
            pages: DashMap::new(),
        })
    }

    pub fn urls(&self) -> &SiteUrls {
        &self.urls
    }

    pub fn theme(&self) -> &SharedThemeEngine {
        &self.theme
    }

    /// Register a page configuration, replacing any page with the same id.
    pub fn register_page(&self, config: PageConfig) -> DexResult<()> {
        check_config(&config)?;

        debug!(page = %config.site_page, selector = %config.dex_selector, "page registered");
        self.pages.insert(config.site_page.clone(), config);
        Ok(())
    }

    /// Get a page by id.
    pub fn get_page(&self, site_page: &str) -> Option<PageConfig> {
        self.pages.get(site_page).map(|v| v.clone())
    }

    /// List all registered pages, ordered by id.
    pub fn list_pages(&self) -> Vec<PageConfig> {
        let mut pages: Vec<PageConfig> = self.pages.iter().map(|v| v.clone()).collect();
        pages.sort_by(|a, b| a.site_page.cmp(&b.site_page));
        pages
    }

    /// Load every `*.yml`/`*.yaml` page configuration in `dir`.
    ///
    /// Returns the number of pages registered.
    pub async fn load_pages(&self, dir: &Path) -> anyhow::Result<usize> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .with_context(|| format!("failed to read page directory {}", dir.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == "yml" || e == "yaml");
            if is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        for path in &paths {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let config = PageConfig::from_yaml(&text)
                .with_context(|| format!("failed to parse page configuration {}", path.display()))?;
            self.register_page(config)
                .with_context(|| format!("invalid page configuration {}", path.display()))?;
        }

        info!(dir = %dir.display(), count = paths.len(), "page configurations loaded");
        Ok(paths.len())
    }

    /// Render a registered page by id.
    ///
    /// Pages with `groupBy` render as a grouped gallery.
    pub async fn render_page(
        &self,
        site_page: &str,
        params: &PageParameters,
        hooks: &PageHooks,
    ) -> DexResult<PageRender> {
        let Some(config) = self.get_page(site_page) else {
            error!(page = %site_page, "no configuration for page");
            return Err(DexError::configuration(format!("unknown page '{site_page}'")));
        };

        match config.group_by.clone() {
            Some(group_by) => self
                .run_group_gallery(&config, None, &group_by, params, hooks)
                .await
                .map(PageRender::Grouped),
            None => self
                .execute_page(&config, None, params, hooks)
                .await
                .map(PageRender::View),
        }
    }

    /// Run the page pipeline: enrich, relate, data hook, sort, then render
    /// either the profile or the gallery and call the list hook.
    ///
    /// `records` overrides the page's `sheetPage` dataset.
    pub async fn execute_page(
        &self,
        config: &PageConfig,
        records: Option<Vec<Record>>,
        params: &PageParameters,
        hooks: &PageHooks,
    ) -> DexResult<ViewResult> {
        check_config(config)?;

        let mut records = self.load_records(config, records).await?;
        let page_url = self.urls.page_url(&config.site_page);

        let ctx = EnrichContext::new(config, &self.urls, &page_url);
        enrich_all(&mut records, &ctx)?;

        for relation in &config.related_data {
            relate(&mut records, relation, self.source.as_ref()).await?;
        }

        if let Some(callback) = &hooks.data {
            callback
                .before_sort(&mut records)
                .await
                .map_err(|source| DexError::Hook { hook: "data", source })?;
        }

        if config.sort.toggle {
            records = sort_with_config(records, &config.sort);
        }

        if let Some(index) = focus_index(config, &records, params) {
            let view = self.profile_view(config, records, index, &page_url)?;
            self.after_render(
                hooks,
                ViewKind::Profile,
                &page_url,
                &view.records,
                &view.list,
                Some(&view.record),
            )
            .await?;
            return Ok(ViewResult::Profile(view));
        }

        let view = self.gallery_view(config, records, params, &page_url)?;
        self.after_render(hooks, ViewKind::Gallery, &page_url, &view.records, &view.list, None)
            .await?;
        Ok(ViewResult::Gallery(view))
    }

    /// Run the grouped gallery: enrich, data hook, sort, filter, then group
    /// on `group_by` and render a gallery per group.
    pub async fn run_group_gallery(
        &self,
        config: &PageConfig,
        records: Option<Vec<Record>>,
        group_by: &str,
        params: &PageParameters,
        hooks: &PageHooks,
    ) -> DexResult<GroupedGalleryView> {
        check_config(config)?;
        if group_by.trim().is_empty() {
            error!(page = %config.site_page, "grouped gallery without a group field");
            return Err(DexError::configuration("groupBy must name a field"));
        }

        let mut records = self.load_records(config, records).await?;
        let page_url = self.urls.page_url(&config.site_page);

        let ctx = EnrichContext::new(config, &self.urls, &page_url);
        enrich_all(&mut records, &ctx)?;

        if let Some(callback) = &hooks.data {
            callback
                .before_sort(&mut records)
                .await
                .map_err(|source| DexError::Hook { hook: "data", source })?;
        }

        if config.sort.toggle {
            records = sort_with_config(records, &config.sort);
        }

        let records = filter_by_page_parameters(records, params);
        let records = search(records, &config.search, params);
        let groups = group_by_field(records, group_by);
        let widgets = gallery_widgets(config, &page_url, params);

        let mut views = Vec::with_capacity(groups.len());
        for group in groups {
            let list = self.render_group(config, &group, &widgets)?;
            views.push(GroupView { group, list });
        }

        let mut context = tera::Context::new();
        let rendered: Vec<_> = views
            .iter()
            .map(|v| {
                serde_json::json!({
                    "key": v.group.key,
                    "html": v.list.html,
                    "count": v.group.records.len(),
                })
            })
            .collect();
        let item_count = views.iter().map(|v| v.group.records.len()).sum();
        context.insert("groups", &rendered);
        context.insert("widgets", &widgets);
        let list = self.theme.render_list(
            ViewKind::GroupGallery.template_kind(),
            &config.dex_selector,
            item_count,
            &mut context,
        )?;

        let view = GroupedGalleryView {
            groups: views,
            widgets,
            list,
        };

        if let Some(callback) = &hooks.list {
            let records: Vec<Record> = view.records().cloned().collect();
            let event = ListEvent {
                kind: ViewKind::GroupGallery,
                page_url: &page_url,
                records: &records,
                list: &view.list,
                profile: None,
            };
            callback
                .after_render(&event)
                .await
                .map_err(|source| DexError::Hook { hook: "list", source })?;
        }

        debug!(page = %config.site_page, groups = view.groups.len(), "grouped gallery rendered");
        Ok(view)
    }

    /// Use the caller's records, or fetch the page's primary dataset.
    async fn load_records(
        &self,
        config: &PageConfig,
        records: Option<Vec<Record>>,
    ) -> DexResult<Vec<Record>> {
        if let Some(records) = records {
            return Ok(records);
        }

        let Some(sheet) = config.sheet_page.as_deref().filter(|s| !s.trim().is_empty()) else {
            error!(page = %config.site_page, "no records supplied and no sheetPage configured");
            return Err(DexError::configuration(format!(
                "page '{}' has no data: pass records or set sheetPage",
                config.site_page
            )));
        };

        let rows = self
            .source
            .import_sheet(sheet)
            .await
            .map_err(|source| {
                error!(
                    page = %config.site_page,
                    dataset = %sheet,
                    error = %source,
                    "primary dataset failed to load"
                );
                DexError::Source {
                    dataset: sheet.to_string(),
                    source,
                }
            })?;

        debug!(
            page = %config.site_page,
            dataset = %sheet,
            source = self.source.kind(),
            rows = rows.len(),
            "primary dataset loaded"
        );
        Ok(rows)
    }

    fn profile_view(
        &self,
        config: &PageConfig,
        records: Vec<Record>,
        index: usize,
        page_url: &str,
    ) -> DexResult<ProfileView> {
        let record = records[index].clone();
        let neighbours = config.prev_next.toggle.then(|| prev_next(&records, index));
        let fields = profile_fields(&record, config);

        let mut context = tera::Context::new();
        context.insert("record", &record);
        context.insert("fields", &fields);
        context.insert("prev_next", &neighbours);
        context.insert("gallery_url", page_url);

        let list = self.theme.render_list(
            ViewKind::Profile.template_kind(),
            &config.dex_selector,
            1,
            &mut context,
        )?;

        debug!(page = %config.site_page, profile = ?record.text(PROFILE_ID), "profile rendered");
        Ok(ProfileView {
            record,
            records,
            prev_next: neighbours,
            list,
        })
    }

    fn gallery_view(
        &self,
        config: &PageConfig,
        records: Vec<Record>,
        params: &PageParameters,
        page_url: &str,
    ) -> DexResult<GalleryView> {
        let records = filter_by_page_parameters(records, params);
        let records = search(records, &config.search, params);

        let pagination = paginate(records.len(), &config.pagination, params.page())
            .map(|state| state.with_links(page_url, params));
        let widgets = gallery_widgets(config, page_url, params);

        let visible = match &pagination {
            Some(state) => state.slice(&records),
            None => &records[..],
        };

        let mut context = tera::Context::new();
        context.insert("records", visible);
        context.insert("total", &records.len());
        context.insert("pagination", &pagination);
        context.insert("widgets", &widgets);

        let list = self.theme.render_list(
            ViewKind::Gallery.template_kind(),
            &config.dex_selector,
            visible.len(),
            &mut context,
        )?;

        debug!(
            page = %config.site_page,
            total = records.len(),
            shown = list.item_count,
            page_number = pagination.as_ref().map(|p| p.page),
            "gallery rendered"
        );

        Ok(GalleryView {
            records,
            pagination,
            widgets,
            list,
        })
    }

    /// Each group renders as its own gallery, carrying the page's filter,
    /// search and folder controls.
    fn render_group(
        &self,
        config: &PageConfig,
        group: &Group,
        widgets: &GalleryWidgets,
    ) -> DexResult<RenderedList> {
        let selector = match scrub(&group.key) {
            s if s.is_empty() => config.dex_selector.clone(),
            s => s,
        };

        let mut context = tera::Context::new();
        context.insert("records", &group.records);
        context.insert("total", &group.records.len());
        context.insert("pagination", &Option::<()>::None);
        context.insert("widgets", widgets);

        self.theme.render_list(
            ViewKind::Gallery.template_kind(),
            &selector,
            group.records.len(),
            &mut context,
        )
    }

    async fn after_render(
        &self,
        hooks: &PageHooks,
        kind: ViewKind,
        page_url: &str,
        records: &[Record],
        list: &RenderedList,
        profile: Option<&Record>,
    ) -> DexResult<()> {
        let Some(callback) = &hooks.list else {
            return Ok(());
        };

        let event = ListEvent {
            kind,
            page_url,
            records,
            list,
            profile,
        };
        callback
            .after_render(&event)
            .await
            .map_err(|source| DexError::Hook { hook: "list", source })
    }
}

impl std::fmt::Debug for DexService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DexService")
            .field("source", &self.source.kind())
            .field("pages", &self.pages.len())
            .finish()
    }
}

/// Reject unusable configurations before any work is done.
fn check_config(config: &PageConfig) -> DexResult<()> {
    let errors = config.validate();
    if errors.is_empty() {
        return Ok(());
    }
    error!(page = %config.site_page, errors = ?errors, "invalid page configuration");
    Err(DexError::Configuration(format!(
        "page '{}': {}",
        config.site_page,
        errors.join("; ")
    )))
}

/// Index of the record the `profile` parameter selects.
///
/// Only an unambiguous match counts; zero or several matches fall back to
/// the gallery.
fn focus_index(config: &PageConfig, records: &[Record], params: &PageParameters) -> Option<usize> {
    if !config.profile_toggle {
        return None;
    }
    let wanted = params.profile()?.trim();

    // Ids are matched as written first, the scrubbed form only as a fallback
    let exact = wanted.to_lowercase();
    let mut candidates = profile_matches(records, |id| id.trim().to_lowercase() == exact);
    if candidates.is_empty() {
        let scrubbed = scrub(wanted);
        if !scrubbed.is_empty() {
            candidates = profile_matches(records, |id| scrub(id) == scrubbed);
        }
    }

    match candidates.as_slice() {
        [index] => Some(*index),
        [] => {
            debug!(
                page = %config.site_page,
                profile = %wanted,
                "profile not found, showing gallery"
            );
            None
        }
        _ => {
            warn!(
                page = %config.site_page,
                profile = %wanted,
                matches = candidates.len(),
                "profile matches several records, showing gallery"
            );
            None
        }
    }
}

fn profile_matches(records: &[Record], matches: impl Fn(&str) -> bool) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.text(PROFILE_ID).is_some_and(|id| matches(&id)))
        .map(|(i, _)| i)
        .collect()
}

/// Field table for the profile view, skipping null values.
fn profile_fields<'a>(record: &'a Record, config: &PageConfig) -> Vec<ProfileField<'a>> {
    let trait_links: Vec<String> = config
        .trait_types()
        .iter()
        .map(|t| format!("{t}link"))
        .collect();

    record
        .iter()
        .filter_map(|(key, value)| {
            let text = super::record::value_to_text(value)?;
            let html = record.is_derived(key)
                && (key == RARITY_BADGE || trait_links.iter().any(|t| t == key));
            Some(ProfileField {
                key: key.as_str(),
                value: text,
                html,
            })
        })
        .collect()
}
