//! Theme engine with Tera templates and suggestion resolution.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::Serialize;
use tera::Tera;
use tracing::debug;

use super::templates;
use crate::dex::error::{DexError, DexResult};
use crate::dex::text::scrub;

/// HTML produced for one list (a gallery, a profile or a grouped gallery).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedList {
    /// Selector the list was rendered for.
    pub selector: String,
    /// Template that produced the markup.
    pub template: String,
    pub html: String,
    /// Records shown in the markup.
    pub item_count: usize,
}

/// Theme engine for rendering dex lists and pages.
pub struct ThemeEngine {
    /// Tera template engine instance.
    tera: Tera,
    /// Cache mapping suggestion lists to resolved template names.
    suggestion_cache: DashMap<String, String>,
}

impl ThemeEngine {
    /// Create a theme engine with the built-in templates, overridden by any
    /// `*.html` file under `template_dir` with the same name.
    pub fn new(template_dir: &Path) -> Result<Self> {
        let mut tera = if template_dir.is_dir() {
            let pattern = template_dir.join("**/*.html");
            let pattern_str = pattern
                .to_str()
                .context("invalid template directory path")?;
            Tera::new(pattern_str).context("failed to initialize Tera templates")?
        } else {
            debug!(dir = ?template_dir, "template directory missing, using built-in templates");
            Tera::default()
        };

        let builtin = Self::builtin_tera()?;
        tera.extend(&builtin)
            .context("failed to merge built-in templates")?;
        Self::register_filters(&mut tera);

        let template_count = tera.get_template_names().count();
        debug!(count = template_count, "loaded templates");

        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    /// Create a theme engine with only the built-in templates.
    pub fn builtin() -> Result<Self> {
        let mut tera = Self::builtin_tera()?;
        Self::register_filters(&mut tera);
        Ok(Self {
            tera,
            suggestion_cache: DashMap::new(),
        })
    }

    fn builtin_tera() -> Result<Tera> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates::builtin())
            .context("failed to parse built-in templates")?;
        Ok(tera)
    }

    /// Register custom Tera filters.
    fn register_filters(tera: &mut Tera) {
        // Link-safe token, same rules as the enricher uses
        tera.register_filter(
            "scrub",
            |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let text = tera::try_get_value!("scrub", "value", String, value);
                Ok(tera::Value::String(scrub(&text)))
            },
        );
    }

    /// Get a mutable reference to Tera (for adding templates at runtime).
    pub fn tera_mut(&mut self) -> &mut Tera {
        self.clear_cache();
        &mut self.tera
    }

    /// Resolve the best template from a list of suggestions.
    ///
    /// Templates are tried in order; the first one that exists is returned.
    /// Results are cached.
    ///
    /// Example suggestions: `["dex/gallery--charadex", "dex/gallery"]`
    pub fn resolve_template(&self, suggestions: &[&str]) -> Option<String> {
        if suggestions.is_empty() {
            return None;
        }

        let cache_key = suggestions.join("|");
        if let Some(cached) = self.suggestion_cache.get(&cache_key) {
            return Some(cached.clone());
        }

        for suggestion in suggestions {
            let template_name = format!("{suggestion}.html");
            if self.tera.get_template(&template_name).is_ok() {
                self.suggestion_cache
                    .insert(cache_key, template_name.clone());
                return Some(template_name);
            }

            if self.tera.get_template(suggestion).is_ok() {
                let name = (*suggestion).to_string();
                self.suggestion_cache.insert(cache_key, name.clone());
                return Some(name);
            }
        }

        None
    }

    /// Template suggestions for a list, most specific first.
    ///
    /// - `dex/{kind}--{selector}`
    /// - `dex/{kind}`
    pub fn list_suggestions(kind: &str, selector: &str) -> Vec<String> {
        let selector = scrub(selector);
        let mut suggestions = Vec::with_capacity(2);
        if !selector.is_empty() {
            suggestions.push(format!("dex/{kind}--{selector}"));
        }
        suggestions.push(format!("dex/{kind}"));
        suggestions
    }

    /// Render a list template chosen by `kind` and `selector`.
    ///
    /// `selector` and `item_count` are added to the context.
    pub fn render_list(
        &self,
        kind: &str,
        selector: &str,
        item_count: usize,
        context: &mut tera::Context,
    ) -> DexResult<RenderedList> {
        let suggestions = Self::list_suggestions(kind, selector);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();

        let template = self
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| format!("dex/{kind}.html"));

        context.insert("selector", selector);
        context.insert("item_count", &item_count);

        let html = self
            .tera
            .render(&template, context)
            .map_err(|source| DexError::Render {
                template: template.clone(),
                source,
            })?;

        debug!(template = %template, selector = %selector, items = item_count, "list rendered");

        Ok(RenderedList {
            selector: selector.to_string(),
            template,
            html,
            item_count,
        })
    }

    /// Get page template suggestions for a site page.
    pub fn page_suggestions(site_page: &str) -> Vec<String> {
        let page = scrub(site_page);
        let mut suggestions = Vec::with_capacity(2);
        if !page.is_empty() {
            suggestions.push(format!("dex/page--{page}"));
        }
        suggestions.push("dex/page".to_string());
        suggestions
    }

    /// Wrap rendered list markup in a full HTML page.
    pub fn render_page(&self, site_page: &str, title: &str, content: &str) -> DexResult<String> {
        let suggestions = Self::page_suggestions(site_page);
        let suggestion_refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();

        let template = self
            .resolve_template(&suggestion_refs)
            .unwrap_or_else(|| templates::PAGE.to_string());

        let mut context = tera::Context::new();
        context.insert("site_page", site_page);
        context.insert("title", title);
        context.insert("content", content);

        self.tera
            .render(&template, &context)
            .map_err(|source| DexError::Render { template, source })
    }

    /// Clear the suggestion cache (useful for development hot-reload).
    pub fn clear_cache(&self) {
        self.suggestion_cache.clear();
    }
}

impl std::fmt::Debug for ThemeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeEngine")
            .field("template_count", &self.tera.get_template_names().count())
            .field("cache_size", &self.suggestion_cache.len())
            .finish()
    }
}

/// Wrap ThemeEngine in Arc for sharing across handlers.
pub type SharedThemeEngine = Arc<ThemeEngine>;
