//! Gallery pagination.

use serde::Serialize;

use super::config::PaginationConfig;
use super::params::{PAGE_KEY, PageParameters, with_query};

/// Position of the current page within a paginated gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    /// Current page (1-based, already clamped).
    pub page: usize,
    pub page_count: usize,
    pub per_page: usize,
    pub total: usize,
    /// First record index on this page.
    pub start: usize,
    /// One past the last record index on this page.
    pub end: usize,
    pub has_prev: bool,
    pub has_next: bool,
    /// Repeat the pager below the gallery.
    pub show_bottom: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_url: Option<String>,
}

/// A numbered link in the pager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub url: String,
    pub current: bool,
}

/// Work out the page to show.
///
/// Returns `None` when pagination is off or everything fits on one page.
/// A missing or out-of-range `requested` page is clamped into range.
pub fn paginate(
    total: usize,
    config: &PaginationConfig,
    requested: Option<usize>,
) -> Option<PaginationState> {
    let per_page = config.amount;
    if !config.toggle || per_page == 0 || total <= per_page {
        return None;
    }

    let page_count = total.div_ceil(per_page);
    let page = requested.unwrap_or(1).clamp(1, page_count);
    let start = (page - 1) * per_page;
    let end = (page * per_page).min(total);

    Some(PaginationState {
        page,
        page_count,
        per_page,
        total,
        start,
        end,
        has_prev: page > 1,
        has_next: page < page_count,
        show_bottom: config.bottom_toggle,
        links: Vec::new(),
        prev_url: None,
        next_url: None,
    })
}

impl PaginationState {
    /// Fill in page URLs, keeping the other query parameters.
    pub fn with_links(mut self, page_url: &str, params: &PageParameters) -> Self {
        let url_for =
            |number: usize| with_query(page_url, &params.with(PAGE_KEY, &number.to_string()));

        self.links = (1..=self.page_count)
            .map(|number| PageLink {
                number,
                url: url_for(number),
                current: number == self.page,
            })
            .collect();
        self.prev_url = self.has_prev.then(|| url_for(self.page - 1));
        self.next_url = self.has_next.then(|| url_for(self.page + 1));
        self
    }

    /// Slice of `items` belonging to this page.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let end = self.end.min(items.len());
        let start = self.start.min(end);
        &items[start..end]
    }
}
