//! Dex page routes.
//!
//! HTML pages at `/{site_page}` (an optional `.html` suffix is accepted) and
//! JSON summaries under `/api/dex`.

use axum::{
    Router,
    extract::{Path, RawQuery, State},
    response::{Html, Json},
    routing::get,
};
use serde::Serialize;
use tracing::debug;

use crate::dex::{PageHooks, PageParameters, ViewSummary};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Create the dex router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/dex", get(list_pages))
        .route("/api/dex/{site_page}", get(page_summary))
        .route("/{site_page}", get(render_page_html))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageListing {
    site_page: String,
    dex_selector: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sheet_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group_by: Option<String>,
}

/// List registered pages.
async fn list_pages(State(state): State<AppState>) -> Json<Vec<PageListing>> {
    let pages = state
        .dex()
        .list_pages()
        .into_iter()
        .map(|page| PageListing {
            site_page: page.site_page,
            dex_selector: page.dex_selector,
            sheet_page: page.sheet_page,
            group_by: page.group_by,
        })
        .collect();
    Json(pages)
}

/// JSON summary of a page render.
async fn page_summary(
    State(state): State<AppState>,
    Path(site_page): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Json<ViewSummary>> {
    let site_page = page_id(&site_page);
    ensure_page(&state, site_page)?;

    let params = PageParameters::parse(query.as_deref().unwrap_or_default());
    let render = state
        .dex()
        .render_page(site_page, &params, &PageHooks::default())
        .await?;

    Ok(Json(render.summary()))
}

/// Full HTML page.
async fn render_page_html(
    State(state): State<AppState>,
    Path(site_page): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<Html<String>> {
    let site_page = page_id(&site_page);
    ensure_page(&state, site_page)?;

    let params = PageParameters::parse(query.as_deref().unwrap_or_default());
    let render = state
        .dex()
        .render_page(site_page, &params, &PageHooks::default())
        .await?;

    debug!(page = %site_page, kind = ?render.kind(), "page served");

    let html = state
        .dex()
        .theme()
        .render_page(site_page, &title_for(site_page), &render.list().html)?;
    Ok(Html(html))
}

fn page_id(raw: &str) -> &str {
    raw.strip_suffix(".html").unwrap_or(raw)
}

fn ensure_page(state: &AppState, site_page: &str) -> AppResult<()> {
    if state.dex().get_page(site_page).is_some() {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// "trait-types" -> "Trait Types"
fn title_for(site_page: &str) -> String {
    site_page
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
