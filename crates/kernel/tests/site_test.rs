#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Site directory tests.
//!
//! Boot the application from a site directory on disk: YAML page
//! configurations, JSON datasets and template overrides.

mod common;

use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::StatusCode;

use charadex_kernel::config::Config;
use charadex_kernel::dex::{PageHooks, PageParameters};
use charadex_kernel::state::AppState;
use charadex_test_utils::{MASTERLIST_YAML, SPECIES_YAML, assert, twelve_characters};

use common::{TestApp, body_string};

/// Fresh site directory for one test.
fn site(test: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("charadex-site-{test}-{}", std::process::id()));
    std::fs::remove_dir_all(&root).ok();
    for dir in ["pages", "templates/dex", "data"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }

    std::fs::write(root.join("pages/masterlist.yml"), MASTERLIST_YAML).unwrap();
    std::fs::write(root.join("pages/species.yaml"), SPECIES_YAML).unwrap();
    std::fs::write(root.join("pages/README.txt"), "not a page").unwrap();
    std::fs::write(
        root.join("data/masterlist.json"),
        serde_json::to_string(&twelve_characters()).unwrap(),
    )
    .unwrap();
    root
}

fn config(root: &Path) -> Config {
    Config {
        site_url: "https://dex.example".to_string(),
        site_dir: root.to_path_buf(),
        data_dir: root.join("data"),
        sheet_cache_ttl: Duration::from_secs(60),
        ..Config::default()
    }
}

#[tokio::test]
async fn pages_load_from_yaml_files() {
    let root = site("load");
    let state = AppState::new(&config(&root)).await.unwrap();

    let pages: Vec<String> = state
        .dex()
        .list_pages()
        .into_iter()
        .map(|p| p.site_page)
        .collect();
    assert_eq!(pages, vec!["masterlist", "species"]);

    let render = state
        .dex()
        .render_page("masterlist", &PageParameters::new(), &PageHooks::new())
        .await
        .unwrap();
    assert_eq!(render.summary().total, 12);

    std::fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn selector_template_overrides_builtin() {
    let root = site("override");
    std::fs::write(
        root.join("templates/dex/gallery--charadex.html"),
        r#"<ol class="custom">{% for record in records %}<li>{{ record.design }}</li>{% endfor %}</ol>"#,
    )
    .unwrap();

    let state = AppState::new(&config(&root)).await.unwrap();
    let app = TestApp::from_service(state.dex().clone());

    let response = app.get("/masterlist").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert::contains(&html, "<ol class=\"custom\"><li>FAE-012</li>");
    assert::not_contains(&html, "charadex-gallery");

    // The profile view keeps the built-in template
    let html = body_string(app.get("/masterlist?profile=FAE-001").await).await;
    assert::contains(&html, "charadex-profile");

    std::fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn page_template_overrides_builtin() {
    let root = site("page-override");
    std::fs::write(
        root.join("templates/dex/page--species.html"),
        "<body id=\"species-page\">{{ content | safe }}</body>",
    )
    .unwrap();

    let state = AppState::new(&config(&root)).await.unwrap();
    let app = TestApp::from_service(state.dex().clone());

    let html = body_string(app.get("/species").await).await;
    assert::contains(&html, "id=\"species-page\"");
    assert::contains(&html, "charadex-groups");

    let html = body_string(app.get("/masterlist").await).await;
    assert::not_contains(&html, "species-page");

    std::fs::remove_dir_all(root).ok();
}

#[tokio::test]
async fn invalid_page_configuration_fails_startup() {
    let root = site("invalid");
    std::fs::write(
        root.join("pages/broken.yml"),
        "dexSelector: charadex\nsitePage: broken\nprofileProperty: design\npagination:\n  toggle: true\n  amount: 0\n",
    )
    .unwrap();

    let err = AppState::new(&config(&root)).await.err().unwrap();
    assert!(format!("{err:#}").contains("amount is 0"));

    std::fs::remove_dir_all(root).ok();
}
