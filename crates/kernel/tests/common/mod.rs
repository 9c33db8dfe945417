#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds the real service and router over an in-memory data source
//! seeded with the fixtures from `charadex-test-utils`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use charadex_kernel::dex::{DexService, PageConfig, Record, SiteUrls};
use charadex_kernel::routes;
use charadex_kernel::source::MemorySource;
use charadex_kernel::state::AppState;
use charadex_kernel::theme::ThemeEngine;
use charadex_test_utils::{MASTERLIST_YAML, SPECIES_YAML, owners, twelve_characters};

pub const SITE_URL: &str = "https://dex.example";

/// Convert fixture rows into records.
pub fn records(rows: Vec<Value>) -> Vec<Record> {
    rows.into_iter().filter_map(Record::from_value).collect()
}

/// Design ids of `records`, in order.
pub fn ids(records: &[Record]) -> Vec<String> {
    records.iter().filter_map(|r| r.text("design")).collect()
}

/// `FAE-{n}` ids for a range, e.g. `fae(&[12, 11])`.
pub fn fae(numbers: &[usize]) -> Vec<String> {
    numbers.iter().map(|n| format!("FAE-{n:03}")).collect()
}

/// In-memory source holding the `masterlist` and `owners` datasets.
pub fn memory_source() -> MemorySource {
    MemorySource::new()
        .with_dataset("masterlist", records(twelve_characters()))
        .with_dataset("owners", records(owners()))
}

/// Service over `source` with the built-in templates.
pub fn service(source: MemorySource) -> Arc<DexService> {
    let theme = ThemeEngine::builtin().unwrap();
    DexService::new(Arc::new(source), Arc::new(theme), SiteUrls::new(SITE_URL))
}

/// Service with the masterlist and species pages registered.
pub fn dex_service() -> Arc<DexService> {
    let dex = service(memory_source());
    dex.register_page(masterlist_config()).unwrap();
    dex.register_page(PageConfig::from_yaml(SPECIES_YAML).unwrap())
        .unwrap();
    dex
}

pub fn masterlist_config() -> PageConfig {
    PageConfig::from_yaml(MASTERLIST_YAML).unwrap()
}

/// Test application wrapper using the real routes and state.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self::from_service(dex_service())
    }

    pub fn from_service(dex: Arc<DexService>) -> Self {
        let state = AppState::from_service(dex);
        Self {
            router: routes::app(state.clone()),
            state,
        }
    }

    /// Make a GET request.
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

/// Read a response body as text.
pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
