//! Remote sheet API.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{DataSource, SourceError, check_name, rows_from_value};
use crate::dex::Record;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Fetches datasets from an HTTP endpoint.
///
/// `GET {base_url}?sheet={name}` must answer with a JSON array of row
/// objects. No retries; a failed request surfaces as an error.
#[derive(Debug, Clone)]
pub struct SheetApiSource {
    base_url: String,
    client: reqwest::Client,
}

impl SheetApiSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Request URL for a dataset.
    pub fn sheet_url(&self, name: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("sheet", name)
            .finish();
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.base_url)
    }
}

#[async_trait]
impl DataSource for SheetApiSource {
    async fn import_sheet(&self, name: &str) -> Result<Vec<Record>, SourceError> {
        check_name(name)?;
        let url = self.sheet_url(name);

        let http_error = |source| SourceError::Http {
            name: name.to_string(),
            source,
        };

        let response = self.client.get(&url).send().await.map_err(http_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let value: Value = response.json().await.map_err(http_error)?;
        let rows = rows_from_value(name, value)?;

        debug!(dataset = %name, url = %url, rows = rows.len(), "dataset fetched from sheet API");
        Ok(rows)
    }

    fn kind(&self) -> &'static str {
        "sheet-api"
    }
}
