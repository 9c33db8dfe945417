//! Named dataset sources.
//!
//! Every dataset a page reads (the primary sheet and any related sheet) is
//! fetched by name through [`DataSource`]. Implementations load rows from a
//! local directory of JSON files, a remote sheet API or memory, and
//! [`CachedSource`] wraps any of them with a TTL cache.

mod cached;
mod json_dir;
mod memory;
mod sheet_api;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::dex::Record;

pub use cached::{CachedSource, DEFAULT_TTL_SECS};
pub use json_dir::JsonDirSource;
pub use memory::MemorySource;
pub use sheet_api::SheetApiSource;

/// Errors from loading a dataset.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("dataset '{0}' not found")]
    NotFound(String),

    #[error("invalid dataset name '{0}'")]
    InvalidName(String),

    #[error("failed to read dataset '{name}'")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset '{name}' is not valid JSON")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset '{name}' must be an array of objects: {reason}")]
    Shape { name: String, reason: String },

    #[error("request for dataset '{name}' failed")]
    Http {
        name: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("sheet API returned status {status} for dataset '{name}'")]
    Status { name: String, status: u16 },
}

/// Fetches a dataset by name.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Load every row of the named dataset, in sheet order.
    async fn import_sheet(&self, name: &str) -> Result<Vec<Record>, SourceError>;

    /// Short label for logs.
    fn kind(&self) -> &'static str;
}

/// Turn a JSON array of objects into records.
///
/// Blank column names are dropped and the rest are trimmed, as spreadsheet
/// exports often carry padded or empty header cells.
pub(crate) fn rows_from_value(name: &str, value: Value) -> Result<Vec<Record>, SourceError> {
    let Value::Array(rows) = value else {
        return Err(SourceError::Shape {
            name: name.to_string(),
            reason: "top level is not an array".to_string(),
        });
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(fields) => {
                let mut record = Record::new();
                for (key, value) in fields {
                    let key = key.trim();
                    if !key.is_empty() {
                        record.insert(key, value);
                    }
                }
                Ok(record)
            }
            _ => Err(SourceError::Shape {
                name: name.to_string(),
                reason: format!("row {index} is not an object"),
            }),
        })
        .collect()
}

/// Dataset names end up in file paths and URLs; keep them plain.
pub(crate) fn check_name(name: &str) -> Result<(), SourceError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SourceError::InvalidName(name.to_string()))
    }
}
