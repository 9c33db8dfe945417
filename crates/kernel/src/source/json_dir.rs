//! Datasets stored as `<dir>/<name>.json`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use super::{DataSource, SourceError, check_name, rows_from_value};
use crate::dex::Record;

/// Reads each dataset from a JSON file holding an array of row objects.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, SourceError> {
        check_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl DataSource for JsonDirSource {
    async fn import_sheet(&self, name: &str) -> Result<Vec<Record>, SourceError> {
        let path = self.path_for(name)?;

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(name.to_string()));
            }
            Err(source) => {
                return Err(SourceError::Io {
                    name: name.to_string(),
                    source,
                });
            }
        };

        let value = serde_json::from_slice(&bytes).map_err(|source| SourceError::Parse {
            name: name.to_string(),
            source,
        })?;
        let rows = rows_from_value(name, value)?;

        debug!(dataset = %name, path = ?path, rows = rows.len(), "dataset loaded from file");
        Ok(rows)
    }

    fn kind(&self) -> &'static str {
        "json-dir"
    }
}
