//! Pipeline error types.
//!
//! Only the variants here abort a page render. Missing optional data
//! (absent fields, a relation dataset that fails to load, duplicate join
//! keys, a profile request that resolves to zero or several records) is
//! logged and degrades a single feature instead.

use thiserror::Error;

use crate::source::SourceError;

/// Errors that abort a dex pipeline invocation.
#[derive(Debug, Error)]
pub enum DexError {
    /// Required configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A derived field would overwrite a field from the source data.
    #[error("derived field '{field}' collides with a source field of the same name")]
    FieldCollision { field: String },

    /// A strict relation found a primary record without a related row.
    #[error(
        "relation '{dataset}': no row with {related_property} = '{key}' (relation is strict)"
    )]
    UnmatchedRelation {
        dataset: String,
        related_property: String,
        key: String,
    },

    /// The primary dataset could not be loaded.
    #[error("failed to load dataset '{dataset}'")]
    Source {
        dataset: String,
        #[source]
        source: SourceError,
    },

    /// Template rendering failed.
    #[error("failed to render '{template}'")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// A caller-supplied hook returned an error.
    #[error("{hook} hook failed")]
    Hook {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl DexError {
    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether this error stems from the page configuration rather than
    /// from data or rendering.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::FieldCollision { .. } | Self::UnmatchedRelation { .. }
        )
    }
}

/// Result type alias using DexError.
pub type DexResult<T> = Result<T, DexError>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn collision_message_names_field() {
        let err = DexError::FieldCollision {
            field: "raritybadge".to_string(),
        };
        assert!(err.to_string().contains("raritybadge"));
        assert!(err.is_configuration());
    }

    #[test]
    fn unmatched_relation_message_names_dataset_and_key() {
        let err = DexError::UnmatchedRelation {
            dataset: "designs".to_string(),
            related_property: "design".to_string(),
            key: "FAE-001".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("designs"));
        assert!(msg.contains("FAE-001"));
    }

    #[test]
    fn hook_errors_are_not_configuration() {
        let err = DexError::Hook {
            hook: "list",
            source: anyhow::anyhow!("boom"),
        };
        assert!(!err.is_configuration());
    }
}
