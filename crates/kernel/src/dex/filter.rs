//! Narrowing a collection by page parameters and free-text search.

use tracing::debug;

use super::config::SearchConfig;
use super::params::PageParameters;
use super::record::Record;

/// Keep records matching every field constraint in `params`.
///
/// A constraint matches when the record's field, trimmed, equals the
/// constraint value case-insensitively. A record without the constrained
/// field is rejected, so a key no record carries empties the result.
pub fn filter_by_page_parameters(records: Vec<Record>, params: &PageParameters) -> Vec<Record> {
    let constraints: Vec<(&str, String)> = params
        .constraints()
        .map(|(key, value)| (key, value.trim().to_lowercase()))
        .collect();

    if constraints.is_empty() {
        return records;
    }

    let before = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| {
            constraints.iter().all(|(key, wanted)| {
                record
                    .text(key)
                    .is_some_and(|value| value.trim().to_lowercase() == *wanted)
            })
        })
        .collect();

    debug!(
        constraints = constraints.len(),
        before,
        after = kept.len(),
        "page parameter filter applied"
    );
    kept
}

/// Keep records where a searched field contains the search term.
///
/// Does nothing when search is off or no term was given. With
/// `filter_toggle` on, a `searchfield` naming one of the configured fields
/// narrows the search to that field.
pub fn search(records: Vec<Record>, config: &SearchConfig, params: &PageParameters) -> Vec<Record> {
    if !config.toggle {
        return records;
    }
    let Some(term) = params.search() else {
        return records;
    };
    let term = term.to_lowercase();

    let fields: Vec<&str> = match params.search_field() {
        Some(field) if config.filter_toggle && config.parameters.iter().any(|p| p == field) => {
            vec![field]
        }
        _ => config.parameters.iter().map(String::as_str).collect(),
    };

    records
        .into_iter()
        .filter(|record| {
            fields.iter().any(|field| {
                record
                    .text(field)
                    .is_some_and(|value| value.to_lowercase().contains(&term))
            })
        })
        .collect()
}
