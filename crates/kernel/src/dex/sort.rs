//! Stable record sorting.

use std::cmp::Ordering;

use serde_json::Value;

use super::config::{SortConfig, SortDirection};
use super::record::{Record, value_to_text};
use super::text::loose_eq;

/// Sort a collection by `key`.
///
/// When `parameters_key` and `parameters` are both given, records are
/// ordered by the position of `record[parameters_key]` in `parameters`
/// instead, and records whose value is not listed follow every listed one in
/// their input order. Equal keys always keep their input order.
pub fn sort(
    records: Vec<Record>,
    key: &str,
    direction: SortDirection,
    parameters_key: Option<&str>,
    parameters: Option<&[String]>,
) -> Vec<Record> {
    let mut records = records;

    match (parameters_key, parameters) {
        (Some(parameters_key), Some(parameters)) => {
            records.sort_by_key(|record| priority(record, parameters_key, parameters, direction));
        }
        _ => {
            records.sort_by(|a, b| compare_field(a.get(key), b.get(key), direction));
        }
    }

    records
}

/// Sort using a page's sort section.
pub fn sort_with_config(records: Vec<Record>, config: &SortConfig) -> Vec<Record> {
    sort(
        records,
        &config.sort_property,
        config.order,
        config.parameters_key.as_deref(),
        config.parameters.as_deref(),
    )
}

/// Rank of a record in a custom priority list. Unlisted values rank last.
fn priority(
    record: &Record,
    parameters_key: &str,
    parameters: &[String],
    direction: SortDirection,
) -> (bool, usize) {
    let position = record
        .text(parameters_key)
        .and_then(|value| parameters.iter().position(|p| loose_eq(p, &value)));

    match (position, direction) {
        (Some(index), SortDirection::Asc) => (false, index),
        (Some(index), SortDirection::Desc) => (false, parameters.len() - index),
        (None, _) => (true, 0),
    }
}

/// Compare two field values. Absent values sort last in either direction.
fn compare_field(a: Option<&Value>, b: Option<&Value>, direction: SortDirection) -> Ordering {
    let a = a.and_then(SortKey::from_value);
    let b = b.and_then(SortKey::from_value);

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.compare(&b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}

/// Comparable form of a field value: numbers before text.
#[derive(Debug, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn from_value(value: &Value) -> Option<Self> {
        if let Some(n) = value.as_f64() {
            return Some(Self::Number(n));
        }
        let text = value_to_text(value)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(Self::Number(n)),
            _ => Some(Self::Text(trimmed.to_lowercase())),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap_or_default()
    }

    fn values(records: &[Record], key: &str) -> Vec<String> {
        records
            .iter()
            .map(|r| r.text(key).unwrap_or_default())
            .collect()
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            record(json!({"k": 1, "v": "a"})),
            record(json!({"k": 1, "v": "b"})),
            record(json!({"k": 2, "v": "c"})),
        ];

        let sorted = sort(records, "k", SortDirection::Asc, None, None);

        assert_eq!(values(&sorted, "v"), vec!["a", "b", "c"]);
    }

    #[test]
    fn descending_keeps_ties_stable() {
        let records = vec![
            record(json!({"k": 1, "v": "a"})),
            record(json!({"k": 2, "v": "b"})),
            record(json!({"k": 1, "v": "c"})),
        ];

        let sorted = sort(records, "k", SortDirection::Desc, None, None);

        assert_eq!(values(&sorted, "v"), vec!["b", "a", "c"]);
    }

    #[test]
    fn numeric_text_compares_numerically() {
        let records = vec![
            record(json!({"n": "10"})),
            record(json!({"n": "9"})),
            record(json!({"n": 100})),
        ];

        let sorted = sort(records, "n", SortDirection::Asc, None, None);

        assert_eq!(values(&sorted, "n"), vec!["9", "10", "100"]);
    }

    #[test]
    fn text_compares_case_insensitively() {
        let records = vec![
            record(json!({"name": "beta"})),
            record(json!({"name": "Alpha"})),
            record(json!({"name": "alpha"})),
        ];

        let sorted = sort(records, "name", SortDirection::Asc, None, None);

        assert_eq!(values(&sorted, "name"), vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn absent_values_sort_last_both_ways() {
        let records = vec![
            record(json!({"id": "x"})),
            record(json!({"id": "y", "n": 2})),
            record(json!({"id": "z", "n": 1})),
        ];

        let asc = sort(records.clone(), "n", SortDirection::Asc, None, None);
        let desc = sort(records, "n", SortDirection::Desc, None, None);

        assert_eq!(values(&asc, "id"), vec!["z", "y", "x"]);
        assert_eq!(values(&desc, "id"), vec!["y", "z", "x"]);
    }

    #[test]
    fn custom_order_puts_unlisted_last_in_input_order() {
        let records = vec![
            record(json!({"id": 1, "rarity": "Mythic"})),
            record(json!({"id": 2, "rarity": "common"})),
            record(json!({"id": 3, "rarity": "Unknown"})),
            record(json!({"id": 4, "rarity": "Rare"})),
            record(json!({"id": 5})),
            record(json!({"id": 6, "rarity": "Common"})),
        ];
        let order = vec!["Common".to_string(), "Rare".to_string(), "Mythic".to_string()];

        let sorted = sort(records, "id", SortDirection::Asc, Some("rarity"), Some(&order));

        assert_eq!(values(&sorted, "id"), vec!["2", "6", "4", "1", "3", "5"]);
    }

    #[test]
    fn custom_order_descending_reverses_priority_only() {
        let records = vec![
            record(json!({"id": 1, "rarity": "Common"})),
            record(json!({"id": 2, "rarity": "Other"})),
            record(json!({"id": 3, "rarity": "Rare"})),
        ];
        let order = vec!["Common".to_string(), "Rare".to_string()];

        let sorted = sort(records, "id", SortDirection::Desc, Some("rarity"), Some(&order));

        assert_eq!(values(&sorted, "id"), vec!["3", "1", "2"]);
    }

    #[test]
    fn sort_with_config_uses_section() {
        let config = SortConfig {
            toggle: true,
            sort_property: "name".to_string(),
            order: SortDirection::Desc,
            parameters_key: None,
            parameters: None,
        };
        let records = vec![record(json!({"name": "a"})), record(json!({"name": "b"}))];

        let sorted = sort_with_config(records, &config);

        assert_eq!(values(&sorted, "name"), vec!["b", "a"]);
    }
}
