//! Relation joins across datasets.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::config::RelationSpec;
use super::error::{DexError, DexResult};
use super::record::Record;
use crate::source::DataSource;

/// What a single relation did to the collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationOutcome {
    pub dataset: String,
    /// The related dataset was loaded.
    pub loaded: bool,
    /// Primary records that found a related row.
    pub matched: usize,
    /// Primary records without a related row (or without a key).
    pub unmatched: usize,
    /// Related rows ignored because an earlier row had the same key.
    pub duplicate_keys: usize,
}

/// Load `relation.dataset` and merge its fields into `records`.
///
/// A dataset that fails to load is logged and skipped; the collection is
/// left untouched.
pub async fn relate(
    records: &mut [Record],
    relation: &RelationSpec,
    source: &dyn DataSource,
) -> DexResult<RelationOutcome> {
    let related = match source.import_sheet(&relation.dataset).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(
                dataset = %relation.dataset,
                error = %e,
                "related dataset unavailable, skipping relation"
            );
            return Ok(RelationOutcome {
                dataset: relation.dataset.clone(),
                ..Default::default()
            });
        }
    };

    join(records, relation, &related)
}

/// Merge fields of matching `related` rows into `records`.
///
/// The first related row wins for duplicate keys. Fields the primary record
/// already has are never overwritten.
pub fn join(
    records: &mut [Record],
    relation: &RelationSpec,
    related: &[Record],
) -> DexResult<RelationOutcome> {
    let mut outcome = RelationOutcome {
        dataset: relation.dataset.clone(),
        loaded: true,
        ..Default::default()
    };

    let mut lookup: HashMap<String, &Record> = HashMap::with_capacity(related.len());
    for row in related {
        let Some(key) = row.text(&relation.related_property).map(|k| k.trim().to_string()) else {
            continue;
        };
        if lookup.contains_key(&key) {
            outcome.duplicate_keys += 1;
            continue;
        }
        lookup.insert(key, row);
    }

    if outcome.duplicate_keys > 0 {
        debug!(
            dataset = %relation.dataset,
            duplicates = outcome.duplicate_keys,
            "duplicate relation keys ignored"
        );
    }

    // Resolve every match before touching the collection so a strict
    // relation fails without partial writes.
    let mut matches: Vec<Option<&Record>> = Vec::with_capacity(records.len());
    for record in records.iter() {
        let key = record
            .text(&relation.primary_property)
            .map(|k| k.trim().to_string());
        let row = key.as_ref().and_then(|k| lookup.get(k).copied());

        if row.is_none() && relation.strict {
            return Err(DexError::UnmatchedRelation {
                dataset: relation.dataset.clone(),
                related_property: relation.related_property.clone(),
                key: key.unwrap_or_default(),
            });
        }
        matches.push(row);
    }

    for (record, row) in records.iter_mut().zip(matches) {
        match row {
            Some(row) => {
                for (field, value) in row.iter() {
                    record.insert_if_absent(field, value);
                }
                outcome.matched += 1;
            }
            None => outcome.unmatched += 1,
        }
    }

    debug!(
        dataset = %relation.dataset,
        matched = outcome.matched,
        unmatched = outcome.unmatched,
        "relation applied"
    );

    Ok(outcome)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap_or_default()
    }

    fn relation_on(dataset: &str, primary: &str, related: &str) -> RelationSpec {
        RelationSpec {
            dataset: dataset.to_string(),
            primary_property: primary.to_string(),
            related_property: related.to_string(),
            strict: false,
        }
    }

    #[test]
    fn primary_fields_take_precedence() {
        let mut records = vec![record(json!({"id": 1, "name": "X"}))];
        let related = vec![record(json!({"id": 1, "name": "Y", "extra": "Z"}))];

        join(&mut records, &relation_on("more", "id", "id"), &related).unwrap();

        assert_eq!(
            records[0].as_map(),
            record(json!({"id": 1, "name": "X", "extra": "Z"})).as_map()
        );
    }

    #[test]
    fn first_match_wins_on_duplicate_keys() {
        let mut records = vec![record(json!({"owner": "kit"}))];
        let related = vec![
            record(json!({"username": "kit", "joined": "2021"})),
            record(json!({"username": "kit", "joined": "2024", "bio": "late"})),
        ];

        let relation = relation_on("users", "owner", "username");
        let outcome = join(&mut records, &relation, &related).unwrap();

        assert_eq!(records[0].text("joined").as_deref(), Some("2021"));
        assert!(!records[0].contains_key("bio"));
        assert_eq!(outcome.duplicate_keys, 1);
    }

    #[test]
    fn unmatched_records_stay_untouched() {
        let mut records = vec![
            record(json!({"id": 1})),
            record(json!({"id": 2})),
            record(json!({"name": "no key"})),
        ];
        let related = vec![record(json!({"id": "1", "extra": "Z"}))];

        let outcome = join(&mut records, &relation_on("more", "id", "id"), &related).unwrap();

        assert_eq!(records[0].text("extra").as_deref(), Some("Z"));
        assert!(!records[1].contains_key("extra"));
        assert_eq!(records[1].len(), 1);
        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.unmatched, 2);
    }

    #[test]
    fn strict_relation_fails_without_partial_writes() {
        let mut records = vec![record(json!({"id": 1})), record(json!({"id": 9}))];
        let related = vec![record(json!({"id": 1, "extra": "Z"}))];
        let mut strict = relation_on("more", "id", "id");
        strict.strict = true;

        let err = join(&mut records, &strict, &related).unwrap_err();

        assert!(matches!(err, DexError::UnmatchedRelation { ref key, .. } if key == "9"));
        assert!(!records[0].contains_key("extra"));
    }

    #[test]
    fn later_relation_fills_but_never_overwrites() {
        let mut records = vec![record(json!({"id": 1}))];
        let first = vec![record(json!({"id": 1, "a": "first"}))];
        let second = vec![record(json!({"id": 1, "a": "second", "b": "second"}))];

        join(&mut records, &relation_on("one", "id", "id"), &first).unwrap();
        join(&mut records, &relation_on("two", "id", "id"), &second).unwrap();

        assert_eq!(records[0].text("a").as_deref(), Some("first"));
        assert_eq!(records[0].text("b").as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn missing_dataset_is_skipped() {
        let source = MemorySource::new();
        let mut records = vec![record(json!({"id": 1}))];

        let outcome = relate(&mut records, &relation_on("nope", "id", "id"), &source)
            .await
            .unwrap();

        assert!(!outcome.loaded);
        assert_eq!(records[0].len(), 1);
    }

    #[tokio::test]
    async fn relate_loads_from_source() {
        let source = MemorySource::new().with_dataset(
            "owners",
            vec![record(json!({"username": "kit", "avatar": "kit.png"}))],
        );
        let mut records = vec![record(json!({"owner": "kit"}))];

        let outcome = relate(&mut records, &relation_on("owners", "owner", "username"), &source)
            .await
            .unwrap();

        assert!(outcome.loaded);
        assert_eq!(records[0].text("avatar").as_deref(), Some("kit.png"));
    }
}
