//! Partitioning a collection into named buckets.

use super::record::Record;

/// One named bucket of records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    /// Bucket key; empty for records without a key.
    pub key: String,
    pub records: Vec<Record>,
}

/// Buckets in the order their keys were first seen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Groups {
    groups: Vec<Group>,
}

impl Groups {
    pub fn get(&self, key: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of records across all buckets.
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.records.len()).sum()
    }
}

impl IntoIterator for Groups {
    type Item = Group;
    type IntoIter = std::vec::IntoIter<Group>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partition `records` by `key_fn`, keeping relative order in each bucket.
///
/// Records whose key is absent or blank land in the `""` bucket.
pub fn group_by<F>(records: Vec<Record>, key_fn: F) -> Groups
where
    F: Fn(&Record) -> Option<String>,
{
    let mut groups: Vec<Group> = Vec::new();

    for record in records {
        let key = key_fn(&record)
            .map(|k| k.trim().to_string())
            .unwrap_or_default();

        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.records.push(record),
            None => groups.push(Group {
                key,
                records: vec![record],
            }),
        }
    }

    Groups { groups }
}

/// Group on the text of one field.
pub fn group_by_field(records: Vec<Record>, field: &str) -> Groups {
    group_by(records, |record| record.text(field))
}
