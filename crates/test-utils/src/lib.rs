//! Charadex test utilities.
//!
//! Spreadsheet-shaped fixtures for integration tests: record builders,
//! a small masterlist of characters, related datasets and page
//! configurations, plus assertion helpers for rendered output.
//!
//! Fixtures are plain JSON rows, the same shape a data source returns.

use serde_json::{Map, Value};

/// Species cycled through by [`twelve_characters`].
pub const SPECIES: &[&str] = &["Fae", "Lumin", "Moth"];

/// Rarities cycled through by [`twelve_characters`].
pub const RARITIES: &[&str] = &["Common", "Uncommon", "Rare", "Legendary"];

/// Start a character row with its design id.
pub fn character(design: &str) -> TestRecord {
    TestRecord::new().with("design", design)
}

/// A spreadsheet row builder.
#[derive(Debug, Clone, Default)]
pub struct TestRecord {
    fields: Map<String, Value>,
}

impl TestRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Set a field to null (an empty cell that still has a column).
    pub fn with_null(mut self, key: &str) -> Self {
        self.fields.insert(key.to_string(), Value::Null);
        self
    }

    pub fn name(self, name: &str) -> Self {
        self.with("name", name)
    }

    pub fn species(self, species: &str) -> Self {
        self.with("species", species)
    }

    pub fn rarity(self, rarity: &str) -> Self {
        self.with("rarity", rarity)
    }

    pub fn owner(self, owner: &str) -> Self {
        self.with("owner", owner)
    }

    pub fn designer(self, designer: &str) -> Self {
        self.with("designer", designer)
    }

    /// Comma separated trait list, e.g. `"Feathered (Rare), Curled (Common)"`.
    pub fn traits(self, field: &str, traits: &str) -> Self {
        self.with(field, traits)
    }

    pub fn folder(self, folder: &str) -> Self {
        self.with("folder", folder)
    }

    /// The row as a JSON object.
    pub fn build(self) -> Value {
        Value::Object(self.fields)
    }

    /// The row as a JSON map.
    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }
}

/// Twelve characters `FAE-001` to `FAE-012`.
///
/// Names are `Character 12` down to `Character 01`, so sorting by name
/// reverses the design order. Species cycle through [`SPECIES`], rarities
/// through [`RARITIES`], and owners alternate between `alice` and `bram`.
pub fn twelve_characters() -> Vec<Value> {
    (1..=12)
        .map(|n: usize| {
            character(&format!("FAE-{n:03}"))
                .name(&format!("Character {:02}", 13 - n))
                .species(SPECIES[(n - 1) % SPECIES.len()])
                .rarity(RARITIES[(n - 1) % RARITIES.len()])
                .owner(if n % 2 == 1 { "alice" } else { "bram" })
                .designer("moss")
                .traits("ears", "Pointed (Common)")
                .folder(if n <= 6 { "Official" } else { "Guest" })
                .build()
        })
        .collect()
}

/// Owner rows keyed by `username`, matching the owners of
/// [`twelve_characters`].
pub fn owners() -> Vec<Value> {
    vec![
        TestRecord::new()
            .with("username", "alice")
            .with("joined", "2023")
            .with("badge", "Founder")
            .build(),
        TestRecord::new()
            .with("username", "bram")
            .with("joined", "2024")
            .with("badge", "Collector")
            .build(),
    ]
}

/// Masterlist page configuration: sorted by name, paginated by five,
/// with species filters and name search.
pub const MASTERLIST_YAML: &str = r#"
dexSelector: charadex
sitePage: masterlist
profileProperty: design
sheetPage: masterlist
sort:
  toggle: true
  sortProperty: name
  order: asc
filters:
  toggle: true
  parameters:
    species: [Fae, Lumin, Moth]
search:
  toggle: true
  parameters: [name, design]
pagination:
  toggle: true
  amount: 5
  bottomToggle: true
prevNext:
  toggle: true
"#;

/// Species page configuration grouped by `species`.
pub const SPECIES_YAML: &str = r#"
dexSelector: charadex
sitePage: species
profileProperty: design
sheetPage: masterlist
groupBy: species
sort:
  toggle: true
  sortProperty: design
"#;

/// Assertion helpers for rendered output.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string NOT to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that `needles` appear in `haystack` in the given order.
    pub fn in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => panic!("Expected '{needle}' after byte {from}\nActual: {haystack}"),
            }
        }
    }
}
