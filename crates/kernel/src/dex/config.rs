//! Declarative page configuration.
//!
//! One `PageConfig` describes one dex page: which dataset it shows, how
//! records are enriched, related, sorted, filtered, paginated and grouped.
//! Every optional stage has its own section with an explicit `toggle`.
//! Omitting a section disables the stage; writing a section without its
//! `toggle` is a parse error.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Trait fields linked when a page does not name its own.
pub const DEFAULT_TRAIT_TYPES: &[&str] = &[
    "ears",
    "halo",
    "body",
    "horns",
    "tails",
    "misc",
    "mutations",
    "plant",
];

/// Default page size for paginated galleries.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Complete configuration for one dex page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// Selector prefix for rendered lists (e.g. "charadex").
    pub dex_selector: String,

    /// Page id, used to build the page URL.
    pub site_page: String,

    /// Field that identifies a record for profile links.
    pub profile_property: String,

    /// Dataset to load when the caller does not supply records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_page: Option<String>,

    /// Set to `false` to always render the gallery.
    #[serde(default = "default_true")]
    pub profile_toggle: bool,

    /// Render as a grouped gallery keyed on this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,

    #[serde(default)]
    pub sort: SortConfig,

    #[serde(default)]
    pub filters: FiltersConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Related datasets, applied in document order.
    #[serde(
        default,
        serialize_with = "serialize_relations",
        deserialize_with = "deserialize_relations"
    )]
    pub related_data: Vec<RelationSpec>,

    #[serde(default)]
    pub faux_folder: FauxFolderConfig,

    /// Trait fields to link. Replaces [`DEFAULT_TRAIT_TYPES`] when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_types: Option<Vec<String>>,

    /// Separator between the links of one trait field.
    #[serde(default = "default_trait_separator")]
    pub trait_separator: String,

    #[serde(default)]
    pub prev_next: PrevNextConfig,
}

fn default_true() -> bool {
    true
}

fn default_trait_separator() -> String {
    ", ".to_string()
}

/// Sort stage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortConfig {
    pub toggle: bool,

    #[serde(default)]
    pub sort_property: String,

    #[serde(default)]
    pub order: SortDirection,

    /// Field looked up in `parameters` for custom ordering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_key: Option<String>,

    /// Explicit priority list of values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "ascending")]
    Asc,
    #[serde(alias = "descending")]
    Desc,
}

/// Filter dropdowns: field name to the option values offered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiltersConfig {
    pub toggle: bool,

    #[serde(
        default,
        serialize_with = "serialize_ordered",
        deserialize_with = "deserialize_ordered"
    )]
    pub parameters: Vec<(String, Vec<String>)>,
}

/// Free-text search configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    pub toggle: bool,

    /// Fields searched by the free-text box.
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Offer a field picker next to the search box.
    #[serde(default)]
    pub filter_toggle: bool,
}

/// Pagination configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationConfig {
    pub toggle: bool,

    /// Records per page.
    #[serde(default = "default_page_size")]
    pub amount: usize,

    /// Repeat the pager below the gallery.
    #[serde(default)]
    pub bottom_toggle: bool,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            toggle: false,
            amount: DEFAULT_PAGE_SIZE,
            bottom_toggle: false,
        }
    }
}

/// Faux folders: quick links narrowing the gallery to one folder value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FauxFolderConfig {
    pub toggle: bool,

    /// Folder names shown as links.
    #[serde(default)]
    pub parameters: Vec<String>,

    /// Record field holding the folder value.
    #[serde(default)]
    pub folder_property: String,
}

/// Previous/next navigation on profile pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrevNextConfig {
    pub toggle: bool,
}

/// Join descriptor: copy fields from `dataset` rows whose
/// `related_property` matches the primary record's `primary_property`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    pub dataset: String,
    pub primary_property: String,
    pub related_property: String,
    /// Fail the call when a primary record has no related row.
    pub strict: bool,
}

/// Wire form of a relation (the dataset name is the map key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelationTarget {
    primary_property: String,
    related_property: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    strict: bool,
}

impl PageConfig {
    /// Minimal configuration with every optional stage disabled.
    pub fn new(
        dex_selector: impl Into<String>,
        site_page: impl Into<String>,
        profile_property: impl Into<String>,
    ) -> Self {
        Self {
            dex_selector: dex_selector.into(),
            site_page: site_page.into(),
            profile_property: profile_property.into(),
            sheet_page: None,
            profile_toggle: true,
            group_by: None,
            sort: SortConfig::default(),
            filters: FiltersConfig::default(),
            search: SearchConfig::default(),
            pagination: PaginationConfig::default(),
            related_data: Vec::new(),
            faux_folder: FauxFolderConfig::default(),
            trait_types: None,
            trait_separator: default_trait_separator(),
            prev_next: PrevNextConfig::default(),
        }
    }

    /// Parse a YAML page configuration.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yml::Error> {
        serde_yml::from_str(text)
    }

    /// Trait fields to link: the page's own list, or the defaults.
    pub fn trait_types(&self) -> Vec<&str> {
        match &self.trait_types {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => DEFAULT_TRAIT_TYPES.to_vec(),
        }
    }

    /// Check required values of every enabled stage.
    ///
    /// Returns a list of problems; an empty list means the configuration
    /// is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.dex_selector.trim().is_empty() {
            errors.push("dexSelector must not be empty".to_string());
        }
        if self.site_page.trim().is_empty() {
            errors.push("sitePage must not be empty".to_string());
        }
        if self.profile_property.trim().is_empty() {
            errors.push("profileProperty must not be empty".to_string());
        }

        if self.sort.toggle {
            let custom = self.sort.parameters_key.is_some() && self.sort.parameters.is_some();
            if self.sort.sort_property.trim().is_empty() && !custom {
                errors.push("sort is enabled but sortProperty is empty".to_string());
            }
            if self.sort.parameters_key.is_some() != self.sort.parameters.is_some() {
                errors.push(
                    "sort.parametersKey and sort.parameters must be set together".to_string(),
                );
            }
        }

        if self.pagination.toggle && self.pagination.amount == 0 {
            errors.push("pagination is enabled but amount is 0".to_string());
        }

        if self.search.toggle && self.search.parameters.is_empty() {
            errors.push("search is enabled but names no fields".to_string());
        }

        if self.faux_folder.toggle && self.faux_folder.folder_property.trim().is_empty() {
            errors.push("fauxFolder is enabled but folderProperty is empty".to_string());
        }

        for relation in &self.related_data {
            if relation.primary_property.trim().is_empty()
                || relation.related_property.trim().is_empty()
            {
                errors.push(format!(
                    "relatedData '{}' needs primaryProperty and relatedProperty",
                    relation.dataset
                ));
            }
        }

        if let Some(group_by) = &self.group_by
            && group_by.trim().is_empty()
        {
            errors.push("groupBy must not be empty when set".to_string());
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Ordered maps
// ---------------------------------------------------------------------------

/// Deserialize a map into a list of entries, keeping document order.
fn deserialize_ordered<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

fn serialize_ordered<S, T>(entries: &[(String, T)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    let mut map = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

fn deserialize_relations<'de, D>(deserializer: D) -> Result<Vec<RelationSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<(String, RelationTarget)> = deserialize_ordered(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|(dataset, target)| RelationSpec {
            dataset,
            primary_property: target.primary_property,
            related_property: target.related_property,
            strict: target.strict,
        })
        .collect())
}

fn serialize_relations<S>(relations: &[RelationSpec], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let entries: Vec<(String, RelationTarget)> = relations
        .iter()
        .map(|r| {
            (
                r.dataset.clone(),
                RelationTarget {
                    primary_property: r.primary_property.clone(),
                    related_property: r.related_property.clone(),
                    strict: r.strict,
                },
            )
        })
        .collect();
    serialize_ordered(&entries, serializer)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const MASTERLIST: &str = r#"
dexSelector: charadex
sitePage: masterlist
profileProperty: design
sheetPage: masterlist
sort:
  toggle: true
  sortProperty: design
  order: desc
pagination:
  toggle: true
  amount: 24
  bottomToggle: true
relatedData:
  owners:
    primaryProperty: owner
    relatedProperty: username
  designs:
    primaryProperty: design
    relatedProperty: design
    strict: true
traitTypes: [ears, tails]
"#;

    #[test]
    fn parses_yaml_page() {
        let config = PageConfig::from_yaml(MASTERLIST).unwrap();
        assert_eq!(config.dex_selector, "charadex");
        assert_eq!(config.sheet_page.as_deref(), Some("masterlist"));
        assert!(config.sort.toggle);
        assert_eq!(config.sort.order, SortDirection::Desc);
        assert_eq!(config.pagination.amount, 24);
        assert!(config.pagination.bottom_toggle);
        assert!(config.profile_toggle);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn relations_keep_document_order() {
        let config = PageConfig::from_yaml(MASTERLIST).unwrap();
        let names: Vec<_> = config.related_data.iter().map(|r| r.dataset.as_str()).collect();
        assert_eq!(names, vec!["owners", "designs"]);
        assert!(!config.related_data[0].strict);
        assert!(config.related_data[1].strict);
    }

    #[test]
    fn absent_sections_are_disabled() {
        let config = PageConfig::from_yaml("dexSelector: d\nsitePage: p\nprofileProperty: id\n")
            .unwrap();
        assert!(!config.sort.toggle);
        assert!(!config.filters.toggle);
        assert!(!config.search.toggle);
        assert!(!config.pagination.toggle);
        assert!(!config.faux_folder.toggle);
        assert!(!config.prev_next.toggle);
        assert!(config.related_data.is_empty());
        assert_eq!(config.trait_separator, ", ");
    }

    #[test]
    fn section_without_toggle_is_rejected() {
        let yaml = "dexSelector: d\nsitePage: p\nprofileProperty: id\nsort:\n  sortProperty: name\n";
        assert!(PageConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn missing_required_field_is_rejected() {
        assert!(PageConfig::from_yaml("dexSelector: d\nsitePage: p\n").is_err());
    }

    #[test]
    fn order_accepts_long_names() {
        let yaml = "dexSelector: d\nsitePage: p\nprofileProperty: id\nsort:\n  toggle: true\n  sortProperty: name\n  order: descending\n";
        let config = PageConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sort.order, SortDirection::Desc);
    }

    #[test]
    fn trait_types_fall_back_to_defaults() {
        let mut config = PageConfig::new("d", "p", "id");
        assert_eq!(config.trait_types().len(), DEFAULT_TRAIT_TYPES.len());

        config.trait_types = Some(vec!["wings".to_string()]);
        assert_eq!(config.trait_types(), vec!["wings"]);
    }

    #[test]
    fn validate_reports_enabled_stage_problems() {
        let mut config = PageConfig::new("", "p", "id");
        config.sort.toggle = true;
        config.pagination.toggle = true;
        config.pagination.amount = 0;
        config.search.toggle = true;
        config.faux_folder.toggle = true;

        let errors = config.validate();
        assert_eq!(errors.len(), 5);
        assert!(errors.iter().any(|e| e.contains("dexSelector")));
        assert!(errors.iter().any(|e| e.contains("amount")));
    }

    #[test]
    fn custom_sort_needs_both_halves() {
        let mut config = PageConfig::new("d", "p", "id");
        config.sort.toggle = true;
        config.sort.parameters_key = Some("rarity".to_string());
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("parametersKey")));
    }

    #[test]
    fn filters_keep_document_order() {
        let yaml = "dexSelector: d\nsitePage: p\nprofileProperty: id\nfilters:\n  toggle: true\n  parameters:\n    species: [Cat, Dog]\n    rarity: [Common, Rare]\n";
        let config = PageConfig::from_yaml(yaml).unwrap();
        let keys: Vec<_> = config.filters.parameters.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["species", "rarity"]);
    }

    #[test]
    fn round_trips_through_json() {
        let config = PageConfig::from_yaml(MASTERLIST).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.related_data, config.related_data);
        assert_eq!(parsed.trait_types, config.trait_types);
    }
}
