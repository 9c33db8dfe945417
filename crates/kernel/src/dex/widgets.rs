//! Gallery controls: filter dropdowns, search box, faux folders and
//! previous/next navigation.

use serde::Serialize;

use super::config::PageConfig;
use super::enrich::{PROFILE_ID, PROFILE_LINK};
use super::params::{PAGE_KEY, PROFILE_KEY, PageParameters, with_query};
use super::record::Record;

/// Controls shown around a gallery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GalleryWidgets {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterWidget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchWidget>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<FolderLink>,
}

impl GalleryWidgets {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.search.is_none() && self.folders.is_empty()
    }
}

/// Dropdown narrowing the gallery to one value of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterWidget {
    pub field: String,
    pub options: Vec<FilterOption>,
    /// Gallery URL without this constraint.
    pub clear_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    pub value: String,
    pub url: String,
    pub selected: bool,
}

/// Free-text search box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchWidget {
    pub action: String,
    /// Current term, if any.
    pub term: String,
    pub fields: Vec<String>,
    /// Show the field picker.
    pub field_picker: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_field: Option<String>,
}

/// Quick link to one faux folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderLink {
    pub name: String,
    pub url: String,
    pub active: bool,
}

/// Neighbours of a profile in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrevNext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<NeighbourLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NeighbourLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighbourLink {
    pub id: String,
    pub url: String,
}

/// Build the controls a gallery page offers.
///
/// Changing a filter, the search or the folder always returns to page one,
/// so generated URLs drop the `page` parameter.
pub fn gallery_widgets(
    config: &PageConfig,
    page_url: &str,
    params: &PageParameters,
) -> GalleryWidgets {
    let base = params.without(PAGE_KEY).without(PROFILE_KEY);
    let mut widgets = GalleryWidgets::default();

    if config.filters.toggle {
        widgets.filters = config
            .filters
            .parameters
            .iter()
            .map(|(field, values)| {
                let current = params.get(field).map(|v| v.trim().to_lowercase());
                FilterWidget {
                    field: field.clone(),
                    options: values
                        .iter()
                        .map(|value| FilterOption {
                            value: value.clone(),
                            url: with_query(page_url, &base.with(field, value)),
                            selected: current.as_deref()
                                == Some(value.trim().to_lowercase().as_str()),
                        })
                        .collect(),
                    clear_url: with_query(page_url, &base.without(field)),
                }
            })
            .collect();
    }

    if config.search.toggle {
        widgets.search = Some(SearchWidget {
            action: page_url.to_string(),
            term: params.search().unwrap_or_default().to_string(),
            fields: config.search.parameters.clone(),
            field_picker: config.search.filter_toggle,
            selected_field: params.search_field().map(str::to_string),
        });
    }

    if config.faux_folder.toggle {
        let folder_property = config.faux_folder.folder_property.as_str();
        let current = params.get(folder_property).map(|v| v.trim().to_lowercase());
        widgets.folders = config
            .faux_folder
            .parameters
            .iter()
            .map(|name| FolderLink {
                name: name.clone(),
                url: with_query(page_url, &base.with(folder_property, name)),
                active: current.as_deref() == Some(name.trim().to_lowercase().as_str()),
            })
            .collect();
    }

    widgets
}

/// Previous and next records around `index` in a sorted collection.
pub fn prev_next(records: &[Record], index: usize) -> PrevNext {
    let link = |record: &Record| {
        Some(NeighbourLink {
            id: record.text(PROFILE_ID)?,
            url: record.text(PROFILE_LINK)?,
        })
    };

    PrevNext {
        prev: index
            .checked_sub(1)
            .and_then(|i| records.get(i))
            .and_then(link),
        next: records.get(index + 1).and_then(link),
    }
}
