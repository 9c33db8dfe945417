//! Results of a page render.

use serde::Serialize;

use super::group::Group;
use super::pager::PaginationState;
use super::record::Record;
use super::widgets::{GalleryWidgets, PrevNext};
use crate::theme::RenderedList;

/// Which terminal view a render reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Profile,
    Gallery,
    GroupGallery,
}

impl ViewKind {
    /// Template family used for this kind.
    pub fn template_kind(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Gallery => "gallery",
            Self::GroupGallery => "groups",
        }
    }
}

/// Output of the page pipeline: exactly one of a profile or a gallery.
#[derive(Debug, Clone)]
pub enum ViewResult {
    Profile(ProfileView),
    Gallery(GalleryView),
}

impl ViewResult {
    pub fn kind(&self) -> ViewKind {
        match self {
            Self::Profile(_) => ViewKind::Profile,
            Self::Gallery(_) => ViewKind::Gallery,
        }
    }

    pub fn list(&self) -> &RenderedList {
        match self {
            Self::Profile(view) => &view.list,
            Self::Gallery(view) => &view.list,
        }
    }

    pub fn as_profile(&self) -> Option<&ProfileView> {
        match self {
            Self::Profile(view) => Some(view),
            Self::Gallery(_) => None,
        }
    }

    pub fn as_gallery(&self) -> Option<&GalleryView> {
        match self {
            Self::Gallery(view) => Some(view),
            Self::Profile(_) => None,
        }
    }
}

/// A single focused record.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub record: Record,
    /// The whole sorted collection the profile was picked from.
    pub records: Vec<Record>,
    /// Set when previous/next navigation is enabled.
    pub prev_next: Option<PrevNext>,
    pub list: RenderedList,
}

/// A multi-record gallery.
#[derive(Debug, Clone)]
pub struct GalleryView {
    /// Sorted and filtered collection, across all pages.
    pub records: Vec<Record>,
    pub pagination: Option<PaginationState>,
    pub widgets: GalleryWidgets,
    pub list: RenderedList,
}

impl GalleryView {
    /// Records on the rendered page.
    pub fn visible(&self) -> &[Record] {
        match &self.pagination {
            Some(state) => state.slice(&self.records),
            None => &self.records,
        }
    }
}

/// A gallery rendered once per group.
#[derive(Debug, Clone)]
pub struct GroupedGalleryView {
    pub groups: Vec<GroupView>,
    pub widgets: GalleryWidgets,
    /// All groups wrapped together.
    pub list: RenderedList,
}

impl GroupedGalleryView {
    pub fn group(&self, key: &str) -> Option<&GroupView> {
        self.groups.iter().find(|g| g.group.key == key)
    }

    /// Records across every group, in group order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.groups.iter().flat_map(|g| g.group.records.iter())
    }
}

/// One group of a grouped gallery with its own rendered gallery.
#[derive(Debug, Clone)]
pub struct GroupView {
    pub group: Group,
    pub list: RenderedList,
}

/// JSON summary of a render, as served by the API.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSummary {
    pub kind: ViewKind,
    pub selector: String,
    pub template: String,
    pub total: usize,
    pub records: Vec<Record>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_next: Option<PrevNext>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub count: usize,
}

impl From<&ViewResult> for ViewSummary {
    fn from(view: &ViewResult) -> Self {
        match view {
            ViewResult::Profile(profile) => Self {
                kind: ViewKind::Profile,
                selector: profile.list.selector.clone(),
                template: profile.list.template.clone(),
                total: 1,
                records: vec![profile.record.clone()],
                pagination: None,
                prev_next: profile.prev_next.clone(),
                groups: Vec::new(),
            },
            ViewResult::Gallery(gallery) => Self {
                kind: ViewKind::Gallery,
                selector: gallery.list.selector.clone(),
                template: gallery.list.template.clone(),
                total: gallery.records.len(),
                records: gallery.visible().to_vec(),
                pagination: gallery.pagination.clone(),
                prev_next: None,
                groups: Vec::new(),
            },
        }
    }
}

impl From<&GroupedGalleryView> for ViewSummary {
    fn from(view: &GroupedGalleryView) -> Self {
        let records: Vec<Record> = view.records().cloned().collect();
        Self {
            kind: ViewKind::GroupGallery,
            selector: view.list.selector.clone(),
            template: view.list.template.clone(),
            total: records.len(),
            records,
            pagination: None,
            prev_next: None,
            groups: view
                .groups
                .iter()
                .map(|g| GroupSummary {
                    key: g.group.key.clone(),
                    count: g.group.records.len(),
                })
                .collect(),
        }
    }
}
