//! Dex pipeline: configuration-driven gallery and profile rendering.
//!
//! A page is described by a [`PageConfig`]. Rendering it runs the records
//! through enrichment, relation joins, the caller's data hook and sorting,
//! then renders either a single profile or a filtered, paginated gallery
//! (or a grouped gallery when the page sets `groupBy`).

pub mod config;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod group;
pub mod hooks;
pub mod pager;
pub mod params;
pub mod record;
pub mod relate;
pub mod service;
pub mod sort;
pub mod text;
pub mod urls;
pub mod view;
pub mod widgets;

pub use config::{
    DEFAULT_PAGE_SIZE, DEFAULT_TRAIT_TYPES, FauxFolderConfig, FiltersConfig, PageConfig,
    PaginationConfig, PrevNextConfig, RelationSpec, SearchConfig, SortConfig, SortDirection,
};
pub use enrich::{EnrichContext, enrich, enrich_all, trait_links};
pub use error::{DexError, DexResult};
pub use filter::{filter_by_page_parameters, search};
pub use group::{Group, Groups, group_by, group_by_field};
pub use hooks::{DataCallback, ListCallback, ListEvent, PageHooks};
pub use pager::{PageLink, PaginationState, paginate};
pub use params::PageParameters;
pub use record::Record;
pub use relate::{RelationOutcome, join, relate};
pub use service::{DexService, PageRender};
pub use sort::{sort, sort_with_config};
pub use text::scrub;
pub use urls::SiteUrls;
pub use view::{
    GalleryView, GroupView, GroupedGalleryView, ProfileView, ViewKind, ViewResult, ViewSummary,
};
pub use widgets::{GalleryWidgets, PrevNext};
