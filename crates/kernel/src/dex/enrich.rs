//! Record enrichment: derived links, badges and trait links.
//!
//! Each rule in the catalog reads one source field and writes one derived
//! field, and only runs when its source field is present and non-blank.
//! Derived fields never overwrite source fields (see
//! [`Record::set_derived`]), and re-running the enricher recomputes the
//! same values.

use super::config::PageConfig;
use super::error::DexResult;
use super::params::{PageParameters, with_query};
use super::record::Record;
use super::text::{html_escape, scrub, split_segments, trait_token};
use super::urls::SiteUrls;

pub const PROFILE_ID: &str = "profileid";
pub const PROFILE_LINK: &str = "profilelink";
pub const RARITY_BADGE: &str = "raritybadge";
pub const OWNER_LINK: &str = "ownerlink";
pub const DESIGNER_LINK: &str = "designerlink";
pub const ARTIST_LINK: &str = "artistlink";
pub const FOLDER_LINK: &str = "folderlink";

/// Page that lists owner inventories.
const INVENTORIES_PAGE: &str = "inventories";
/// Page that shows trait profiles.
const TRAITS_PAGE: &str = "traits";

/// Everything the enricher needs to know about the current page.
#[derive(Debug, Clone)]
pub struct EnrichContext<'a> {
    pub page_url: &'a str,
    pub profile_property: &'a str,
    pub trait_types: Vec<&'a str>,
    pub trait_separator: &'a str,
    /// Set when faux folders are enabled.
    pub folder_property: Option<&'a str>,
    pub urls: &'a SiteUrls,
    traits_url: String,
    inventories_url: String,
}

impl<'a> EnrichContext<'a> {
    /// Build the context for a page.
    pub fn new(config: &'a PageConfig, urls: &'a SiteUrls, page_url: &'a str) -> Self {
        let folder_property = config
            .faux_folder
            .toggle
            .then_some(config.faux_folder.folder_property.as_str())
            .filter(|p| !p.trim().is_empty());

        Self {
            page_url,
            profile_property: &config.profile_property,
            trait_types: config.trait_types(),
            trait_separator: &config.trait_separator,
            folder_property,
            urls,
            traits_url: urls.page_url(TRAITS_PAGE),
            inventories_url: urls.page_url(INVENTORIES_PAGE),
        }
    }
}

/// Enrich one record in place. Returns the same record for chaining.
pub fn enrich<'r>(record: &'r mut Record, ctx: &EnrichContext<'_>) -> DexResult<&'r mut Record> {
    if let Some(id) = record.present(ctx.profile_property) {
        let link = ctx.urls.profile_url(ctx.page_url, &id);
        record.set_derived(PROFILE_ID, id)?;
        record.set_derived(PROFILE_LINK, link)?;
    }

    if let Some(rarity) = record.present("rarity") {
        let badge = format!(
            "<span class=\"badge badge-{}\">{}</span>",
            scrub(&rarity),
            html_escape(&rarity)
        );
        record.set_derived(RARITY_BADGE, badge)?;
    }

    if let Some(owner) = record.present("owner") {
        let link = ctx.urls.profile_url(&ctx.inventories_url, &owner);
        record.set_derived(OWNER_LINK, link)?;
    }

    if let Some(designer) = record.present("designer") {
        record.set_derived(DESIGNER_LINK, ctx.urls.external_profile(&scrub(&designer)))?;
    }

    if let Some(artist) = record.present("artist") {
        record.set_derived(ARTIST_LINK, ctx.urls.external_profile(&scrub(&artist)))?;
    }

    if let Some(folder_property) = ctx.folder_property
        && let Some(folder) = record.present(folder_property)
    {
        let link = with_query(
            ctx.page_url,
            &PageParameters::from_pairs([(folder_property, folder.as_str())]),
        );
        record.set_derived(FOLDER_LINK, link)?;
    }

    for trait_type in &ctx.trait_types {
        let Some(value) = record.present(trait_type) else {
            continue;
        };
        let links = trait_links(&value, &ctx.traits_url, ctx.trait_separator);
        if links.is_empty() {
            continue;
        }
        record.set_derived(&format!("{trait_type}link"), links)?;
    }

    Ok(record)
}

/// Enrich every record of a collection.
pub fn enrich_all(records: &mut [Record], ctx: &EnrichContext<'_>) -> DexResult<()> {
    for record in records.iter_mut() {
        enrich(record, ctx)?;
    }
    Ok(())
}

/// Build the joined anchor list for one comma-separated trait value.
pub fn trait_links(value: &str, traits_url: &str, separator: &str) -> String {
    split_segments(value)
        .map(|segment| {
            let token = trait_token(segment);
            format!(
                "<a href=\"{}\">{}</a>",
                html_escape(&with_query(
                    traits_url,
                    &PageParameters::from_pairs([("profile", token.as_str())])
                )),
                html_escape(segment)
            )
        })
        .collect::<Vec<_>>()
        .join(separator)
}
