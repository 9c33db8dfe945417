//! Site URL resolution.

use super::params::{PROFILE_KEY, PageParameters, with_query};

/// Default base for designer/artist profile links.
pub const DEFAULT_EXTERNAL_PROFILE_BASE: &str = "https://toyhou.se";

/// Resolves page ids to URLs.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base: String,
    external_profile_base: String,
}

impl SiteUrls {
    /// Create a resolver rooted at `base` (e.g. `https://example.com` or `""`
    /// for root-relative links).
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().trim_end_matches('/').to_string(),
            external_profile_base: DEFAULT_EXTERNAL_PROFILE_BASE.to_string(),
        }
    }

    /// Override the base used for designer/artist links.
    pub fn with_external_profile_base(mut self, base: impl Into<String>) -> Self {
        self.external_profile_base = base.into().trim_end_matches('/').to_string();
        self
    }

    /// URL of a site page.
    pub fn page_url(&self, page_id: &str) -> String {
        format!("{}/{}.html", self.base, page_id)
    }

    /// URL of a record's profile on a page.
    pub fn profile_url(&self, page_url: &str, profile: &str) -> String {
        with_query(page_url, &PageParameters::from_pairs([(PROFILE_KEY, profile)]))
    }

    /// External profile link for a user handle.
    pub fn external_profile(&self, handle: &str) -> String {
        format!("{}/{}", self.external_profile_base, handle)
    }
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn page_url_trims_trailing_slash() {
        let urls = SiteUrls::new("https://faenoir.example/");
        assert_eq!(urls.page_url("masterlist"), "https://faenoir.example/masterlist.html");
    }

    #[test]
    fn root_relative_by_default() {
        assert_eq!(SiteUrls::default().page_url("traits"), "/traits.html");
    }

    #[test]
    fn profile_url_encodes_value() {
        let urls = SiteUrls::default();
        assert_eq!(
            urls.profile_url("/masterlist.html", "FAE 001"),
            "/masterlist.html?profile=FAE+001"
        );
    }

    #[test]
    fn external_profile_uses_override() {
        let urls = SiteUrls::default().with_external_profile_base("https://art.example/");
        assert_eq!(urls.external_profile("kit"), "https://art.example/kit");
        assert_eq!(SiteUrls::default().external_profile("kit"), "https://toyhou.se/kit");
    }
}
