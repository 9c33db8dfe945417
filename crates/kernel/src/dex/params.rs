//! Page query parameters.
//!
//! The page URL's query string carries the profile being viewed, the
//! requested page, the search term and any field constraints. Everything
//! that is not one of the reserved keys narrows the gallery.

/// Selects a single record for the profile view.
pub const PROFILE_KEY: &str = "profile";
/// Requested gallery page (1-based).
pub const PAGE_KEY: &str = "page";
/// Free-text search term.
pub const SEARCH_KEY: &str = "search";
/// Field picked for free-text search.
pub const SEARCH_FIELD_KEY: &str = "searchfield";

const RESERVED_KEYS: &[&str] = &[PROFILE_KEY, PAGE_KEY, SEARCH_KEY, SEARCH_FIELD_KEY];

/// Ordered key/value pairs from a page's query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParameters {
    pairs: Vec<(String, String)>,
}

impl PageParameters {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string. A leading `?` is ignored.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        Self { pairs }
    }

    /// Build from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// First value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Profile being requested, if any.
    pub fn profile(&self) -> Option<&str> {
        self.get(PROFILE_KEY).filter(|v| !v.trim().is_empty())
    }

    /// Requested page number. Unparseable values are ignored.
    pub fn page(&self) -> Option<usize> {
        self.get(PAGE_KEY).and_then(|v| v.trim().parse().ok())
    }

    /// Search term, if non-blank.
    pub fn search(&self) -> Option<&str> {
        self.get(SEARCH_KEY)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Field selected for search, if non-blank.
    pub fn search_field(&self) -> Option<&str> {
        self.get(SEARCH_FIELD_KEY)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Field constraints: every non-reserved key with a non-blank value.
    pub fn constraints(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .filter(|(k, v)| !RESERVED_KEYS.contains(&k.as_str()) && !v.trim().is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy with `key` set to `value`, replacing earlier values.
    pub fn with(&self, key: &str, value: &str) -> Self {
        let mut pairs: Vec<_> = self
            .pairs
            .iter()
            .filter(|(k, _)| k != key)
            .cloned()
            .collect();
        pairs.push((key.to_string(), value.to_string()));
        Self { pairs }
    }

    /// Copy without `key`.
    pub fn without(&self, key: &str) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| k != key)
                .cloned()
                .collect(),
        }
    }

    /// Encode back into a query string (no leading `?`).
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Append a query string to a URL.
pub fn with_query(url: &str, params: &PageParameters) -> String {
    if params.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{}", params.to_query_string())
    }
}
