//! Text normalization helpers shared by the enricher, filters and templates.

/// Normalize text into a link-safe identifier.
///
/// Lower-cases the input and keeps ASCII alphanumerics, `-` and `_`.
/// Everything else (whitespace, punctuation, non-ASCII) is dropped.
pub fn scrub(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Token used in trait links: lower-cased with all whitespace removed.
pub fn trait_token(segment: &str) -> String {
    segment
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Split a comma-separated attribute value into trimmed, non-empty segments.
pub fn split_segments(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Case-insensitive, whitespace-trimmed equality.
pub fn loose_eq(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn scrub_drops_punctuation_and_spaces() {
        assert_eq!(scrub("Very Rare!"), "veryrare");
        assert_eq!(scrub("Some_User-01"), "some_user-01");
        assert_eq!(scrub(""), "");
    }

    #[test]
    fn trait_token_strips_all_whitespace() {
        assert_eq!(trait_token("Floppy Ears"), "floppyears");
        assert_eq!(trait_token(" Red\tTail "), "redtail");
    }

    #[test]
    fn split_segments_skips_empty() {
        let parts: Vec<_> = split_segments("Red, blue ,  ").collect();
        assert_eq!(parts, vec!["Red", "blue"]);
        assert_eq!(split_segments(" , ,").count(), 0);
    }

    #[test]
    fn html_escape_basic() {
        assert_eq!(
            html_escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
    }

    #[test]
    fn loose_eq_ignores_case_and_padding() {
        assert!(loose_eq(" Common", "common "));
        assert!(!loose_eq("common", "rare"));
    }
}
