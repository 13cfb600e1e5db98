//! Authoritative query text, optionally mirrored into the page URL.

use compact_str::CompactString;
use tracing::debug;

use crate::util::location::Location;

/// Queries longer than this are truncated.
pub const MAX_QUERY_LEN: usize = 512;

/// Name of the URL parameter holding the query.
pub const QUERY_PARAM: &str = "query";

/// Trim, cut to at most `max_len` characters, then trim the cut end again.
#[must_use]
pub fn normalize_query(text: &str, max_len: usize) -> CompactString {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_len) {
        Some((cut, _)) => CompactString::from(trimmed[..cut].trim_end()),
        None => CompactString::from(trimmed),
    }
}

pub struct QueryState {
    text: CompactString,
    max_len: usize,
    url_sync: Option<Box<dyn Location>>,
}

impl QueryState {
    /// `max_len` is capped at [`MAX_QUERY_LEN`].
    #[must_use]
    pub fn new(max_len: usize) -> Self {
        Self {
            text: CompactString::default(),
            max_len: max_len.min(MAX_QUERY_LEN),
            url_sync: None,
        }
    }

    /// Enable URL synchronization against `location`.
    #[must_use]
    pub fn with_url_sync(mut self, location: Box<dyn Location>) -> Self {
        self.url_sync = Some(location);
        self
    }

    /// Seed the query from the location's `query` parameter.
    ///
    /// Returns true when a non-empty query was hydrated.
    pub fn hydrate(&mut self) -> bool {
        let Some(raw) = self
            .url_sync
            .as_ref()
            .and_then(|loc| loc.query_param(QUERY_PARAM))
        else {
            return false;
        };

        self.set(&raw);
        debug!("hydrated query '{}' from location", self.text);
        !self.text.is_empty()
    }

    /// Store a new query and rewrite the URL parameter in place.
    pub fn set(&mut self, text: &str) {
        self.text = normalize_query(text, self.max_len);

        if let Some(loc) = self.url_sync.as_mut() {
            let value = (!self.text.is_empty()).then_some(self.text.as_str());
            loc.replace_query_param(QUERY_PARAM, value);
        }
    }

    pub fn clear(&mut self) {
        self.set("");
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn text(&self) -> &CompactString {
        &self.text
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Current location href, when URL sync is enabled.
    #[must_use]
    pub fn href(&self) -> Option<String> {
        self.url_sync.as_ref().map(|loc| loc.href())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::location::PageLocation;

    #[test]
    fn test_normalize_trims_and_truncates() {
        assert_eq!(normalize_query("  install  ", MAX_QUERY_LEN), "install");
        assert_eq!(normalize_query(" \t\n ", MAX_QUERY_LEN), "");

        let long = "é".repeat(600);
        let cut = normalize_query(&long, MAX_QUERY_LEN);
        assert_eq!(cut.chars().count(), 512);
    }

    #[test]
    fn test_cut_after_space_is_trimmed() {
        let q = normalize_query(&format!("{} b", "a".repeat(511)), MAX_QUERY_LEN);
        assert_eq!(q.as_str(), q.trim());
        assert_eq!(q.chars().count(), 511);
    }

    #[test]
    fn test_max_len_is_capped() {
        let mut q = QueryState::new(4096);
        q.set(&"x".repeat(1000));
        assert_eq!(q.as_str().chars().count(), MAX_QUERY_LEN);

        let mut short = QueryState::new(3);
        short.set("abcdef");
        assert_eq!(short.as_str(), "abc");
    }

    #[test]
    fn test_set_rewrites_url_in_place() {
        let mut q = QueryState::new(MAX_QUERY_LEN)
            .with_url_sync(Box::new(PageLocation::parse("/docs?lang=en")));

        q.set(" getting started ");
        assert_eq!(q.as_str(), "getting started");
        assert_eq!(q.href().unwrap(), "/docs?lang=en&query=getting%20started");

        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.href().unwrap(), "/docs?lang=en");
    }

    #[test]
    fn test_hydrate_from_location() {
        let mut q = QueryState::new(MAX_QUERY_LEN)
            .with_url_sync(Box::new(PageLocation::parse("/docs?query=%20routing%20")));
        assert!(q.hydrate());
        assert_eq!(q.as_str(), "routing");

        let mut none = QueryState::new(MAX_QUERY_LEN)
            .with_url_sync(Box::new(PageLocation::parse("/docs")));
        assert!(!none.hydrate());

        let mut unsynced = QueryState::new(MAX_QUERY_LEN);
        assert!(!unsynced.hydrate());
        assert_eq!(unsynced.href(), None);
    }
}
