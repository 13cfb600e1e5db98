//! Outcome of the most recent applied search, plus the loading flag.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row returned by the search endpoint.
///
/// Everything except `url` is pre-rendered markup from the backend and is
/// displayed as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub breadcrumbs: String,
    pub heading: String,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultSet {
    /// No search performed yet (or the query was cleared)
    #[default]
    NoQuery,
    /// Search performed, zero hits
    Empty,
    Hits(Arc<[SearchHit]>),
}

impl ResultSet {
    /// `Hits` for a non-empty list, `Empty` otherwise.
    #[must_use]
    pub fn from_hits(hits: Vec<SearchHit>) -> Self {
        if hits.is_empty() {
            Self::Empty
        } else {
            Self::Hits(hits.into())
        }
    }

    /// N: number of hits, 0 unless `Hits`.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        match self {
            Self::Hits(hits) => hits.len(),
            Self::NoQuery | Self::Empty => 0,
        }
    }

    #[must_use]
    pub fn hits(&self) -> &[SearchHit] {
        match self {
            Self::Hits(hits) => &hits[..],
            Self::NoQuery | Self::Empty => &[],
        }
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SearchHit> {
        self.hits().get(index)
    }

    #[must_use]
    pub const fn is_hits(&self) -> bool {
        matches!(self, Self::Hits(_))
    }
}

#[derive(Debug, Default)]
pub struct ResultStore {
    results: ResultSet,
    loading: bool,
}

impl ResultStore {
    #[must_use]
    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Apply a completed search and lower the loading flag.
    pub fn complete(&mut self, results: ResultSet) {
        debug!("result set -> {} hit(s)", results.hit_count());
        self.results = results;
        self.loading = false;
    }

    /// Back to `NoQuery`, nothing loading.
    pub fn clear(&mut self) {
        self.results = ResultSet::NoQuery;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            url: url.to_string(),
            breadcrumbs: String::new(),
            heading: String::new(),
            title: url.to_string(),
            content: String::new(),
        }
    }

    #[test]
    fn test_from_hits_maps_empty_list() {
        assert_eq!(ResultSet::from_hits(vec![]), ResultSet::Empty);

        let set = ResultSet::from_hits(vec![hit("/a"), hit("/b")]);
        assert!(set.is_hits());
        assert_eq!(set.hit_count(), 2);
        assert_eq!(set.get(1).unwrap().url, "/b");
        assert!(set.get(2).is_none());
    }

    #[test]
    fn test_store_loading_is_independent_of_results() {
        let mut store = ResultStore::default();
        store.complete(ResultSet::from_hits(vec![hit("/a")]));
        store.begin_loading();

        // stale hits stay visible while the next fetch loads
        assert!(store.is_loading());
        assert_eq!(store.results().hit_count(), 1);

        store.clear();
        assert!(!store.is_loading());
        assert_eq!(*store.results(), ResultSet::NoQuery);
    }

    #[test]
    fn test_hit_deserializes_from_endpoint_json() {
        let json = r#"[{"url":"/docs/install","breadcrumbs":"Docs &gt; Setup",
            "heading":"<mark>Install</mark>","title":"Installation","content":"Run it"}]"#;
        let hits: Vec<SearchHit> = serde_json::from_str(json).unwrap();
        assert_eq!(hits[0].heading, "<mark>Install</mark>");
    }
}
