//! Aggregate state of one search controller instance.
//!
//! All mutation goes through the methods here so the selection is reset on
//! every result-set change, whichever path produced the change.

use compact_str::CompactString;

use crate::model::{
    query_state::QueryState,
    result_store::{ResultSet, ResultStore},
    selection::Selection,
};

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    SearchField,
    #[default]
    Elsewhere,
}

impl Focus {
    /// Printable keys are typed into the field rather than routed.
    #[must_use]
    pub const fn holds_text_input(self) -> bool {
        matches!(self, Self::SearchField)
    }
}

/// What the keyboard router may look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterView {
    pub focus: Focus,
    pub has_hits: bool,
    pub active_index: usize,
}

/// Immutable data handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSnapshot {
    pub query: CompactString,
    pub loading: bool,
    pub results: ResultSet,
    pub active_index: usize,
    pub focus: Focus,
    pub is_overlay: bool,
    pub href: Option<String>,
}

pub struct SearchState {
    pub query: QueryState,
    store: ResultStore,
    selection: Selection,
    pub focus: Focus,
    pub is_overlay: bool,
}

impl SearchState {
    #[must_use]
    pub fn new(query: QueryState, is_overlay: bool) -> Self {
        Self {
            query,
            store: ResultStore::default(),
            selection: Selection::default(),
            focus: Focus::default(),
            is_overlay,
        }
    }

    #[must_use]
    pub fn results(&self) -> &ResultSet {
        self.store.results()
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selection and result set borrowed together for transitions.
    pub fn selection_mut(&mut self) -> (&mut Selection, &ResultSet) {
        (&mut self.selection, self.store.results())
    }

    pub fn begin_loading(&mut self) {
        self.store.begin_loading();
    }

    /// Land a completed search; the selection returns to the input slot.
    pub fn apply_results(&mut self, results: ResultSet) {
        self.store.complete(results);
        self.selection.reset();
    }

    /// Result set back to `NoQuery`; query untouched.
    pub fn clear_results(&mut self) {
        self.store.clear();
        self.selection.reset();
    }

    /// Escape / overlay close: empty query, no results, input slot.
    pub fn reset(&mut self) {
        self.query.clear();
        self.clear_results();
    }

    #[must_use]
    pub fn router_view(&self) -> RouterView {
        RouterView {
            focus: self.focus,
            has_hits: self.results().hit_count() > 0,
            active_index: self.selection.active(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            query: self.query.text().clone(),
            loading: self.store.is_loading(),
            results: self.store.results().clone(),
            active_index: self.selection.active(),
            focus: self.focus,
            is_overlay: self.is_overlay,
            href: self.query.href(),
        }
    }
}
