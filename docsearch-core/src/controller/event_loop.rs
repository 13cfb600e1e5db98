//! src/controller/event_loop.rs
//! ============================================================================
//! # SearchController: single-owner search interaction state machine
//!
//! Owns query, results, loading flag and selection, and is the only place
//! they change. Input handlers (`on_input`, `on_key`, `on_hover`,
//! `on_click`, `close`) run synchronously; the only suspension point is
//! `next_event`, which waits for a settled query or a finished fetch.
//!
//! Key routing always reads the live state through `SearchState::router_view`
//! at the moment the key arrives.

use std::sync::Arc;

use crossterm::event::KeyEvent;
use tracing::{debug, info};

use crate::{
    analytics::{AnalyticsEmitter, AnalyticsSink},
    controller::{
        actions::Action,
        dispatcher::{Dispatch, DispatcherEvent, FetchDispatcher},
        keyboard_router::{KeyOutcome, KeyboardRouter},
        navigation::Navigator,
    },
    model::{
        query_state::QueryState,
        result_store::ResultSet,
        search_state::{Focus, SearchSnapshot, SearchState},
        selection::Transition,
    },
    tasks::search_task::{SearchBackend, SearchContext},
    util::{debounce::DebounceConfig, location::Location},
};

/// Collaborators and settings for one controller instance.
pub struct ControllerParts {
    pub backend: Arc<dyn SearchBackend>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub navigator: Arc<dyn Navigator>,
    /// `Some` enables URL synchronization.
    pub location: Option<Box<dyn Location>>,
    pub context: SearchContext,
    pub debounce: DebounceConfig,
    pub max_query_len: usize,
    pub is_overlay: bool,
}

pub struct SearchController {
    state: SearchState,
    dispatcher: FetchDispatcher,
    analytics: AnalyticsEmitter,
    navigator: Arc<dyn Navigator>,
    router: KeyboardRouter,
}

impl SearchController {
    #[must_use]
    pub fn new(parts: ControllerParts) -> Self {
        let mut query = QueryState::new(parts.max_query_len);
        if let Some(location) = parts.location {
            query = query.with_url_sync(location);
        }

        Self {
            state: SearchState::new(query, parts.is_overlay),
            dispatcher: FetchDispatcher::new(parts.backend, parts.context, parts.debounce),
            analytics: AnalyticsEmitter::new(parts.analytics),
            navigator: parts.navigator,
            router: KeyboardRouter::new(),
        }
    }

    /// Hydrate from the URL and, if a query was found, search right away.
    pub fn mount(&mut self) {
        if self.state.query.hydrate() {
            let query = self.state.query.text().clone();
            info!("mounted with query '{}'", query);
            self.dispatch(&query);
        }
    }

    /// Text field changed.
    pub fn on_input(&mut self, text: &str) {
        self.state.query.set(text);
        self.dispatcher.schedule(self.state.query.text().clone());
    }

    /// Route a key against the current state and apply what it maps to.
    ///
    /// For arrow keys the selection transition decides: eligible moves
    /// prevent the default, ineligible ones leave the key unhandled.
    pub fn on_key(&mut self, key_event: KeyEvent) -> KeyOutcome {
        let outcome = self.router.route(key_event, self.state.router_view());
        let Some(action) = outcome.action.clone() else {
            return outcome;
        };

        match self.apply(action) {
            Some(transition) if transition.is_eligible() => outcome.prevent_default(),
            Some(_) => KeyOutcome::ignored(),
            None => outcome,
        }
    }

    pub fn on_hover(&mut self, index: usize) {
        self.apply(Action::HoverResult(index));
    }

    pub fn on_click(&mut self, index: usize) {
        self.apply(Action::ActivateResult(index));
    }

    /// Clear query and results; pending and in-flight searches are dropped.
    pub fn close(&mut self) {
        debug!("closing search");
        self.dispatcher.cancel();
        self.state.reset();
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.state.focus = focus;
    }

    /// Returns the selection transition for arrow moves, `None` otherwise.
    pub fn apply(&mut self, action: Action) -> Option<Transition> {
        match action {
            Action::FocusSearch => self.state.focus = Focus::SearchField,
            Action::Close => self.close(),
            Action::MoveSelectionDown => {
                let (selection, results) = self.state.selection_mut();
                return Some(selection.move_down(results));
            }
            Action::MoveSelectionUp => {
                let (selection, results) = self.state.selection_mut();
                return Some(selection.move_up(results));
            }
            Action::HoverResult(index) => {
                let (selection, results) = self.state.selection_mut();
                selection.hover(index, results);
            }
            Action::ActivateResult(index) => {
                if let Some(url) = self.state.results().get(index).map(|hit| hit.url.clone()) {
                    self.activate_result(&url, index);
                }
            }
        }
        None
    }

    /// Report the activation, then leave the page for `url`.
    pub fn activate_result(&mut self, url: &str, index: usize) {
        if let ResultSet::Hits(hits) = self.state.results() {
            self.analytics
                .result_activated(self.state.query.as_str(), index, hits.len());
        }
        self.navigator.navigate(url);
    }

    /// Wait for the next settled query or finished fetch.
    pub async fn next_event(&mut self) -> Option<DispatcherEvent> {
        self.dispatcher.next_event().await
    }

    pub fn handle(&mut self, event: DispatcherEvent) {
        match event {
            DispatcherEvent::Settled(query) => self.dispatch(&query),
            DispatcherEvent::Completed(outcome) => {
                if let Some(landed) = self.dispatcher.land(outcome) {
                    self.state.apply_results(landed.results);
                    self.analytics.search_executed(&landed.query);
                }
            }
        }
    }

    /// `next_event` + `handle`; false once no more events can arrive.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.handle(event);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self, query: &str) {
        match self.dispatcher.dispatch(query) {
            Dispatch::Cleared => self.state.clear_results(),
            Dispatch::Requested(_) => self.state.begin_loading(),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SearchState {
        &self.state
    }

    #[must_use]
    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.snapshot()
    }
}
