//! src/controller/dispatcher.rs
//! ============================================================================
//! # Debounced Fetch Dispatcher
//!
//! Turns a stream of query edits into at most one request per settle window
//! and guarantees that only the most recently issued request can land.
//!
//! Every dispatch bumps a generation counter. Completions carry the
//! generation they were issued under; anything older than the current
//! generation is dropped on arrival, whatever order responses come back in.
//! Fetch failures stop here: callers only ever see a `ResultSet`.

use std::sync::Arc;

use compact_str::CompactString;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    model::result_store::ResultSet,
    tasks::search_task::{FetchOutcome, SearchBackend, SearchContext, SearchRequest, search_task},
    util::debounce::{DebounceConfig, Debounced, Debouncer},
};

/// What a dispatch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Empty query: results cleared, no request issued.
    Cleared,
    /// Request issued under this generation.
    Requested(u64),
}

/// Something the controller has to react to.
#[derive(Debug)]
pub enum DispatcherEvent {
    /// A query survived its settle window.
    Settled(CompactString),
    /// A fetch finished.
    Completed(FetchOutcome),
}

/// A completion that is still current, with failures already collapsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Landed {
    pub query: CompactString,
    pub results: ResultSet,
}

pub struct FetchDispatcher {
    backend: Arc<dyn SearchBackend>,
    context: SearchContext,

    debouncer: Debouncer<CompactString>,
    debounce_rx: mpsc::UnboundedReceiver<Debounced<CompactString>>,

    task_tx: mpsc::UnboundedSender<FetchOutcome>,
    task_rx: mpsc::UnboundedReceiver<FetchOutcome>,

    generation: u64,
    in_flight: bool,
}

impl FetchDispatcher {
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>, context: SearchContext, cfg: DebounceConfig) -> Self {
        let (debouncer, debounce_rx) = Debouncer::new(cfg);
        let (task_tx, task_rx) = mpsc::unbounded_channel();

        Self {
            backend,
            context,
            debouncer,
            debounce_rx,
            task_tx,
            task_rx,
            generation: 0,
            in_flight: false,
        }
    }

    /// Restart the settle window with `query` as the trailing value.
    pub fn schedule(&mut self, query: CompactString) {
        self.debouncer.submit(query);
    }

    /// Issue `query` now. Supersedes whatever is pending or in flight.
    pub fn dispatch(&mut self, query: &str) -> Dispatch {
        self.debouncer.cancel();
        self.generation += 1;

        if query.is_empty() {
            debug!("dispatch #{}: empty query, clearing", self.generation);
            self.in_flight = false;
            return Dispatch::Cleared;
        }

        let request = SearchRequest {
            context: self.context.clone(),
            query: query.into(),
        };
        debug!("dispatch #{}: '{}'", self.generation, query);
        search_task(
            self.generation,
            request,
            Arc::clone(&self.backend),
            self.task_tx.clone(),
        );
        self.in_flight = true;
        Dispatch::Requested(self.generation)
    }

    /// Drop any pending tick and orphan the request in flight.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
        self.generation += 1;
        self.in_flight = false;
    }

    /// Wait for the next settled query or completed fetch.
    ///
    /// Stale debounce ticks are skipped here; stale completions are
    /// returned and must be filtered through [`Self::land`].
    pub async fn next_event(&mut self) -> Option<DispatcherEvent> {
        loop {
            tokio::select! {
                biased;

                Some(outcome) = self.task_rx.recv() => {
                    return Some(DispatcherEvent::Completed(outcome));
                }
                Some(tick) = self.debounce_rx.recv() => {
                    if self.debouncer.is_current(tick.seq) {
                        return Some(DispatcherEvent::Settled(tick.value));
                    }
                    debug!("dropping stale debounce tick #{}", tick.seq);
                }
                else => return None,
            }
        }
    }

    /// Accept a completion if it is still current, collapsing failures to `Empty`.
    pub fn land(&mut self, outcome: FetchOutcome) -> Option<Landed> {
        if outcome.generation != self.generation {
            debug!(
                "dropping superseded response #{} for '{}' (current #{})",
                outcome.generation, outcome.query, self.generation
            );
            return None;
        }

        self.in_flight = false;
        debug!(
            "landing #{} '{}' after {:?}",
            outcome.generation, outcome.query, outcome.elapsed
        );
        let results = match outcome.result {
            Ok(hits) => ResultSet::from_hits(hits),
            Err(e) => {
                warn!("search for '{}' failed, showing no results: {}", outcome.query, e);
                ResultSet::Empty
            }
        };

        Some(Landed {
            query: outcome.query,
            results,
        })
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::result_store::SearchHit;
    use crate::tasks::search_task::FetchError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl SearchBackend for Echo {
        async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, FetchError> {
            match request.query.as_str() {
                "broken" => Err(FetchError::Decode(
                    serde_json::from_str::<Vec<SearchHit>>("{").unwrap_err(),
                )),
                "nothing" => Ok(vec![]),
                q => Ok(vec![SearchHit {
                    url: format!("/{q}"),
                    breadcrumbs: String::new(),
                    heading: String::new(),
                    title: String::new(),
                    content: String::new(),
                }]),
            }
        }
    }

    fn dispatcher() -> FetchDispatcher {
        FetchDispatcher::new(
            Arc::new(Echo),
            SearchContext {
                language: "en".into(),
                version: "latest".into(),
            },
            DebounceConfig::with_delay(Duration::from_millis(200)),
        )
    }

    async fn completed(d: &mut FetchDispatcher) -> FetchOutcome {
        match d.next_event().await {
            Some(DispatcherEvent::Completed(outcome)) => outcome,
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_schedule_settles_last_value() {
        let mut d = dispatcher();
        d.schedule("ca".into());
        d.schedule("cat".into());

        match d.next_event().await {
            Some(DispatcherEvent::Settled(q)) => assert_eq!(q, "cat"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_dispatch_issues_nothing() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch(""), Dispatch::Cleared);
        assert!(!d.is_in_flight());
    }

    #[tokio::test]
    async fn test_failures_collapse_to_empty() {
        let mut d = dispatcher();

        for query in ["broken", "nothing"] {
            d.dispatch(query);
            let outcome = completed(&mut d).await;
            let landed = d.land(outcome).unwrap();
            assert_eq!(landed.results, ResultSet::Empty);
        }
    }

    #[tokio::test]
    async fn test_superseded_completion_is_dropped() {
        let mut d = dispatcher();
        assert_eq!(d.dispatch("first"), Dispatch::Requested(1));
        let first = completed(&mut d).await;

        assert_eq!(d.dispatch("second"), Dispatch::Requested(2));
        assert!(d.land(first).is_none());
        assert!(d.is_in_flight());

        let outcome = completed(&mut d).await;
        let second = d.land(outcome).unwrap();
        assert_eq!(second.query, "second");
        assert_eq!(second.results.hit_count(), 1);
        assert!(!d.is_in_flight());
    }

    #[tokio::test]
    async fn test_cancel_orphans_in_flight_request() {
        let mut d = dispatcher();
        d.dispatch("orphan");
        d.cancel();
        let outcome = completed(&mut d).await;
        assert!(d.land(outcome).is_none());
    }
}
