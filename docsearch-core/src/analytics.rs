//! Fire-and-forget analytics for search execution and result activation.
//!
//! Sinks must never block the caller or report failure back to it.

use std::sync::Arc;

use compact_str::CompactString;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    SearchExecuted {
        query: CompactString,
    },
    ResultActivated {
        query: CompactString,
        index: usize,
        total: usize,
        rank: f64,
    },
}

/// `(total - index) / total`; `None` when there is nothing to rank against.
#[must_use]
pub fn rank_score(index: usize, total: usize) -> Option<f64> {
    if total == 0 || index >= total {
        return None;
    }
    Some((total - index) as f64 / total as f64)
}

pub trait AnalyticsSink: Send + Sync {
    fn emit(&self, event: AnalyticsEvent);
}

/// Writes events to the log.
#[derive(Debug, Default)]
pub struct TracingAnalytics;

impl AnalyticsSink for TracingAnalytics {
    fn emit(&self, event: AnalyticsEvent) {
        match &event {
            AnalyticsEvent::SearchExecuted { query } => {
                info!(marker = "ANALYTICS", kind = "search_executed", %query, "search executed");
            }
            AnalyticsEvent::ResultActivated {
                query,
                index,
                total,
                rank,
            } => {
                info!(
                    marker = "ANALYTICS",
                    kind = "result_activated",
                    %query,
                    index,
                    total,
                    rank,
                    "result activated"
                );
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Default)]
pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn emit(&self, _event: AnalyticsEvent) {}
}

/// POSTs each event as JSON from a detached task.
pub struct HttpAnalytics {
    client: Client,
    endpoint: Arc<str>,
}

impl HttpAnalytics {
    #[must_use]
    pub fn new(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

impl AnalyticsSink for HttpAnalytics {
    fn emit(&self, event: AnalyticsEvent) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("analytics dropped: no runtime");
            return;
        };

        let client = self.client.clone();
        let endpoint = Arc::clone(&self.endpoint);
        runtime.spawn(async move {
            match client.post(&*endpoint).json(&event).send().await {
                Ok(resp) if !resp.status().is_success() => {
                    debug!("analytics sink answered {}", resp.status());
                }
                Ok(_) => {}
                Err(e) => debug!("analytics sink unreachable: {}", e),
            }
        });
    }
}

/// Builds events from controller state and forwards them to the sink.
#[derive(Clone)]
pub struct AnalyticsEmitter {
    sink: Arc<dyn AnalyticsSink>,
}

impl AnalyticsEmitter {
    #[must_use]
    pub fn new(sink: Arc<dyn AnalyticsSink>) -> Self {
        Self { sink }
    }

    pub fn search_executed(&self, query: &str) {
        self.sink.emit(AnalyticsEvent::SearchExecuted {
            query: query.into(),
        });
    }

    /// Emits nothing when `index` is outside `total`.
    pub fn result_activated(&self, query: &str, index: usize, total: usize) {
        let Some(rank) = rank_score(index, total) else {
            debug!("activation {}/{} not ranked, skipping", index, total);
            return;
        };
        self.sink.emit(AnalyticsEvent::ResultActivated {
            query: query.into(),
            index,
            total,
            rank,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<AnalyticsEvent>>);

    impl AnalyticsSink for Recording {
        fn emit(&self, event: AnalyticsEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn test_rank_bounds_and_monotonicity() {
        assert_eq!(rank_score(0, 5), Some(1.0));
        assert_eq!(rank_score(4, 5), Some(1.0 / 5.0));
        assert_eq!(rank_score(5, 5), None);
        assert_eq!(rank_score(0, 0), None);

        let ranks: Vec<f64> = (0..7).filter_map(|i| rank_score(i, 7)).collect();
        assert!(ranks.windows(2).all(|w| w[0] > w[1]));
        assert!(ranks.iter().all(|r| *r > 0.0));
    }

    #[test]
    fn test_emitter_builds_events() {
        let sink = Arc::new(Recording::default());
        let emitter = AnalyticsEmitter::new(sink.clone());

        emitter.search_executed("install");
        emitter.result_activated("install", 1, 4);
        emitter.result_activated("install", 9, 4);

        let events = sink.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[1],
            AnalyticsEvent::ResultActivated {
                query: "install".into(),
                index: 1,
                total: 4,
                rank: 0.75,
            }
        );
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_value(AnalyticsEvent::ResultActivated {
            query: "cli".into(),
            index: 0,
            total: 2,
            rank: 1.0,
        })
        .unwrap();
        assert_eq!(json["kind"], "result_activated");
        assert_eq!(json["total"], 2);
    }

    #[test]
    fn test_http_sink_without_runtime_is_silent() {
        let sink = HttpAnalytics::new(Client::new(), "http://127.0.0.1:9/collect");
        sink.emit(AnalyticsEvent::SearchExecuted { query: "x".into() });
    }
}
