//! ``src/tasks/search_task.rs``
//! ============================================================================
//! # Search Task: background request against the documentation search endpoint
//!
//! Spawns one async request per dispatch and reports the outcome, tagged with
//! the dispatch generation, back to the controller without blocking it.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use compact_str::CompactString;
use reqwest::Client;
use thiserror::Error;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, info};

use crate::model::result_store::SearchHit;

/// Page-derived context sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub language: CompactString,
    pub version: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub context: SearchContext,
    pub query: CompactString,
}

impl SearchRequest {
    /// `language=..&version=..&query=..`, percent-encoded.
    #[must_use]
    pub fn query_string(&self) -> String {
        format!(
            "language={}&version={}&query={}",
            urlencoding::encode(&self.context.language),
            urlencoding::encode(&self.context.version),
            urlencoding::encode(&self.query),
        )
    }
}

/// Why a search request produced no usable payload.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("search endpoint returned status {0}")]
    Status(u16),

    #[error("malformed search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("search request timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, FetchError>;
}

/// `GET {endpoint}?language=&version=&query=` returning a JSON array of hits.
pub struct HttpSearchBackend {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpSearchBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        Self::from_builder(Client::builder(), endpoint, timeout)
    }

    fn from_builder(
        builder: reqwest::ClientBuilder,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = builder
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    fn url_for(&self, request: &SearchRequest) -> String {
        let sep = if self.endpoint.contains('?') { '&' } else { '?' };
        format!("{}{sep}{}", self.endpoint, request.query_string())
    }

    fn map_transport(&self, e: &reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, FetchError> {
        let url = self.url_for(request);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.map_transport(&e))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Result of one dispatched request.
#[derive(Debug)]
pub struct FetchOutcome {
    pub generation: u64,
    pub query: CompactString,
    pub result: Result<Vec<SearchHit>, FetchError>,
    pub elapsed: Duration,
}

/// Spawn the request for `generation` and report back on `task_tx`.
pub fn search_task(
    generation: u64,
    request: SearchRequest,
    backend: Arc<dyn SearchBackend>,
    task_tx: UnboundedSender<FetchOutcome>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = Instant::now();
        let result = backend.search(&request).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(hits) => info!(
                "search #{} '{}' -> {} hit(s) in {:?}",
                generation,
                request.query,
                hits.len(),
                elapsed
            ),
            Err(e) => info!("search #{} '{}' failed: {}", generation, request.query, e),
        }

        // receiver gone means the controller unmounted
        let _ = task_tx.send(FetchOutcome {
            generation,
            query: request.query,
            result,
            elapsed,
        });
    })
}
