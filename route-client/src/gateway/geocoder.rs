//! Debounced location search.
//!
//! Each keystroke becomes a request id; the network call only fires once
//! the debounce delay has elapsed with the id still current, and the
//! response is only delivered if the id is still current on arrival. A
//! superseded request's network call is not aborted; its response is
//! dropped at the id check.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::client::RoutingClient;
use super::error::GatewayError;
use super::types::LocationHit;

/// The location-search surface the geocoder talks to.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<LocationHit>, GatewayError>> + Send;
}

impl SearchBackend for RoutingClient {
    async fn search(&self, query: &str) -> Result<Vec<LocationHit>, GatewayError> {
        RoutingClient::search(self, query).await
    }
}

/// Debounce behaviour.
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// Delay between the last keystroke and the network call.
    pub delay: Duration,
    /// Queries shorter than this never fire.
    pub min_chars: usize,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(200),
            min_chars: 2,
        }
    }
}

type HitHandler = Arc<dyn Fn(&str, Vec<LocationHit>) + Send + Sync>;

/// Debounced autocomplete geocoder.
pub struct Geocoder<B> {
    backend: Arc<B>,
    config: DebounceConfig,
    on_hits: HitHandler,
    /// Id of the most recently issued request; anything older is stale.
    request_id: AtomicU64,
    /// Last query text, to skip duplicate consecutive requests.
    last_query: Mutex<String>,
}

impl<B: SearchBackend> Geocoder<B> {
    pub fn new(
        backend: Arc<B>,
        config: DebounceConfig,
        on_hits: impl Fn(&str, Vec<LocationHit>) + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            backend,
            config,
            on_hits: Arc::new(on_hits),
            request_id: AtomicU64::new(0),
            last_query: Mutex::new(String::new()),
        })
    }

    /// Request hits for a query, debounced.
    ///
    /// Identical consecutive queries are skipped entirely. A new query
    /// invalidates any pending earlier one, whether it is still waiting
    /// out the delay or already on the wire.
    pub fn request(self: &Arc<Self>, query: &str) -> Option<tokio::task::JoinHandle<()>> {
        {
            let mut last = self.last_query.lock().expect("query memo poisoned");
            if *last == query {
                return None;
            }
            *last = query.to_string();
        }

        let id = self.next_id();
        if query.chars().count() < self.config.min_chars {
            return None;
        }

        let geocoder = Arc::clone(self);
        let query = query.to_string();
        Some(tokio::spawn(async move {
            geocoder.run(id, query).await;
        }))
    }

    /// Invalidate any pending request and clear the duplicate-query memo,
    /// so the same text can be queried again.
    pub fn cancel(&self) {
        self.next_id();
        self.last_query
            .lock()
            .expect("query memo poisoned")
            .clear();
    }

    async fn run(&self, id: u64, query: String) {
        tokio::time::sleep(self.config.delay).await;
        if self.request_id.load(Ordering::SeqCst) != id {
            // Superseded while waiting out the debounce; never fires.
            return;
        }

        match self.backend.search(&query).await {
            Ok(hits) => {
                if self.request_id.load(Ordering::SeqCst) == id {
                    (self.on_hits)(&query, hits);
                }
            }
            Err(error) => {
                tracing::warn!(%error, query, "geocoding request failed");
                // Deliver an empty result so stale suggestions are cleared.
                if self.request_id.load(Ordering::SeqCst) == id {
                    (self.on_hits)(&query, Vec::new());
                }
            }
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst) + 1
    }
}
