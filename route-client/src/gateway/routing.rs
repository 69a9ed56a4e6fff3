//! The routing gateway: issues route requests and reconciles out-of-order
//! completions.
//!
//! Requests are tagged with a monotonically increasing sequence number at
//! issuance. On settlement a response is applied only if its sequence is
//! greater than every sequence observed so far; otherwise it is dropped
//! silently. This is latest-issued-wins: a response from a request issued
//! later always takes precedence, irrespective of completion order. The
//! underlying network call of a superseded request is never aborted, its
//! result is simply ignored.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::client::RoutingClient;
use super::convert;
use super::error::GatewayError;
use super::types::{LegacyRouteResponse, RouteRequestBody, RoutesResponse, RoutingArgs};
use crate::dispatch::{Action, Dispatcher};
use crate::geometry::Coordinate;
use crate::route::{SegmentedPath, Segmenter};

/// The route-computation surface the gateway talks to.
///
/// Implemented by [`RoutingClient`]; tests substitute hand-rolled backends
/// with controllable completion order.
pub trait RouteBackend: Send + Sync + 'static {
    fn post_route(
        &self,
        body: RouteRequestBody,
    ) -> impl Future<Output = Result<RoutesResponse, GatewayError>> + Send;

    fn fetch_legacy(
        &self,
        points: &[Coordinate],
        profile: &str,
    ) -> impl Future<Output = Result<LegacyRouteResponse, GatewayError>> + Send;
}

impl RouteBackend for RoutingClient {
    async fn post_route(&self, body: RouteRequestBody) -> Result<RoutesResponse, GatewayError> {
        self.fetch_routes(&body).await
    }

    async fn fetch_legacy(
        &self,
        points: &[Coordinate],
        profile: &str,
    ) -> Result<LegacyRouteResponse, GatewayError> {
        self.fetch_legacy_routes(points, profile).await
    }
}

/// Orchestrates route requests and dispatches their outcomes.
pub struct RoutingGateway<B> {
    backend: Arc<B>,
    dispatcher: Arc<Dispatcher>,
    segmenter: Segmenter,
    /// Next sequence number to hand out.
    sequence: AtomicU64,
    /// Highest sequence whose settlement has been observed.
    last_applied: Mutex<Option<u64>>,
}

impl<B: RouteBackend> RoutingGateway<B> {
    pub fn new(backend: Arc<B>, dispatcher: Arc<Dispatcher>, segmenter: Segmenter) -> Arc<Self> {
        Arc::new(Self {
            backend,
            dispatcher,
            segmenter,
            sequence: AtomicU64::new(0),
            last_applied: Mutex::new(None),
        })
    }

    /// Compute routes for the given arguments.
    ///
    /// Referenced locations go to the segmented routes endpoint. Without
    /// references, raw coordinates fall back to the legacy polyline API and
    /// are run through the segmentation engine. With neither, the request
    /// is rejected before any network traffic.
    pub async fn route(&self, args: &RoutingArgs) -> Result<Vec<SegmentedPath>, GatewayError> {
        match (&args.source, &args.destination) {
            (Some(source), Some(destination)) => {
                let body = RouteRequestBody {
                    source: source.into(),
                    destination: destination.into(),
                };
                let response = self.backend.post_route(body).await?;
                Ok(convert::segmented_paths(response))
            }
            _ if args.points.len() >= 2 => {
                let response = self
                    .backend
                    .fetch_legacy(&args.points, &args.profile)
                    .await?;
                Ok(convert::segmented_legacy_paths(response, &self.segmenter))
            }
            (None, _) => Err(GatewayError::MissingLocation("source")),
            (_, None) => Err(GatewayError::MissingLocation("destination")),
        }
    }

    /// Issue a route request and dispatch its outcome as an action.
    ///
    /// Returns the handle of the settlement task. Errors never propagate
    /// out of the task; they settle as `RouteRequestFailed` actions.
    pub fn route_with_dispatch(
        self: &Arc<Self>,
        args: RoutingArgs,
        zoom: bool,
    ) -> tokio::task::JoinHandle<()> {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.dispatcher.dispatch(Action::RouteRequesting {
            args: args.clone(),
            sequence,
        });

        let gateway = Arc::clone(self);
        tokio::spawn(async move {
            let result = gateway.route(&args).await;
            gateway.settle(sequence, args, zoom, result);
        })
    }

    /// Apply or suppress a settled result according to the sequence rule.
    fn settle(
        &self,
        sequence: u64,
        args: RoutingArgs,
        zoom: bool,
        result: Result<Vec<SegmentedPath>, GatewayError>,
    ) {
        // The lock is held across the dispatch: check and state change must
        // be one step, or a stale settlement on another thread could pass
        // its check, lose the race to a newer one, and still dispatch last.
        let mut last = self.last_applied.lock().expect("sequence lock poisoned");
        let apply = last.is_none_or(|l| sequence > l);
        // Observation is recorded whether or not the result is applied;
        // nothing below this sequence may be applied afterwards.
        *last = Some(last.map_or(sequence, |l| l.max(sequence)));

        if !apply {
            tracing::debug!(sequence, "ignoring response of earlier issued route request");
            return;
        }

        match result {
            Ok(paths) => {
                self.dispatcher
                    .dispatch(Action::RouteRequestSuccess { args, zoom, paths });
            }
            Err(error) => {
                tracing::warn!(sequence, %error, "route request failed");
                self.dispatcher.dispatch(Action::RouteRequestFailed {
                    args,
                    message: error.user_message(),
                });
            }
        }
    }
}
