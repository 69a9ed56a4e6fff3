//! Bidirectional mapping between the address bar and the stores.
//!
//! State changes are serialized into the query string; navigation events
//! are parsed back into actions. The `ignore_updates` flag is raised while
//! this module itself dispatches actions derived from a parsed URL, so
//! those dispatches do not immediately serialize back into a navigation
//! and loop forever.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::join_all;
use url::Url;

use super::browser::Browser;
use crate::dispatch::{Action, Dispatcher, Store, SubscriptionId};
use crate::gateway::{LocationRef, SearchBackend};
use crate::geometry::{Coordinate, bbox_of_coordinates};
use crate::stores::map_options::{MapOptionsReducer, MapOptionsState};
use crate::stores::query::{QueryPoint, QueryPointKind, QueryReducer, QueryStoreState};
use crate::stores::settings::{PathDisplayMode, SettingsReducer, SettingsState};

/// One `point` parameter, before resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPoint {
    pub coordinate: Option<Coordinate>,
    pub text: String,
}

/// Everything a URL's query string can describe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedUrl {
    pub points: Vec<ParsedPoint>,
    pub profile: Option<String>,
    pub layer: Option<String>,
    pub display_mode: Option<PathDisplayMode>,
    pub source: Option<LocationRef>,
    pub destination: Option<LocationRef>,
}

/// Keeps the address bar and the stores in sync.
pub struct UrlSync<B> {
    dispatcher: Arc<Dispatcher>,
    backend: Arc<B>,
    browser: Arc<dyn Browser>,
    query_store: Arc<Store<QueryReducer>>,
    map_store: Arc<Store<MapOptionsReducer>>,
    settings_store: Arc<Store<SettingsReducer>>,
    /// Raised while dispatching actions parsed from a URL.
    ignore_updates: AtomicBool,
    subscriptions: std::sync::Mutex<Vec<Subscription>>,
}

enum Subscription {
    Query(SubscriptionId),
    Map(SubscriptionId),
    Settings(SubscriptionId),
}

impl<B: SearchBackend> UrlSync<B> {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        backend: Arc<B>,
        browser: Arc<dyn Browser>,
        query_store: Arc<Store<QueryReducer>>,
        map_store: Arc<Store<MapOptionsReducer>>,
        settings_store: Arc<Store<SettingsReducer>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            dispatcher,
            backend,
            browser,
            query_store,
            map_store,
            settings_store,
            ignore_updates: AtomicBool::new(false),
            subscriptions: std::sync::Mutex::new(Vec::new()),
        })
    }

    /// Mirror the current state into the address bar (with a "replace", so
    /// the initial load does not grow the history stack) and subscribe to
    /// all three stores. Subscribing happens exactly once; a second `start`
    /// call is a no-op.
    pub fn start(self: &Arc<Self>) {
        {
            let mut subs = self.subscriptions.lock().expect("subscription list poisoned");
            if !subs.is_empty() {
                return;
            }
            let query = {
                let sync = Arc::clone(self);
                self.query_store.subscribe(move |_| sync.update_url_from_state())
            };
            let map = {
                let sync = Arc::clone(self);
                self.map_store.subscribe(move |_| sync.update_url_from_state())
            };
            let settings = {
                let sync = Arc::clone(self);
                self.settings_store
                    .subscribe(move |_| sync.update_url_from_state())
            };
            subs.push(Subscription::Query(query));
            subs.push(Subscription::Map(map));
            subs.push(Subscription::Settings(settings));
        }
        self.navigate(true);
    }

    /// Unsubscribe from all three stores. Removes each subscription exactly
    /// once and never re-adds it.
    pub fn stop(&self) {
        let subs = std::mem::take(
            &mut *self.subscriptions.lock().expect("subscription list poisoned"),
        );
        for sub in subs {
            match sub {
                Subscription::Query(id) => self.query_store.unsubscribe(id),
                Subscription::Map(id) => self.map_store.unsubscribe(id),
                Subscription::Settings(id) => self.settings_store.unsubscribe(id),
            }
        }
    }

    fn update_url_from_state(&self) {
        if self.ignore_updates.load(Ordering::SeqCst) {
            return;
        }
        self.navigate(false);
    }

    fn navigate(&self, replace: bool) {
        let current = self.browser.current_url();
        let next = match serialize_into(
            &current,
            &self.query_store.state(),
            &self.map_store.state(),
            &self.settings_store.state(),
        ) {
            Ok(next) => next,
            Err(error) => {
                tracing::warn!(%error, url = current, "current URL is not parseable");
                return;
            }
        };
        if next == current {
            return;
        }
        if replace {
            self.browser.replace(&next);
        } else {
            self.browser.push(&next);
        }
    }

    /// Parse the browser's current URL and dispatch the state it describes.
    ///
    /// Point resolution is asynchronous; the whole batch runs under the
    /// `ignore_updates` guard so none of these dispatches navigate.
    pub async fn update_state_from_url(self: &Arc<Self>) {
        let raw = self.browser.current_url();
        let parsed = match Url::parse(&raw) {
            Ok(url) => parse_url(&url),
            Err(error) => {
                tracing::warn!(%error, url = raw, "ignoring unparseable navigation");
                return;
            }
        };

        self.ignore_updates.store(true, Ordering::SeqCst);
        self.apply(parsed).await;
        self.ignore_updates.store(false, Ordering::SeqCst);
    }

    async fn apply(&self, parsed: ParsedUrl) {
        self.dispatcher.dispatch(Action::ClearPoints);
        if let Some(profile) = parsed.profile {
            self.dispatcher.dispatch(Action::SetVehicleProfile { profile });
        }
        if let Some(mode) = parsed.display_mode {
            self.dispatcher.dispatch(Action::SetPathDisplayMode(mode));
        }

        let resolutions = parsed
            .points
            .iter()
            .map(|point| self.resolve_point(point));
        let mut points: Vec<QueryPoint> = join_all(resolutions)
            .await
            .into_iter()
            .enumerate()
            .map(|(id, point)| QueryPoint {
                id: id as u64,
                ..point
            })
            .collect();

        if points.len() >= 2 {
            if let Some(source) = parsed.source {
                points[0].location_ref = Some(source);
            }
            if let Some(destination) = parsed.destination {
                let last = points.len() - 1;
                points[last].location_ref = Some(destination);
            }
        }

        let initialized: Vec<Coordinate> = points
            .iter()
            .filter(|p| p.is_initialized)
            .map(|p| p.coordinate)
            .collect();
        if let Some(bbox) = bbox_of_coordinates(&initialized) {
            self.dispatcher.dispatch(Action::SetBbox(bbox));
        }

        if !points.is_empty() {
            self.dispatcher.dispatch(Action::SetQueryPoints(points));
        }
        if let Some(layer) = parsed.layer {
            self.dispatcher.dispatch(Action::SelectMapLayer { layer });
        }
    }

    /// Turn one parsed point into a query point, geocoding text-only legacy
    /// links. A failed resolution leaves the point uninitialized with its
    /// text intact; it never fails the whole parse.
    async fn resolve_point(&self, parsed: &ParsedPoint) -> QueryPoint {
        if let Some(coordinate) = parsed.coordinate {
            let mut point = QueryPoint::initialized(0, coordinate, QueryPointKind::Via);
            if !parsed.text.is_empty() {
                point.query_text = parsed.text.clone();
            }
            return point;
        }
        if parsed.text.is_empty() {
            return QueryPoint::empty(0, QueryPointKind::Via);
        }

        let mut point = QueryPoint::empty(0, QueryPointKind::Via);
        point.query_text = parsed.text.clone();
        match self.geocode(&parsed.text).await {
            Some((coordinate, location)) => {
                point.location_ref = Some(location);
                if let Some(coordinate) = coordinate {
                    point.coordinate = coordinate;
                    point.is_initialized = true;
                }
            }
            None => {
                tracing::warn!(text = parsed.text, "could not resolve legacy point");
            }
        }
        point
    }

    /// Two-stage lookup: forward geocode the text, and when the first hit
    /// carries no geometry, search again by the hit's name for one that does.
    async fn geocode(&self, text: &str) -> Option<(Option<Coordinate>, LocationRef)> {
        let hits = match self.backend.search(text).await {
            Ok(hits) => hits,
            Err(error) => {
                tracing::warn!(%error, text, "geocode failed during URL parse");
                return None;
            }
        };
        let first = hits.first()?;
        let location = first.location_ref();
        if let Some(geo) = &first.geo {
            return Some((Some(Coordinate::new(geo.lat, geo.lng)), location));
        }

        match self.backend.search(&first.name).await {
            Ok(refined) => {
                let coordinate = refined
                    .iter()
                    .find_map(|hit| hit.geo.as_ref())
                    .map(|geo| Coordinate::new(geo.lat, geo.lng));
                Some((coordinate, location))
            }
            Err(error) => {
                tracing::warn!(%error, text, "refinement geocode failed during URL parse");
                Some((None, location))
            }
        }
    }
}

/// Serialize state into `base`'s scheme/host/path, replacing its query.
fn serialize_into(
    base: &str,
    query: &QueryStoreState,
    map: &MapOptionsState,
    settings: &SettingsState,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        if query.points.iter().any(|p| p.is_initialized) {
            for point in &query.points {
                if point.is_initialized {
                    let coordinate_text = point.coordinate.to_text();
                    let value = if point.query_text.is_empty()
                        || point.query_text == coordinate_text
                    {
                        coordinate_text
                    } else {
                        format!("{}_{}", coordinate_text, point.query_text)
                    };
                    pairs.append_pair("point", &value);
                } else {
                    pairs.append_pair("point", "");
                }
            }
        }
        pairs.append_pair("profile", &query.profile);
        pairs.append_pair("layer", &map.selected_layer);
        if settings.path_display_mode == PathDisplayMode::Static {
            pairs.append_pair("pathDisplayMode", "status");
        }
        if let Some(source) = query
            .points
            .first()
            .and_then(|p| p.location_ref.as_ref())
        {
            pairs.append_pair("source_id", &source.id);
            pairs.append_pair("source_sid", &source.sid.to_string());
            pairs.append_pair("source_type", &source.kind.to_string());
        }
        if let Some(destination) = query
            .points
            .last()
            .filter(|_| query.points.len() >= 2)
            .and_then(|p| p.location_ref.as_ref())
        {
            pairs.append_pair("dest_id", &destination.id);
            pairs.append_pair("dest_sid", &destination.sid.to_string());
            pairs.append_pair("dest_type", &destination.kind.to_string());
        }
    }
    Ok(url.to_string())
}

/// Parse the query string of a navigation target.
pub fn parse_url(url: &Url) -> ParsedUrl {
    let mut parsed = ParsedUrl::default();
    let mut source = RefParams::default();
    let mut destination = RefParams::default();

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "point" => parsed.points.push(parse_point(&value)),
            "profile" | "vehicle" => parsed.profile = Some(value.into_owned()),
            "layer" => parsed.layer = Some(value.into_owned()),
            "pathDisplayMode" => {
                parsed.display_mode = Some(if value == "status" {
                    PathDisplayMode::Static
                } else {
                    PathDisplayMode::Dynamic
                });
            }
            "source_id" => source.id = Some(value.into_owned()),
            "source_sid" => source.sid = value.parse().ok(),
            "source_type" => source.kind = value.parse().ok(),
            "dest_id" => destination.id = Some(value.into_owned()),
            "dest_sid" => destination.sid = value.parse().ok(),
            "dest_type" => destination.kind = value.parse().ok(),
            _ => {}
        }
    }

    parsed.source = source.into_ref();
    parsed.destination = destination.into_ref();
    parsed
}

#[derive(Default)]
struct RefParams {
    id: Option<String>,
    sid: Option<i64>,
    kind: Option<i64>,
}

impl RefParams {
    fn into_ref(self) -> Option<LocationRef> {
        Some(LocationRef {
            id: self.id?,
            sid: self.sid.unwrap_or(0),
            kind: self.kind.unwrap_or(0),
            name: String::new(),
        })
    }
}

fn parse_point(value: &str) -> ParsedPoint {
    if value.is_empty() {
        return ParsedPoint {
            coordinate: None,
            text: String::new(),
        };
    }
    let mut parts = value.splitn(2, '_');
    let head = parts.next().unwrap_or_default();
    let text = parts.next().unwrap_or_default().to_string();

    match parse_coordinate(head) {
        Some(coordinate) => ParsedPoint {
            coordinate: Some(coordinate),
            text,
        },
        // Legacy links carry free text where the coordinate should be.
        None => ParsedPoint {
            coordinate: None,
            text: value.to_string(),
        },
    }
}

fn parse_coordinate(text: &str) -> Option<Coordinate> {
    let (lat, lng) = text.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }
    Some(Coordinate::new(lat, lng))
}
