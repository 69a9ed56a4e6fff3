//! Wire types for the routing and location-search endpoints.
//!
//! DTOs mirror the backend JSON shapes; conversion into domain types lives
//! in [`convert`](super::convert). Optional and defaulted fields reflect
//! payloads observed in the wild, which omit more than the documentation
//! admits.

use serde::{Deserialize, Serialize};

use crate::geometry::{Coordinate, Position};
use crate::route::{Geometry, Price};

/// External reference to a location known to the routing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRef {
    pub id: String,
    pub sid: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    #[serde(default)]
    pub name: String,
}

/// Immutable description of one route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingArgs {
    /// Query coordinates, in visit order.
    pub points: Vec<Coordinate>,
    pub profile: String,
    pub max_alternatives: usize,
    pub custom_model: Option<serde_json::Value>,
    /// Backend reference for the origin, when one was selected.
    pub source: Option<LocationRef>,
    /// Backend reference for the destination, when one was selected.
    pub destination: Option<LocationRef>,
}

impl RoutingArgs {
    pub fn new(points: Vec<Coordinate>, profile: impl Into<String>) -> Self {
        Self {
            points,
            profile: profile.into(),
            max_alternatives: 3,
            custom_model: None,
            source: None,
            destination: None,
        }
    }

    pub fn with_locations(mut self, source: LocationRef, destination: LocationRef) -> Self {
        self.source = Some(source);
        self.destination = Some(destination);
        self
    }
}

/// Body of a `POST {routes}` request.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRequestBody {
    pub source: EndpointRef,
    pub destination: EndpointRef,
}

/// The id/sid/type triple the routes endpoint expects per endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointRef {
    pub id: String,
    pub sid: i64,
    #[serde(rename = "type")]
    pub kind: i64,
}

impl From<&LocationRef> for EndpointRef {
    fn from(r: &LocationRef) -> Self {
        Self {
            id: r.id.clone(),
            sid: r.sid,
            kind: r.kind,
        }
    }
}

/// A lat/lng pair on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeoPoint> for Coordinate {
    fn from(g: GeoPoint) -> Self {
        Coordinate::new(g.lat, g.lng)
    }
}

/// One hit from the location search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationHit {
    pub id: String,
    pub sid: i64,
    #[serde(rename = "type")]
    pub kind: i64,
    pub name: String,
    #[serde(default)]
    pub cc: String,
    pub geo: Option<GeoPoint>,
}

impl LocationHit {
    pub fn location_ref(&self) -> LocationRef {
        LocationRef {
            id: self.id.clone(),
            sid: self.sid,
            kind: self.kind,
            name: self.name.clone(),
        }
    }
}

/// Envelope of `GET {search}?q=`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Vec<LocationHit>,
}

/// Envelope of `POST {routes}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesResponse {
    pub success: bool,
    pub data: Option<RoutesData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutesData {
    #[serde(default)]
    pub routes: Vec<WireRoute>,
}

/// One alternative from the routes endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WireRoute {
    #[serde(default)]
    pub summary: String,
    #[serde(rename = "travelDuration", default)]
    pub travel_duration: u64,
    pub price: Option<Price>,
    #[serde(default)]
    pub segments: Vec<WireSegment>,
    #[serde(default)]
    pub distance: f64,
    #[serde(rename = "pathId", default)]
    pub path_id: String,
}

/// One leg of a wire route.
#[derive(Debug, Clone, Deserialize)]
pub struct WireSegment {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub time: u64,
    #[serde(rename = "priceDetails")]
    pub price_details: Option<Price>,
    pub source: Option<WireLocation>,
    pub destination: Option<WireLocation>,
    pub points: Option<WirePoints>,
}

/// Location attached to a wire segment endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WireLocation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sid: i64,
    #[serde(rename = "type", default)]
    pub kind: i64,
    pub geo: Option<GeoPoint>,
}

/// Geometry as it appears on the wire: an encoded polyline string, a
/// GeoJSON-style object, or a bare coordinate array. Normalized exactly
/// once into [`Geometry`] at ingestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WirePoints {
    Encoded(String),
    LineString { coordinates: Vec<Vec<f64>> },
    Coordinates(Vec<Vec<f64>>),
}

impl WirePoints {
    /// Resolve into the single geometry variant.
    ///
    /// `multiplier` and `is_3d` describe the encoding when the payload is a
    /// string; explicit coordinate arrays ignore them. Coordinate rows are
    /// `[lng, lat]` or `[lng, lat, ele]`; shorter rows are dropped.
    pub fn into_geometry(self, multiplier: f64, is_3d: bool) -> Geometry {
        match self {
            WirePoints::Encoded(data) => Geometry::Encoded {
                data,
                multiplier,
                is_3d,
            },
            WirePoints::LineString { coordinates } | WirePoints::Coordinates(coordinates) => {
                Geometry::Explicit(
                    coordinates
                        .into_iter()
                        .filter_map(|row| match row.as_slice() {
                            [lng, lat] => Some(Position::new(*lng, *lat)),
                            [lng, lat, ele, ..] => Some(Position::with_ele(*lng, *lat, *ele)),
                            _ => None,
                        })
                        .collect(),
                )
            }
        }
    }
}

/// A path from the legacy polyline-based route API.
#[derive(Debug, Clone, Deserialize)]
pub struct WirePath {
    pub distance: f64,
    pub time: u64,
    pub points: WirePoints,
    pub snapped_waypoints: WirePoints,
    #[serde(default)]
    pub points_encoded: bool,
    #[serde(default = "default_multiplier")]
    pub points_encoded_multiplier: f64,
    #[serde(default)]
    pub bbox: Option<[f64; 4]>,
}

fn default_multiplier() -> f64 {
    1e5
}

/// Envelope of the legacy route API.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyRouteResponse {
    #[serde(default)]
    pub paths: Vec<WirePath>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses() {
        let json = r#"{
            "success": true,
            "data": [
                {"id": "DEL", "sid": 7, "type": 1, "name": "Delhi", "cc": "IN",
                 "geo": {"lat": 28.6139, "lng": 77.209}}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.data.len(), 1);
        let hit = &response.data[0];
        assert_eq!(hit.location_ref().id, "DEL");
        assert_eq!(hit.geo.unwrap().lat, 28.6139);
    }

    #[test]
    fn search_hit_without_geo_parses() {
        let json = r#"{"id": "X", "sid": 1, "type": 2, "name": "Somewhere"}"#;
        let hit: LocationHit = serde_json::from_str(json).unwrap();
        assert!(hit.geo.is_none());
        assert_eq!(hit.cc, "");
    }

    #[test]
    fn routes_response_parses() {
        let json = r#"{
            "success": true,
            "data": {
                "routes": [{
                    "summary": "Delhi to Mumbai",
                    "travelDuration": 7200000,
                    "price": {"price": 4500.0, "currency": "INR"},
                    "distance": 1150000.0,
                    "pathId": "p1",
                    "segments": [{
                        "from": "Delhi", "to": "Mumbai", "mode": "flight",
                        "time": 7200000,
                        "source": {"id": "DEL", "sid": 7, "type": 1,
                                   "geo": {"lat": 28.6, "lng": 77.2}},
                        "destination": {"id": "BOM", "sid": 9, "type": 1,
                                        "geo": {"lat": 19.1, "lng": 72.9}},
                        "points": [[77.2, 28.6], [72.9, 19.1]]
                    }]
                }]
            }
        }"#;
        let response: RoutesResponse = serde_json::from_str(json).unwrap();
        let data = response.data.unwrap();
        assert_eq!(data.routes.len(), 1);
        assert_eq!(data.routes[0].segments[0].mode, "flight");
    }

    #[test]
    fn wire_points_variants_normalize() {
        let explicit = WirePoints::Coordinates(vec![vec![1.0, 2.0], vec![3.0, 4.0, 120.0]]);
        match explicit.into_geometry(1e5, false) {
            Geometry::Explicit(points) => {
                assert_eq!(points.len(), 2);
                assert_eq!(points[1].ele, 120.0);
            }
            Geometry::Encoded { .. } => panic!("expected explicit geometry"),
        }

        let encoded = WirePoints::Encoded("_p~iF~ps|U".to_string());
        match encoded.into_geometry(1e5, false) {
            Geometry::Encoded { multiplier, .. } => assert_eq!(multiplier, 1e5),
            Geometry::Explicit(_) => panic!("expected encoded geometry"),
        }
    }

    #[test]
    fn line_string_object_parses() {
        let json = r#"{"type": "LineString", "coordinates": [[77.2, 28.6], [72.9, 19.1]]}"#;
        let points: WirePoints = serde_json::from_str(json).unwrap();
        assert!(matches!(points, WirePoints::LineString { .. }));
    }

    #[test]
    fn legacy_path_defaults() {
        let json = r#"{
            "paths": [{
                "distance": 1200.5,
                "time": 600000,
                "points": "_p~iF~ps|U_ulLnnqC",
                "snapped_waypoints": "_p~iF~ps|U_ulLnnqC",
                "points_encoded": true
            }]
        }"#;
        let response: LegacyRouteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.paths[0].points_encoded_multiplier, 1e5);
        assert!(response.paths[0].bbox.is_none());
    }

    #[test]
    fn request_body_serializes_expected_shape() {
        let source = LocationRef {
            id: "DEL".into(),
            sid: 7,
            kind: 1,
            name: "Delhi".into(),
        };
        let destination = LocationRef {
            id: "BOM".into(),
            sid: 9,
            kind: 1,
            name: "Mumbai".into(),
        };
        let body = RouteRequestBody {
            source: (&source).into(),
            destination: (&destination).into(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["source"]["id"], "DEL");
        assert_eq!(json["destination"]["type"], 1);
        // Names are for display only, never sent.
        assert!(json["source"].get("name").is_none());
    }
}
