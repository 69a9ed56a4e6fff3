//! Geometric value types and distance helpers.
//!
//! Coordinates come in two flavours: `Coordinate` is the lat/lng pair used
//! for query points and wire payloads, `Position` is the lng/lat(/elevation)
//! triple used for route geometry, matching the order produced by the
//! polyline codec.

pub mod bezier;
pub mod polyline;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres, used for all haversine sums.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A latitude/longitude pair as used by query points and the search API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Render as `lat,lng` with up to six decimals, the format used in URLs.
    pub fn to_text(&self) -> String {
        format!("{},{}", round6(self.lat), round6(self.lng))
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

/// One point of a route geometry: `[lng, lat, elevation]`.
///
/// Elevation defaults to zero when a source only carries two axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
    pub ele: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat, ele: 0.0 }
    }

    pub fn with_ele(lng: f64, lat: f64, ele: f64) -> Self {
        Self { lng, lat, ele }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Planar distance in coordinate units. Used for nearest-point matching
    /// where only relative order matters, not geodesic accuracy.
    pub fn planar_distance(&self, other: &Position) -> f64 {
        let dx = self.lng - other.lng;
        let dy = self.lat - other.lat;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<Coordinate> for Position {
    fn from(c: Coordinate) -> Self {
        Position::new(c.lng, c.lat)
    }
}

/// Great-circle distance between two positions in metres.
pub fn haversine_m(a: &Position, b: &Position) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Total haversine length of a coordinate sequence in metres.
pub fn path_length_m(points: &[Position]) -> f64 {
    points.windows(2).map(|w| haversine_m(&w[0], &w[1])).sum()
}

/// Bounding box `[min_lng, min_lat, max_lng, max_lat]`.
pub type Bbox = [f64; 4];

/// Estimate a bounding box from coordinates.
///
/// A single coordinate is widened by ±0.001 degrees so the box has area.
/// Returns `None` when the resulting box is degenerate (e.g. no input).
pub fn bbox_of_coordinates(coords: &[Coordinate]) -> Option<Bbox> {
    let mut bbox: Bbox = [180.0, 90.0, -180.0, -90.0];
    for c in coords {
        bbox[0] = bbox[0].min(c.lng);
        bbox[1] = bbox[1].min(c.lat);
        bbox[2] = bbox[2].max(c.lng);
        bbox[3] = bbox[3].max(c.lat);
    }
    if coords.len() == 1 {
        bbox[0] -= 0.001;
        bbox[1] -= 0.001;
        bbox[2] += 0.001;
        bbox[3] += 0.001;
    }
    if bbox[0] < bbox[2] && bbox[1] < bbox[3] {
        Some(bbox)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_to_text() {
        let c = Coordinate::new(52.5200066, 13.404954);
        assert_eq!(c.to_text(), "52.520007,13.404954");
    }

    #[test]
    fn haversine_equator_degree() {
        // One degree of longitude on the equator is about 111.19 km.
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0, 0.0);
        let d = haversine_m(&a, &b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let a = Position::new(77.209, 28.6139);
        assert_eq!(haversine_m(&a, &a), 0.0);
    }

    #[test]
    fn path_length_sums_pairs() {
        let pts = vec![
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
        ];
        let total = path_length_m(&pts);
        let half = haversine_m(&pts[0], &pts[1]);
        assert!((total - 2.0 * half).abs() < 1e-6);
    }

    #[test]
    fn bbox_of_two_points() {
        let bbox = bbox_of_coordinates(&[
            Coordinate::new(48.0, 11.0),
            Coordinate::new(52.0, 13.0),
        ])
        .unwrap();
        assert_eq!(bbox, [11.0, 48.0, 13.0, 52.0]);
    }

    #[test]
    fn bbox_of_single_point_is_widened() {
        let bbox = bbox_of_coordinates(&[Coordinate::new(48.0, 11.0)]).unwrap();
        assert_eq!(bbox, [10.999, 47.999, 11.001, 48.001]);
    }

    #[test]
    fn bbox_of_nothing() {
        assert!(bbox_of_coordinates(&[]).is_none());
    }
}
