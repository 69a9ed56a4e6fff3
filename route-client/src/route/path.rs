//! Path and segment value types.
//!
//! All of these are immutable values: they are created by the gateway or
//! the segmentation engine and never mutated in place. Stores swap whole
//! paths, never edit them.

use serde::{Deserialize, Serialize};

use super::TransportMode;
use crate::geometry::{Position, polyline};
use crate::geometry::polyline::CodecError;

/// A ticket price attached to a path or segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub price: f64,
    pub currency: String,
}

/// Route geometry as received from a backend.
///
/// Responses are duck-typed on the wire: some carry an encoded polyline
/// string, some explicit coordinates. This is resolved exactly once at
/// ingestion; everything downstream operates on explicit positions only.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Encoded {
        data: String,
        multiplier: f64,
        is_3d: bool,
    },
    Explicit(Vec<Position>),
}

impl Geometry {
    /// Resolve into an explicit coordinate sequence, decoding if necessary.
    pub fn resolve(&self) -> Result<Vec<Position>, CodecError> {
        match self {
            Geometry::Encoded {
                data,
                multiplier,
                is_3d,
            } => polyline::decode(data, *is_3d, *multiplier),
            Geometry::Explicit(points) => Ok(points.clone()),
        }
    }
}

/// A route as delivered by the backend, geometry already resolved:
/// the full line plus one snapped waypoint per query point.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPath {
    pub distance_meters: f64,
    pub time_millis: u64,
    pub geometry: Vec<Position>,
    pub snapped_waypoints: Vec<Position>,
}

/// One mode-homogeneous leg between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub mode: TransportMode,
    pub from_ref: String,
    pub to_ref: String,
    pub geometry: Vec<Position>,
    pub distance_meters: f64,
    pub time_millis: u64,
}

/// A complete mode-tagged itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedPath {
    pub summary: String,
    pub time_millis: u64,
    pub distance_meters: f64,
    pub price: Option<Price>,
    pub segments: Vec<Segment>,
}

impl SegmentedPath {
    /// The typed "no route" sentinel used when no result exists.
    pub fn empty() -> Self {
        Self {
            summary: String::new(),
            time_millis: 0,
            distance_meters: 0.0,
            price: None,
            segments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.distance_meters == 0.0 && self.time_millis == 0
    }
}
