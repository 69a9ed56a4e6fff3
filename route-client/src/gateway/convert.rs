//! Conversion from wire responses to domain paths.
//!
//! Geometry normalization happens here, once, at the response boundary:
//! encoded polylines are decoded, GeoJSON-ish shapes flattened, and missing
//! segment geometry synthesized. Downstream code only ever sees resolved
//! coordinate sequences.

use super::types::{LegacyRouteResponse, RoutesResponse, WirePath, WireRoute, WireSegment};
use crate::geometry::Position;
use crate::geometry::polyline::CodecError;
use crate::route::{RawPath, Segment, SegmentedPath, Segmenter, TransportMode};

/// Wire multiplier for segment geometry when the payload is encoded but
/// carries no multiplier of its own.
const SEGMENT_MULTIPLIER: f64 = 1e5;

/// Convert a segmented routes response into domain paths.
///
/// A route whose geometry fails to decode is dropped with a warning; the
/// remaining routes survive. An unsuccessful or empty envelope yields an
/// empty list.
pub fn segmented_paths(response: RoutesResponse) -> Vec<SegmentedPath> {
    let Some(data) = response.data else {
        return Vec::new();
    };
    if !response.success {
        return Vec::new();
    }

    data.routes
        .into_iter()
        .filter_map(|route| match convert_route(route) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "dropping route with undecodable geometry");
                None
            }
        })
        .collect()
}

fn convert_route(route: WireRoute) -> Result<SegmentedPath, CodecError> {
    let segments = route
        .segments
        .into_iter()
        .map(convert_segment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SegmentedPath {
        summary: route.summary,
        time_millis: route.travel_duration,
        distance_meters: route.distance,
        price: route.price,
        segments,
    })
}

fn convert_segment(segment: WireSegment) -> Result<Segment, CodecError> {
    let geometry = match segment.points {
        Some(points) => points
            .into_geometry(SEGMENT_MULTIPLIER, false)
            .resolve()?,
        None => synthesize_line(&segment),
    };

    let distance_meters = crate::geometry::path_length_m(&geometry);

    Ok(Segment {
        mode: TransportMode::from_wire(&segment.mode),
        from_ref: segment.from,
        to_ref: segment.to,
        geometry,
        distance_meters,
        time_millis: segment.time,
    })
}

/// Straight line between a segment's endpoint coordinates, used when the
/// backend sent no geometry at all.
fn synthesize_line(segment: &WireSegment) -> Vec<Position> {
    let source = segment.source.as_ref().and_then(|s| s.geo);
    let destination = segment.destination.as_ref().and_then(|d| d.geo);
    match (source, destination) {
        (Some(a), Some(b)) => vec![
            Position::new(a.lng, a.lat),
            Position::new(b.lng, b.lat),
        ],
        _ => Vec::new(),
    }
}

/// Decode one legacy path into a [`RawPath`].
pub fn raw_path(path: WirePath) -> Result<RawPath, CodecError> {
    let multiplier = path.points_encoded_multiplier;
    let geometry = path.points.into_geometry(multiplier, false).resolve()?;
    let snapped_waypoints = path
        .snapped_waypoints
        .into_geometry(multiplier, false)
        .resolve()?;

    Ok(RawPath {
        distance_meters: path.distance,
        time_millis: path.time,
        geometry,
        snapped_waypoints,
    })
}

/// Convert a legacy response: decode each path and run it through the
/// segmentation engine. Paths with malformed geometry are dropped with a
/// warning; the rest of the response survives.
pub fn segmented_legacy_paths(
    response: LegacyRouteResponse,
    segmenter: &Segmenter,
) -> Vec<SegmentedPath> {
    response
        .paths
        .into_iter()
        .filter_map(|path| match raw_path(path) {
            Ok(raw) => Some(segmenter.segment_path(&raw)),
            Err(e) => {
                tracing::warn!(error = %e, "dropping legacy path with undecodable polyline");
                None
            }
        })
        .collect()
}
