//! Access links: curved connectors drawn between where the user asked to
//! go and where the route actually starts or ends.

use crate::geometry::{Position, bezier::access_link};

use super::SegmentedPath;

/// A connector between a queried coordinate and the matched path endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLink {
    pub points: Vec<Position>,
}

/// Links from the queried endpoints to the selected path's endpoints.
///
/// Only endpoints that actually diverge from the path produce a link;
/// a waypoint that the route passes through exactly yields none.
pub fn access_links(queried: &[Position], path: &SegmentedPath) -> Vec<AccessLink> {
    let endpoints = match (path.segments.first(), path.segments.last()) {
        (Some(first), Some(last)) => {
            let start = first.geometry.first();
            let end = last.geometry.last();
            match (start, end) {
                (Some(start), Some(end)) => [*start, *end],
                _ => return Vec::new(),
            }
        }
        _ => return Vec::new(),
    };

    let queried_ends = match (queried.first(), queried.last()) {
        (Some(first), Some(last)) if queried.len() >= 2 => [*first, *last],
        _ => return Vec::new(),
    };

    queried_ends
        .iter()
        .zip(endpoints.iter())
        .filter(|(from, to)| from.planar_distance(to) > f64::EPSILON)
        .map(|(from, to)| AccessLink {
            points: access_link(*from, *to),
        })
        .collect()
}
