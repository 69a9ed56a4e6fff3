//! The segmentation engine: raw path + waypoints → mode-tagged legs.

use super::{ModeThresholds, RawPath, Segment, SegmentedPath, TransportMode};
use crate::geometry::{Position, haversine_m, path_length_m};

/// Converts a raw route into `N-1` mode-tagged segments for `N` waypoints.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    thresholds: ModeThresholds,
}

impl Segmenter {
    pub fn new(thresholds: ModeThresholds) -> Self {
        Self { thresholds }
    }

    /// Segment one raw path.
    ///
    /// For each consecutive waypoint pair the engine finds the nearest
    /// geometry indices, classifies the mode from the great-circle leg
    /// length, slices the matched stretch of geometry (flights get a
    /// straight line instead), and apportions the path's total time by
    /// distance share. The time split is a known approximation: it ignores
    /// real per-mode speeds.
    pub fn segment_path(&self, path: &RawPath) -> SegmentedPath {
        let waypoints = &path.snapped_waypoints;
        if waypoints.len() < 2 {
            return SegmentedPath {
                summary: String::new(),
                time_millis: path.time_millis,
                distance_meters: path.distance_meters,
                price: None,
                segments: Vec::new(),
            };
        }

        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        for (index, pair) in waypoints.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);

            let distance_km = haversine_m(&from, &to) / 1000.0;
            let mode = self.thresholds.classify(distance_km);

            let geometry = if mode == TransportMode::Flight {
                vec![from, to]
            } else {
                slice_between(&path.geometry, from, to)
            };

            let distance_meters = path_length_m(&geometry);
            let time_millis = if path.distance_meters > 0.0 {
                (path.time_millis as f64 * (distance_meters / path.distance_meters)) as u64
            } else {
                0
            };

            segments.push(Segment {
                mode,
                from_ref: waypoint_ref(index),
                to_ref: waypoint_ref(index + 1),
                geometry,
                distance_meters,
                time_millis,
            });
        }

        SegmentedPath {
            summary: String::new(),
            time_millis: path.time_millis,
            distance_meters: path.distance_meters,
            price: None,
            segments,
        }
    }
}

fn waypoint_ref(index: usize) -> String {
    format!("waypoint-{index}")
}

/// Slice of `geometry` between the points nearest `from` and `to`,
/// bracketed by the literal waypoints so segment joins are exact.
fn slice_between(geometry: &[Position], from: Position, to: Position) -> Vec<Position> {
    if geometry.len() <= 2 {
        return vec![from, to];
    }

    let mut from_index = nearest_index(geometry, &from);
    let mut to_index = nearest_index(geometry, &to);

    // Tolerate waypoints supplied out of arrival order.
    if from_index > to_index {
        std::mem::swap(&mut from_index, &mut to_index);
    }

    let mut points = Vec::with_capacity(to_index.saturating_sub(from_index) + 1);
    points.push(from);
    // Both waypoints can snap to the same index, leaving nothing between.
    points.extend_from_slice(geometry.get(from_index + 1..to_index).unwrap_or_default());
    points.push(to);
    points
}

/// Index of the geometry point with minimal planar distance to `target`.
fn nearest_index(geometry: &[Position], target: &Position) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, point) in geometry.iter().enumerate() {
        let d = point.planar_distance(target);
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A straight east-west path along the equator. One degree of longitude
    /// is roughly 111.2 km, which makes leg lengths easy to steer.
    fn equator_path(lngs: &[f64], waypoint_lngs: &[f64]) -> RawPath {
        let geometry: Vec<Position> = lngs.iter().map(|&l| Position::new(l, 0.0)).collect();
        let snapped_waypoints: Vec<Position> =
            waypoint_lngs.iter().map(|&l| Position::new(l, 0.0)).collect();
        let distance_meters = path_length_m(&geometry);
        RawPath {
            distance_meters,
            time_millis: 3_600_000,
            geometry,
            snapped_waypoints,
        }
    }

    #[test]
    fn produces_one_segment_per_waypoint_pair() {
        let path = equator_path(&[0.0, 0.05, 0.1, 0.15, 0.2], &[0.0, 0.1, 0.2]);
        let segmented = Segmenter::default().segment_path(&path);
        assert_eq!(segmented.segments.len(), 2);
    }

    #[test]
    fn continuity_across_segments() {
        let path = equator_path(
            &[0.0, 0.02, 0.04, 0.06, 0.08, 0.1, 0.12],
            &[0.0, 0.04, 0.08, 0.12],
        );
        let segmented = Segmenter::default().segment_path(&path);

        let first = &segmented.segments[0];
        assert_eq!(first.geometry[0], path.snapped_waypoints[0]);

        for pair in segmented.segments.windows(2) {
            let last = pair[0].geometry.last().unwrap();
            assert_eq!(*last, pair[1].geometry[0]);
        }

        let last_segment = segmented.segments.last().unwrap();
        assert_eq!(
            *last_segment.geometry.last().unwrap(),
            *path.snapped_waypoints.last().unwrap()
        );
    }

    #[test]
    fn flight_legs_get_a_straight_line() {
        // ~222 km leg: classified as flight, sub-geometry discarded.
        let path = equator_path(&[0.0, 0.5, 1.0, 1.5, 2.0], &[0.0, 2.0]);
        let segmented = Segmenter::default().segment_path(&path);

        assert_eq!(segmented.segments.len(), 1);
        let segment = &segmented.segments[0];
        assert_eq!(segment.mode, TransportMode::Flight);
        assert_eq!(segment.geometry.len(), 2);
    }

    #[test]
    fn road_legs_keep_the_matched_geometry() {
        // ~5.6 km leg: cab, keeps intermediate geometry points.
        let path = equator_path(&[0.0, 0.01, 0.02, 0.03, 0.04, 0.05], &[0.0, 0.05]);
        let segmented = Segmenter::default().segment_path(&path);

        let segment = &segmented.segments[0];
        assert_eq!(segment.mode, TransportMode::Cab);
        assert_eq!(segment.geometry.len(), 6);
        assert_eq!(segment.geometry[1], Position::new(0.01, 0.0));
    }

    #[test]
    fn out_of_order_waypoints_are_repaired() {
        let path = equator_path(&[0.0, 0.01, 0.02, 0.03, 0.04], &[0.04, 0.0]);
        let segmented = Segmenter::default().segment_path(&path);

        // The slice is taken in geometry order even though the waypoints
        // arrived reversed; the bracket points are the literal waypoints.
        let segment = &segmented.segments[0];
        assert_eq!(segment.geometry[0], Position::new(0.04, 0.0));
        assert_eq!(*segment.geometry.last().unwrap(), Position::new(0.0, 0.0));
        assert_eq!(segment.geometry.len(), 5);
    }

    #[test]
    fn time_is_apportioned_by_distance_share() {
        let path = equator_path(&[0.0, 0.05, 0.1, 0.3], &[0.0, 0.1, 0.3]);
        let segmented = Segmenter::default().segment_path(&path);

        let total: f64 = segmented.segments.iter().map(|s| s.distance_meters).sum();
        assert!((total - path.distance_meters).abs() < 1.0);

        let time_sum: u64 = segmented.segments.iter().map(|s| s.time_millis).sum();
        // Integer truncation can shave a few millis, never add.
        assert!(time_sum <= path.time_millis);
        assert!(path.time_millis - time_sum < 10);
    }

    #[test]
    fn fewer_than_two_waypoints_yields_no_segments() {
        let path = equator_path(&[0.0, 0.1, 0.2], &[0.1]);
        let segmented = Segmenter::default().segment_path(&path);
        assert!(segmented.segments.is_empty());
        assert_eq!(segmented.distance_meters, path.distance_meters);
        assert_eq!(segmented.time_millis, path.time_millis);
    }

    #[test]
    fn coincident_waypoints_degenerate_to_endpoints() {
        // Both waypoints snap to the same geometry index; the in-between
        // slice is empty, not an inverted range.
        let path = equator_path(&[0.0, 0.05, 0.1], &[0.05, 0.05]);
        let segmented = Segmenter::default().segment_path(&path);

        assert_eq!(segmented.segments.len(), 1);
        let segment = &segmented.segments[0];
        assert_eq!(segment.geometry.len(), 2);
        assert_eq!(segment.geometry[0], Position::new(0.05, 0.0));
        assert_eq!(segment.geometry[1], Position::new(0.05, 0.0));
    }

    #[test]
    fn two_point_geometry_degenerates_to_endpoints() {
        let path = equator_path(&[0.0, 0.05], &[0.0, 0.05]);
        let segmented = Segmenter::default().segment_path(&path);
        assert_eq!(segmented.segments[0].geometry.len(), 2);
    }

    #[test]
    fn zero_distance_path_has_zero_segment_times() {
        let path = RawPath {
            distance_meters: 0.0,
            time_millis: 1000,
            geometry: vec![Position::new(0.0, 0.0), Position::new(0.0, 0.0)],
            snapped_waypoints: vec![Position::new(0.0, 0.0), Position::new(0.0, 0.0)],
        };
        let segmented = Segmenter::default().segment_path(&path);
        assert_eq!(segmented.segments[0].time_millis, 0);
    }
}
