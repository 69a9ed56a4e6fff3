//! Synthetic access-link geometry.
//!
//! When a user's raw input point sits off the routable network, the gap to
//! the nearest waypoint is bridged with a quadratic Bezier arc rather than
//! a bare straight line, so access links read as distinct from real legs.

use super::Position;

/// Number of evenly spaced parameter samples along the curve.
const SAMPLES: usize = 21;

/// Build a quadratic Bezier arc from `start` to `end`.
///
/// The control point is the chord midpoint pushed perpendicular by
/// `min(0.5, 100/d) * d` where `d` is the planar chord length, so short
/// links arc strongly and long links flatten out. The curve is sampled at
/// 21 evenly spaced parameter steps and the last sample is replaced by the
/// literal end coordinate to avoid floating-point drift at the join.
pub fn access_link(start: Position, end: Position) -> Vec<Position> {
    let distance = start.planar_distance(&end);
    if distance == 0.0 {
        // A zero-length chord has no curve; sampling the polynomial would
        // only accumulate rounding noise.
        return vec![start; SAMPLES];
    }
    let mid_x = (start.lng + end.lng) / 2.0;
    let mid_y = (start.lat + end.lat) / 2.0;

    let height = (100.0 / distance).min(0.5);
    let control_x = mid_x;
    let control_y = mid_y - height * distance;

    let mut points = Vec::with_capacity(SAMPLES);
    for i in 0..SAMPLES {
        let t = i as f64 / (SAMPLES - 1) as f64;
        let s = 1.0 - t;
        let x = s * s * start.lng + 2.0 * s * t * control_x + t * t * end.lng;
        let y = s * s * start.lat + 2.0 * s * t * control_y + t * t * end.lat;
        points.push(Position::new(x, y));
    }

    // Pin the endpoint exactly.
    points[SAMPLES - 1] = end;
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_count_and_endpoints() {
        let start = Position::new(13.3, 52.5);
        let end = Position::new(13.45, 52.54);
        let curve = access_link(start, end);

        assert_eq!(curve.len(), 21);
        assert_eq!(curve[0], start);
        assert_eq!(curve[20], end);
    }

    #[test]
    fn short_links_bow_away_from_the_chord() {
        let start = Position::new(0.0, 0.0);
        let end = Position::new(0.1, 0.0);
        let curve = access_link(start, end);

        // Height factor saturates at 0.5 for short chords, so the midpoint
        // dips below the straight line by a quarter of it.
        let mid = curve[10];
        assert!((mid.lng - 0.05).abs() < 1e-12);
        assert!((mid.lat - -0.025).abs() < 1e-12);
    }

    #[test]
    fn long_links_flatten() {
        // Chord longer than 200 units: height is 100/d * d = 100, a constant
        // offset regardless of length.
        let start = Position::new(0.0, 0.0);
        let end = Position::new(1000.0, 0.0);
        let curve = access_link(start, end);
        let mid = curve[10];
        assert!((mid.lat - -50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_zero_length_link() {
        let p = Position::new(5.0, 5.0);
        let curve = access_link(p, p);
        assert_eq!(curve.len(), 21);
        assert!(curve.iter().all(|q| *q == p));
    }
}
