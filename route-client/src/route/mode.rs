//! Transport modes and the distance-based classification policy.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mode of one leg of a multi-modal itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Flight,
    Train,
    Bus,
    Cab,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Flight => "flight",
            TransportMode::Train => "train",
            TransportMode::Bus => "bus",
            TransportMode::Cab => "cab",
        }
    }

    /// Parse a wire mode string. Unknown modes fall back to `Cab`, the
    /// shortest-leg bucket, rather than failing the whole path.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "flight" => TransportMode::Flight,
            "train" => TransportMode::Train,
            "bus" => TransportMode::Bus,
            _ => TransportMode::Cab,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distance thresholds (km) for classifying a leg's mode.
///
/// These are placeholder policy, not domain truth: the backend does not
/// label legs, so the client guesses from the great-circle distance between
/// consecutive waypoints. Each bucket's lower bound is exclusive, so a leg
/// of exactly `flight_km` classifies as train.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeThresholds {
    /// Legs longer than this are flights.
    pub flight_km: f64,
    /// Legs longer than this (but not flights) are trains.
    pub train_km: f64,
    /// Legs longer than this (but not trains) are buses.
    pub bus_km: f64,
}

impl ModeThresholds {
    /// Classify a leg by its great-circle length in kilometres.
    pub fn classify(&self, distance_km: f64) -> TransportMode {
        if distance_km > self.flight_km {
            TransportMode::Flight
        } else if distance_km > self.train_km {
            TransportMode::Train
        } else if distance_km > self.bus_km {
            TransportMode::Bus
        } else {
            TransportMode::Cab
        }
    }
}

impl Default for ModeThresholds {
    fn default() -> Self {
        Self {
            flight_km: 100.0,
            train_km: 30.0,
            bus_km: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_buckets() {
        let t = ModeThresholds::default();
        assert_eq!(t.classify(150.0), TransportMode::Flight);
        assert_eq!(t.classify(50.0), TransportMode::Train);
        assert_eq!(t.classify(15.0), TransportMode::Bus);
        assert_eq!(t.classify(5.0), TransportMode::Cab);
    }

    #[test]
    fn bucket_lower_bounds_are_exclusive() {
        let t = ModeThresholds::default();
        assert_eq!(t.classify(100.0), TransportMode::Train);
        assert_eq!(t.classify(30.0), TransportMode::Bus);
        assert_eq!(t.classify(10.0), TransportMode::Cab);
    }

    #[test]
    fn custom_thresholds() {
        let t = ModeThresholds {
            flight_km: 500.0,
            train_km: 100.0,
            bus_km: 20.0,
        };
        assert_eq!(t.classify(150.0), TransportMode::Train);
        assert_eq!(t.classify(600.0), TransportMode::Flight);
    }

    #[test]
    fn wire_mode_parsing() {
        assert_eq!(TransportMode::from_wire("flight"), TransportMode::Flight);
        assert_eq!(TransportMode::from_wire("train"), TransportMode::Train);
        assert_eq!(TransportMode::from_wire("bus"), TransportMode::Bus);
        assert_eq!(TransportMode::from_wire("cab"), TransportMode::Cab);
        assert_eq!(TransportMode::from_wire("hyperloop"), TransportMode::Cab);
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(TransportMode::Flight.to_string(), "flight");
        assert_eq!(
            TransportMode::from_wire(&TransportMode::Bus.to_string()),
            TransportMode::Bus
        );
    }
}
