//! Great-circle distance and unit conversion on a spherical earth model.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates, in meters, via the arccosine
/// spherical law of cosines. Identical coordinates yield exactly 0 (the cosine
/// term is clamped to 1 before `acos`, which avoids NaN from float rounding
/// that would otherwise push it a hair past 1.0).
pub fn great_circle_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    if a.latitude == b.latitude && a.longitude == b.longitude {
        return 0.0;
    }
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (a.longitude - b.longitude).to_radians();
    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos();
    cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}

/// Travel time in minutes for a distance in meters at a given velocity in km/h.
pub fn travel_minutes(distance_m: f64, velocity_kmph: f64) -> f64 {
    distance_m / (velocity_kmph * 1000.0 / 60.0)
}

/// Absolute tolerance used when comparing distances and times computed along
/// different code paths (e.g. curvature against 1.0 for a straight route).
pub const EPSILON: f64 = 1e-6;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_coordinates_are_zero_distance() {
        let a = Coordinate::new(55.751_244, 37.618_423);
        assert_eq!(great_circle_distance_m(a, a), 0.0);
    }

    #[test]
    fn known_distance_moscow_to_saint_petersburg() {
        let moscow = Coordinate::new(55.751_244, 37.618_423);
        let spb = Coordinate::new(59.938_632, 30.314_130);
        let d = great_circle_distance_m(moscow, spb);
        // ~635 km as the crow flies.
        assert!((d - 635_000.0).abs() < 10_000.0, "distance was {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(-5.0, 100.0);
        assert!((great_circle_distance_m(a, b) - great_circle_distance_m(b, a)).abs() < EPSILON);
    }

    #[test]
    fn travel_minutes_matches_hand_computed_example() {
        // 120000 m at 60 km/h => 120 minutes.
        assert!((travel_minutes(120_000.0, 60.0) - 120.0).abs() < EPSILON);
    }
}
