//! Local route synthesis for when the remote service is unreachable.
//!
//! Produces a gently bowed path between origin and destination with a
//! straight-line distance estimate. The bow amplitude and the
//! minutes-per-kilometer heuristic are display heuristics, tunable but
//! not physically derived.

use crate::geo::{haversine_km, Location};

use super::{RouteResult, RouteSource};

/// Number of interpolation steps; the synthesized path has `STEPS + 1` points.
const STEPS: usize = 20;

/// Perturbation amplitude in degrees applied to both lat and lng.
const BOW_AMPLITUDE_DEG: f64 = 0.001;

/// Average-speed heuristic: estimated minutes per kilometer.
const MINUTES_PER_KM: f64 = 2.0;

/// Synthesize a fallback route between two points.
///
/// The path interpolates linearly with `sin(t·π)` perturbation, so the
/// first and last points land exactly on origin and destination. Distance
/// is the Haversine great-circle distance rounded to one decimal;
/// duration is `round(distance_km × 2)` minutes.
pub fn synthesize(origin: Location, destination: Location) -> RouteResult {
    let mut geometry = Vec::with_capacity(STEPS + 1);
    for i in 0..=STEPS {
        let t = i as f64 / STEPS as f64;
        let lat = origin.lat + (destination.lat - origin.lat) * t;
        let lng = origin.lng + (destination.lng - origin.lng) * t;

        let bow = (t * std::f64::consts::PI).sin() * BOW_AMPLITUDE_DEG;
        geometry.push(Location::new(lat + bow, lng + bow));
    }

    let distance_km = (haversine_km(origin, destination) * 10.0).round() / 10.0;
    RouteResult {
        geometry,
        distance_km,
        duration_min: (distance_km * MINUTES_PER_KM).round() as u32,
        source: RouteSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Location = Location { lat: 12.90, lng: 77.60 };
    const DESTINATION: Location = Location { lat: 12.95, lng: 77.65 };

    #[test]
    fn test_geometry_has_exactly_21_points() {
        let route = synthesize(ORIGIN, DESTINATION);
        assert_eq!(route.geometry.len(), 21);
    }

    #[test]
    fn test_endpoints_are_exact() {
        // sin(0) = sin(π) = 0, so the perturbation vanishes at both ends.
        let route = synthesize(ORIGIN, DESTINATION);
        let first = route.geometry.first().unwrap();
        let last = route.geometry.last().unwrap();

        assert!((first.lat - ORIGIN.lat).abs() < 1e-12);
        assert!((first.lng - ORIGIN.lng).abs() < 1e-12);
        assert!((last.lat - DESTINATION.lat).abs() < 1e-12);
        assert!((last.lng - DESTINATION.lng).abs() < 1e-12);
    }

    #[test]
    fn test_midpoint_is_bowed_off_the_straight_line() {
        let route = synthesize(ORIGIN, DESTINATION);
        let mid = route.geometry[10];
        let straight_lat = (ORIGIN.lat + DESTINATION.lat) / 2.0;

        // sin(π/2) = 1, so the midpoint sits a full amplitude off the line.
        assert!((mid.lat - straight_lat - BOW_AMPLITUDE_DEG).abs() < 1e-9);
    }

    #[test]
    fn test_bengaluru_scenario_distance_and_duration() {
        let route = synthesize(ORIGIN, DESTINATION);
        assert_eq!(route.source, RouteSource::Fallback);
        // Straight-line Haversine distance is ~7.76 km, rounded to 7.8.
        assert!(
            (route.distance_km - 7.8).abs() < 0.2,
            "got {}",
            route.distance_km
        );
        assert!(
            (15..=16).contains(&route.duration_min),
            "got {}",
            route.duration_min
        );
    }

    #[test]
    fn test_zero_length_route() {
        let route = synthesize(ORIGIN, ORIGIN);
        assert_eq!(route.geometry.len(), 21);
        assert!(route.distance_km.abs() < 1e-9);
        assert_eq!(route.duration_min, 0);
    }

    #[test]
    fn test_distance_rounded_to_one_decimal() {
        let route = synthesize(ORIGIN, DESTINATION);
        let scaled = route.distance_km * 10.0;
        assert!((scaled - scaled.round()).abs() < 1e-9);
    }
}
