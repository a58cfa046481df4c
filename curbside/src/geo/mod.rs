//! Geographic primitives shared across the crate.
//!
//! Provides the [`Location`] value type, great-circle distance via the
//! Haversine formula, and [`GeoBounds`] for camera bounds-fitting.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers, as used by the Haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic position in WGS84 degrees.
///
/// Locations are immutable value snapshots: a newer position sample
/// supersedes an older one, it never mutates it in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees (positive = north).
    pub lat: f64,
    /// Longitude in degrees (positive = east).
    pub lng: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

/// Great-circle distance between two locations in kilometers.
///
/// Uses the Haversine formula with [`EARTH_RADIUS_KM`]. Symmetric:
/// `haversine_km(a, b) == haversine_km(b, a)`.
pub fn haversine_km(a: Location, b: Location) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Geographic bounding box.
///
/// Used to derive the camera rectangle containing the user and the
/// selected destination.
#[derive(Debug, Clone, Copy)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude.
    pub min_lat: f64,
    /// Maximum (northernmost) latitude.
    pub max_lat: f64,
    /// Minimum (westernmost) longitude.
    pub min_lng: f64,
    /// Maximum (easternmost) longitude.
    pub max_lng: f64,
}

impl GeoBounds {
    /// Create a bounding box from a single point.
    pub fn from_point(point: Location) -> Self {
        Self {
            min_lat: point.lat,
            max_lat: point.lat,
            min_lng: point.lng,
            max_lng: point.lng,
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: Location) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lng = self.min_lng.min(point.lng);
        self.max_lng = self.max_lng.max(point.lng);
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> Location {
        Location::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Return a copy grown by `ratio` of its size on every edge.
    ///
    /// A ratio of 0.1 adds 10% of the width/height on each side so that
    /// markers at the corners are not clipped by the viewport.
    pub fn padded(&self, ratio: f64) -> Self {
        let lat_pad = (self.max_lat - self.min_lat) * ratio;
        let lng_pad = (self.max_lng - self.min_lng) * ratio;
        Self {
            min_lat: self.min_lat - lat_pad,
            max_lat: self.max_lat + lat_pad,
            min_lng: self.min_lng - lng_pad,
            max_lng: self.max_lng + lng_pad,
        }
    }

    /// The southwest and northeast corners, in that order.
    pub fn corners(&self) -> (Location, Location) {
        (
            Location::new(self.min_lat, self.min_lng),
            Location::new(self.max_lat, self.max_lng),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_haversine_zero_for_same_point() {
        let p = Location::new(12.9, 77.6);
        assert!(haversine_km(p, p) < 1e-9);
    }

    #[test]
    fn test_haversine_known_distance() {
        // Bengaluru city center to airport is roughly 32 km as the crow flies.
        let city = Location::new(12.9716, 77.5946);
        let airport = Location::new(13.1989, 77.7068);
        let d = haversine_km(city, airport);
        assert!(d > 25.0 && d < 30.0, "got {}", d);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        // One degree of latitude is ~111.2 km everywhere.
        let a = Location::new(0.0, 0.0);
        let b = Location::new(1.0, 0.0);
        let d = haversine_km(a, b);
        assert!((d - 111.2).abs() < 0.5, "got {}", d);
    }

    proptest! {
        #[test]
        fn prop_haversine_symmetric(
            lat1 in -85.0f64..85.0, lng1 in -180.0f64..180.0,
            lat2 in -85.0f64..85.0, lng2 in -180.0f64..180.0,
        ) {
            let a = Location::new(lat1, lng1);
            let b = Location::new(lat2, lng2);
            let ab = haversine_km(a, b);
            let ba = haversine_km(b, a);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        #[test]
        fn prop_haversine_non_negative(
            lat1 in -85.0f64..85.0, lng1 in -180.0f64..180.0,
            lat2 in -85.0f64..85.0, lng2 in -180.0f64..180.0,
        ) {
            let d = haversine_km(Location::new(lat1, lng1), Location::new(lat2, lng2));
            prop_assert!(d >= 0.0);
        }
    }

    mod geo_bounds {
        use super::*;

        #[test]
        fn test_from_point_and_expand() {
            let mut bounds = GeoBounds::from_point(Location::new(12.90, 77.60));
            bounds.expand(Location::new(12.95, 77.65));

            assert!((bounds.min_lat - 12.90).abs() < 1e-9);
            assert!((bounds.max_lat - 12.95).abs() < 1e-9);
            assert!((bounds.min_lng - 77.60).abs() < 1e-9);
            assert!((bounds.max_lng - 77.65).abs() < 1e-9);
        }

        #[test]
        fn test_center() {
            let mut bounds = GeoBounds::from_point(Location::new(10.0, 20.0));
            bounds.expand(Location::new(12.0, 24.0));
            let c = bounds.center();
            assert!((c.lat - 11.0).abs() < 1e-9);
            assert!((c.lng - 22.0).abs() < 1e-9);
        }

        #[test]
        fn test_padded_grows_each_edge() {
            let mut bounds = GeoBounds::from_point(Location::new(10.0, 20.0));
            bounds.expand(Location::new(11.0, 22.0));
            let padded = bounds.padded(0.1);

            assert!((padded.min_lat - 9.9).abs() < 1e-9);
            assert!((padded.max_lat - 11.1).abs() < 1e-9);
            assert!((padded.min_lng - 19.8).abs() < 1e-9);
            assert!((padded.max_lng - 22.2).abs() < 1e-9);
        }

        #[test]
        fn test_corners_order() {
            let mut bounds = GeoBounds::from_point(Location::new(10.0, 20.0));
            bounds.expand(Location::new(11.0, 22.0));
            let (sw, ne) = bounds.corners();
            assert!(sw.lat < ne.lat);
            assert!(sw.lng < ne.lng);
        }
    }
}
