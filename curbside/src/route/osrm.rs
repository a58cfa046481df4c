//! OSRM wire format: request URLs and response parsing.
//!
//! The remote routing service speaks the OSRM `route/v1/driving` API.
//! Coordinates are `lng,lat` ordered on the wire (GeoJSON convention) and
//! converted to [`Location`] on parse.

use serde::Deserialize;

use crate::geo::Location;
use crate::network::QualityTier;

use super::{RouteError, RouteResult, RouteSource};

/// Top-level OSRM route response.
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

/// A single route alternative.
#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    /// Total distance in meters.
    distance: f64,
    /// Total duration in seconds.
    duration: f64,
}

/// GeoJSON LineString geometry.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// `[lng, lat]` pairs.
    coordinates: Vec<[f64; 2]>,
}

/// Build the routing request URL for the given tier.
///
/// Fast connections request full-fidelity geometry with turn annotations;
/// everything else requests simplified geometry to reduce payload size.
pub fn request_url(
    base_url: &str,
    origin: Location,
    destination: Location,
    tier: QualityTier,
) -> String {
    let coords = format!(
        "{},{};{},{}",
        origin.lng, origin.lat, destination.lng, destination.lat
    );
    match tier {
        QualityTier::Fast => format!(
            "{base_url}/route/v1/driving/{coords}?overview=full&geometries=geojson&annotations=true"
        ),
        QualityTier::Medium | QualityTier::Slow | QualityTier::Offline => {
            format!("{base_url}/route/v1/driving/{coords}?overview=simplified&geometries=geojson")
        }
    }
}

/// Parse an OSRM response body into a [`RouteResult`].
///
/// Only the first route is used. An empty route list or a degenerate
/// geometry (fewer than two points) is [`RouteError::NoRoute`], which the
/// engine recovers from via fallback synthesis.
pub fn parse_route(body: &[u8]) -> Result<RouteResult, RouteError> {
    let response: OsrmResponse =
        serde_json::from_slice(body).map_err(|e| RouteError::Malformed(e.to_string()))?;

    let route = response.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
    if route.geometry.coordinates.len() < 2 {
        return Err(RouteError::NoRoute);
    }

    let geometry = route
        .geometry
        .coordinates
        .iter()
        .map(|&[lng, lat]| Location::new(lat, lng))
        .collect();

    Ok(RouteResult {
        geometry,
        distance_km: (route.distance / 1000.0 * 10.0).round() / 10.0,
        duration_min: (route.duration / 60.0).round() as u32,
        source: RouteSource::Remote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(routes: &str) -> Vec<u8> {
        format!(r#"{{"code":"Ok","routes":{routes},"waypoints":[]}}"#).into_bytes()
    }

    #[test]
    fn test_request_url_fast_tier_full_geometry() {
        let url = request_url(
            "https://router.example.com",
            Location::new(12.90, 77.60),
            Location::new(12.95, 77.65),
            QualityTier::Fast,
        );
        assert_eq!(
            url,
            "https://router.example.com/route/v1/driving/77.6,12.9;77.65,12.95?overview=full&geometries=geojson&annotations=true"
        );
    }

    #[test]
    fn test_request_url_other_tiers_simplified() {
        for tier in [QualityTier::Medium, QualityTier::Slow, QualityTier::Offline] {
            let url = request_url(
                "https://router.example.com",
                Location::new(12.90, 77.60),
                Location::new(12.95, 77.65),
                tier,
            );
            assert!(url.contains("overview=simplified"));
            assert!(!url.contains("annotations"));
        }
    }

    #[test]
    fn test_parse_route_converts_units_and_coordinate_order() {
        let raw = body(
            r#"[{"geometry":{"type":"LineString","coordinates":[[77.60,12.90],[77.62,12.92],[77.65,12.95]]},"distance":7640.0,"duration":912.0}]"#,
        );
        let route = parse_route(&raw).unwrap();

        assert_eq!(route.geometry.len(), 3);
        // Wire order is [lng, lat]; Location is lat-first.
        assert_eq!(route.geometry[0], Location::new(12.90, 77.60));
        assert_eq!(route.geometry[2], Location::new(12.95, 77.65));
        assert!((route.distance_km - 7.6).abs() < 1e-9);
        assert_eq!(route.duration_min, 15);
        assert_eq!(route.source, RouteSource::Remote);
    }

    #[test]
    fn test_parse_route_rounds_distance_to_one_decimal() {
        let raw = body(
            r#"[{"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"distance":1234.0,"duration":59.0}]"#,
        );
        let route = parse_route(&raw).unwrap();
        assert!((route.distance_km - 1.2).abs() < 1e-9);
        assert_eq!(route.duration_min, 1);
    }

    #[test]
    fn test_parse_route_empty_routes_is_no_route() {
        assert!(matches!(parse_route(&body("[]")), Err(RouteError::NoRoute)));
    }

    #[test]
    fn test_parse_route_missing_routes_is_no_route() {
        let raw = br#"{"code":"NoRoute"}"#;
        assert!(matches!(parse_route(raw), Err(RouteError::NoRoute)));
    }

    #[test]
    fn test_parse_route_degenerate_geometry_is_no_route() {
        let raw = body(
            r#"[{"geometry":{"type":"LineString","coordinates":[[77.6,12.9]]},"distance":10.0,"duration":2.0}]"#,
        );
        assert!(matches!(parse_route(&raw), Err(RouteError::NoRoute)));
    }

    #[test]
    fn test_parse_route_malformed_body() {
        assert!(matches!(
            parse_route(b"not json"),
            Err(RouteError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_route_uses_first_route_only() {
        let raw = body(
            r#"[
                {"geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]},"distance":1000.0,"duration":60.0},
                {"geometry":{"type":"LineString","coordinates":[[0,0],[2,2]]},"distance":9000.0,"duration":600.0}
            ]"#,
        );
        let route = parse_route(&raw).unwrap();
        assert!((route.distance_km - 1.0).abs() < 1e-9);
    }
}
