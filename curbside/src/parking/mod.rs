//! Parking destinations.
//!
//! The core treats a destination as opaque beyond its position; the
//! remaining fields ride along for the presentation layer and fixture
//! data.

use serde::Deserialize;

use crate::geo::Location;

/// A parking target the user can navigate to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    /// Stable identifier within the fixture data.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Base price per hour, in the local currency.
    #[serde(default)]
    pub base_price: f64,
}

impl Destination {
    /// Create a destination at the given position.
    pub fn new(id: u32, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id,
            name: name.into(),
            lat,
            lng,
            base_price: 0.0,
        }
    }

    /// The destination's position.
    pub fn position(&self) -> Location {
        Location::new(self.lat, self.lng)
    }
}
