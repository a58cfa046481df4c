//! Camera/view-state derivation for the map renderer.
//!
//! [`derive_view`] is a pure function of the current location, selected
//! destination, route presence, and UI mode. It owns nothing durable: the
//! returned [`ViewDirective`] is consumed by the rendering collaborator
//! and re-derived whenever any input changes.
//!
//! # Modes
//!
//! A single [`ViewMode`] enumerates the camera phases explicitly, rather
//! than independent visibility flags whose combinations would never be
//! fully enumerated.

use crate::geo::{haversine_km, GeoBounds, Location};
use crate::parking::Destination;
use crate::route::RouteResult;

/// Continental default camera target before any search happens.
pub const BROWSE_CENTER: Location = Location { lat: 22.5937, lng: 78.9629 };

/// City default used when a search happened but no fix exists yet.
pub const CITY_DEFAULT_CENTER: Location = Location { lat: 28.6139, lng: 77.2090 };

/// Zoom for the continental browse view.
pub const BROWSE_ZOOM: u8 = 5;

/// Street-level zoom used when centering on the user.
pub const CLOSE_ZOOM: u8 = 16;

/// Maximum zoom, used for post-booking tracking.
pub const MAX_ZOOM: u8 = 21;

/// Fraction of the bounds size added on each edge when fitting.
pub const BOUNDS_PAD_RATIO: f64 = 0.1;

/// Which phase of the UI the camera serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// No search performed yet; the camera stays on the continental
    /// default and must not fight user-initiated interaction.
    Browsing,
    /// Search performed; the route panel is visible.
    Routing,
    /// Booking completed and the route panel hidden; the camera follows
    /// the user tightly.
    PostBookingTracking,
}

/// Camera directive for the map renderer. Output only, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewDirective {
    /// Camera target.
    pub center: Location,
    /// Camera zoom level.
    pub zoom: u8,
    /// Whether the transition should animate.
    pub animate: bool,
    /// Animation duration in seconds (meaningless when `animate` is false).
    pub duration_secs: f32,
    /// Southwest/northeast corners to fit, overriding plain centering.
    pub fit_bounds: Option<(Location, Location)>,
}

/// Inputs to view derivation.
#[derive(Debug, Clone, Copy)]
pub struct ViewInputs<'a> {
    /// Current UI mode.
    pub mode: ViewMode,
    /// Latest known user location, if any.
    pub user_location: Option<Location>,
    /// Currently selected destination, if any.
    pub destination: Option<&'a Destination>,
    /// The displayed route, if one has been computed.
    pub route: Option<&'a RouteResult>,
}

/// Pick the maximum zoom for a bounds fit from the route distance.
fn max_zoom_for_distance(distance_km: f64) -> u8 {
    if distance_km < 1.0 {
        16
    } else if distance_km < 5.0 {
        14
    } else if distance_km < 20.0 {
        12
    } else {
        10
    }
}

/// Derive the camera directive from the current inputs.
pub fn derive_view(inputs: &ViewInputs<'_>) -> ViewDirective {
    match inputs.mode {
        ViewMode::Browsing => ViewDirective {
            center: BROWSE_CENTER,
            zoom: BROWSE_ZOOM,
            animate: false,
            duration_secs: 0.0,
            fit_bounds: None,
        },

        ViewMode::Routing => match (inputs.user_location, inputs.destination) {
            (Some(user), Some(destination)) => {
                // Zoom buckets by the straight line between user and
                // destination, not the (longer) road route.
                let distance_km = haversine_km(user, destination.position());

                let mut bounds = GeoBounds::from_point(user);
                bounds.expand(destination.position());
                let bounds = bounds.padded(BOUNDS_PAD_RATIO);

                ViewDirective {
                    center: bounds.center(),
                    zoom: max_zoom_for_distance(distance_km),
                    animate: true,
                    duration_secs: 3.0,
                    fit_bounds: Some(bounds.corners()),
                }
            }
            (Some(user), None) => ViewDirective {
                center: user,
                zoom: CLOSE_ZOOM,
                animate: true,
                duration_secs: 2.5,
                fit_bounds: None,
            },
            (None, _) => ViewDirective {
                center: CITY_DEFAULT_CENTER,
                zoom: CLOSE_ZOOM,
                animate: false,
                duration_secs: 0.0,
                fit_bounds: None,
            },
        },

        // Bounds-fitting is ignored entirely: center tightly on the user
        // at maximum zoom, re-deriving on every location update.
        ViewMode::PostBookingTracking => match inputs.user_location {
            Some(user) => ViewDirective {
                center: user,
                zoom: MAX_ZOOM,
                animate: true,
                duration_secs: 6.0,
                fit_bounds: None,
            },
            None => ViewDirective {
                center: CITY_DEFAULT_CENTER,
                zoom: CLOSE_ZOOM,
                animate: false,
                duration_secs: 0.0,
                fit_bounds: None,
            },
        },
    }
}
