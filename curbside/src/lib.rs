//! Curbside - adaptive route computation and tracking for parking navigation
//!
//! This library is the engine room of a parking-navigation app: it decides
//! how to compute a driving route under varying network conditions,
//! guarantees a usable route even when the remote routing service fails,
//! and keeps that route fresh by polling the user's position at a cadence
//! tuned to measured network quality.
//!
//! # Architecture
//!
//! ```text
//! NetworkQualityMonitor ──┬──► RouteEngine ──► RouteResult
//! LocationSource ─────────┴──► AdaptiveTracker ──► TrackerEvents
//!                                                      │
//!                    ViewMode + Location + Route ──► derive_view ──► ViewDirective
//! ```
//!
//! Capabilities with host-specific implementations (the network probe and
//! the location source) are injected as trait objects so the core runs
//! identically under a real device, a simulation, or a test double.

pub mod app;
pub mod geo;
pub mod location;
pub mod network;
pub mod parking;
pub mod route;
pub mod telemetry;
pub mod tracker;
pub mod view;

pub use app::{AppConfig, AppError, CurbsideApp};
pub use geo::Location;
pub use network::{NetworkQualityMonitor, QualityTier};
pub use parking::Destination;
pub use route::{RouteEngine, RouteResult, RouteSource};
pub use tracker::{AdaptiveTracker, TrackerEvents};
pub use view::{derive_view, ViewDirective, ViewMode};
