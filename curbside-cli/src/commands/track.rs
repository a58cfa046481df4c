//! Simulated tracked drive.
//!
//! Drives a synthetic car toward the destination while the adaptive
//! tracker polls it, refreshing the route and the camera directive the
//! way the map surface would consume them.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::info;

use curbside::geo::{haversine_km, Location};
use curbside::location::{LocationSource, StaticLocationSource};
use curbside::parking::Destination;
use curbside::view::{derive_view, ViewInputs, ViewMode};
use curbside::{AppConfig, CurbsideApp};

use super::NetworkArg;

/// Fraction of the remaining leg covered per simulation step.
const STEP_FRACTION: f64 = 0.15;

/// Simulation step cadence.
const STEP_INTERVAL: Duration = Duration::from_secs(5);

/// Distance at which the drive counts as arrived.
const ARRIVAL_KM: f64 = 0.05;

#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Start latitude.
    #[arg(long, default_value_t = 12.9716)]
    pub from_lat: f64,
    /// Start longitude.
    #[arg(long, default_value_t = 77.5946)]
    pub from_lng: f64,
    /// Destination latitude.
    #[arg(long, default_value_t = 12.9352)]
    pub to_lat: f64,
    /// Destination longitude.
    #[arg(long, default_value_t = 77.6245)]
    pub to_lng: f64,
    /// Destination name.
    #[arg(long, default_value = "Simulated Garage")]
    pub name: String,
    /// Network condition to simulate.
    #[arg(long, value_enum, default_value_t = NetworkArg::Medium)]
    pub network: NetworkArg,
    /// Routing service base URL.
    #[arg(long)]
    pub routing_url: Option<String>,
    /// Parking fixture file (JSON array of parkings); overrides the
    /// destination coordinates.
    #[arg(long)]
    pub parkings: Option<PathBuf>,
    /// Parking id to pick from the fixture file; defaults to the first
    /// entry.
    #[arg(long, requires = "parkings")]
    pub destination_id: Option<u32>,
}

/// Parse a parking fixture file body.
fn parse_fixture(raw: &str) -> Result<Vec<Destination>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Pick the requested parking, or the first one when no id is given.
fn select_destination(parkings: Vec<Destination>, id: Option<u32>) -> Option<Destination> {
    match id {
        Some(id) => parkings.into_iter().find(|p| p.id == id),
        None => parkings.into_iter().next(),
    }
}

fn load_destination(
    path: &Path,
    id: Option<u32>,
) -> Result<Destination, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let parkings = parse_fixture(&raw)?;
    select_destination(parkings, id).ok_or_else(|| {
        match id {
            Some(id) => format!("no parking with id {id} in {}", path.display()),
            None => format!("no parkings in {}", path.display()),
        }
        .into()
    })
}

pub async fn run(args: TrackArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();
    if let Some(url) = args.routing_url.clone() {
        config = config.with_routing_base_url(url);
    }

    let source = Arc::new(StaticLocationSource::new(Location::new(
        args.from_lat,
        args.from_lng,
    )));
    let destination = match &args.parkings {
        Some(path) => load_destination(path, args.destination_id)?,
        None => Destination::new(1, args.name.clone(), args.to_lat, args.to_lng),
    };
    let destination_name = destination.name.clone();
    let target = destination.position();

    let location: Arc<dyn LocationSource> = source.clone();
    let app = CurbsideApp::start(config, Arc::new(args.network.probe()), location)?;

    match app.initial_fix().await {
        Ok(fix) => println!("starting at {fix}, heading to {destination_name} at {target}"),
        Err(e) => {
            // Startup failures are user-visible; background failures are not.
            eprintln!("notice: {e}; tracking will continue without an initial fix");
        }
    }

    let mut events = app.events();
    app.tracker().start(destination);

    // Step the simulated car toward the destination.
    let stepper = {
        let source = Arc::clone(&source);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(STEP_INTERVAL);
            loop {
                ticker.tick().await;
                let here = source.position();
                source.set_position(Location::new(
                    here.lat + (target.lat - here.lat) * STEP_FRACTION,
                    here.lng + (target.lng - here.lng) * STEP_FRACTION,
                ));
            }
        })
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("\ninterrupted");
                break;
            }
            changed = events.route.changed() => {
                if changed.is_err() {
                    break;
                }
                let route = events.route.borrow_and_update().clone();
                let here = events.location.borrow().unwrap_or(target);
                if let Some(route) = route {
                    info!(
                        distance_km = route.distance_km,
                        duration_min = route.duration_min,
                        source = ?route.source,
                        "route refreshed"
                    );
                    let directive = derive_view(&ViewInputs {
                        mode: ViewMode::PostBookingTracking,
                        user_location: Some(here),
                        destination: None,
                        route: Some(&route),
                    });
                    println!(
                        "at {here} | {:.1} km, {} min | camera {} z{}",
                        route.distance_km, route.duration_min, directive.center, directive.zoom
                    );
                }
                if haversine_km(here, target) < ARRIVAL_KM {
                    println!("arrived at {destination_name}");
                    break;
                }
            }
        }
    }

    stepper.abort();
    println!("{}", app.metrics_snapshot());
    app.shutdown();
    Ok(())
}
