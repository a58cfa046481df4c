//! One-shot route computation.

use clap::Args;

use curbside::geo::Location;
use curbside::network::NetworkQualityMonitor;
use curbside::route::{ReqwestRouteClient, RouteEngine, RouteSource};
use curbside::AppConfig;

use super::NetworkArg;

#[derive(Debug, Args)]
pub struct RouteArgs {
    /// Origin latitude.
    #[arg(long)]
    pub from_lat: f64,
    /// Origin longitude.
    #[arg(long)]
    pub from_lng: f64,
    /// Destination latitude.
    #[arg(long)]
    pub to_lat: f64,
    /// Destination longitude.
    #[arg(long)]
    pub to_lng: f64,
    /// Network condition to simulate.
    #[arg(long, value_enum, default_value_t = NetworkArg::Medium)]
    pub network: NetworkArg,
    /// Routing service base URL.
    #[arg(long)]
    pub routing_url: Option<String>,
}

pub async fn run(args: RouteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();
    if let Some(url) = args.routing_url {
        config = config.with_routing_base_url(url);
    }

    let monitor = NetworkQualityMonitor::new(std::sync::Arc::new(args.network.probe()));
    let tier = monitor.current_tier();

    let client = ReqwestRouteClient::new(config.http_timeout)?;
    let engine = RouteEngine::new(client).with_base_url(config.routing_base_url);

    let origin = Location::new(args.from_lat, args.from_lng);
    let destination = Location::new(args.to_lat, args.to_lng);
    let route = engine.compute_route(origin, destination, tier).await;

    let source = match route.source {
        RouteSource::Remote => "remote",
        RouteSource::Fallback => "fallback",
    };
    println!("tier:      {tier}");
    println!("source:    {source}");
    println!("distance:  {:.1} km", route.distance_km);
    println!("duration:  {} min", route.duration_min);
    println!("points:    {}", route.geometry.len());
    Ok(())
}
