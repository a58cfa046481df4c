//! Curbside CLI - Command-line interface
//!
//! Exposes the route/tracking core for quick inspection: one-shot route
//! computation and a simulated tracked drive.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "curbside", version, about = "Adaptive parking-route computation and tracking")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute a single route between two points.
    Route(commands::route::RouteArgs),
    /// Simulate a tracked drive toward a destination.
    Track(commands::track::TrackArgs),
}

#[tokio::main]
async fn main() {
    curbside::telemetry::init_tracing("info");

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Route(args) => commands::route::run(args).await,
        Command::Track(args) => commands::track::run(args).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
