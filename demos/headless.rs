//! Run the walker simulation without a window and log what happens.
//!
//! Usage: `headless [config.json]`. Log verbosity follows `RUST_LOG`.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use waygrid_demos::{SimConfig, Simulation};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waygrid_demos=info,waygrid_motion=info,headless=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() {
    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::from_json_file(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let summary = sim.run();
    log::info!("{summary}");
    match serde_json::to_string(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("cannot encode summary: {e}"),
    }
    if !sim.is_finished() {
        log::warn!("{} walkers still on the map", sim.agents().len());
    }
}
