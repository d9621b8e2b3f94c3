//! bikeshare — console front end for the bike-sharing simulation.
//!
//! Runs the default network (6 sites, 12 persons, 1 van) for a fixed
//! wall-clock duration and prints the final state of every station.  Agent
//! activity is reported through `tracing`; filter it with `RUST_LOG`, e.g.
//! `RUST_LOG=bikeshare::console=info,bs_agent=debug`.
//!
//! ```text
//! bikeshare [CONFIG.json] [SECONDS]
//! ```
//!
//! Fields missing from the JSON file take their default values.

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bs_agent::TracingSink;
use bs_core::{BikeType, BikingConfig};
use bs_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const DEFAULT_RUN_SECS: u64 = 20;
/// Sleep a tenth of every simulated trip so the console stays lively.
const DEFAULT_TIME_SCALE: f64 = 0.1;

// ── Arguments ─────────────────────────────────────────────────────────────────

fn load_config(path: Option<&str>) -> Result<BikingConfig> {
    let Some(path) = path else {
        let mut config = BikingConfig::default();
        config.timing.time_scale = DEFAULT_TIME_SCALE;
        return Ok(config);
    };
    let file = File::open(path).with_context(|| format!("opening config {path}"))?;
    serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing config {path}"))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_thread_names(true)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let secs = match args.get(1) {
        Some(s) => s.parse::<u64>().with_context(|| format!("invalid duration {s:?}"))?,
        None => DEFAULT_RUN_SECS,
    };

    println!("=== bikeshare ===");
    println!(
        "Sites: {}  |  Persons: {}  |  Bike types: {}  |  Seed: {}",
        config.sites, config.persons, config.bike_types, config.seed
    );
    println!("Running for {secs} s (time scale {})", config.timing.time_scale);
    println!();

    let sim = SimBuilder::new(config.clone())
        .sink(Arc::new(TracingSink))
        .build()?;
    info!(bikes = sim.fleet_size(), "network stocked");
    let report = sim.run_for(Duration::from_secs(secs))?;

    println!();
    println!("Simulation stopped after {:.3} s", report.elapsed.as_secs_f64());
    println!("  person trips   : {}", report.total_trips());
    println!("  van cycles     : {}", report.van.cycles);
    println!("  bikes moved    : {}", report.van.bikes_moved);
    println!("  in van         : {}", report.van_cargo);
    println!("  undelivered    : {}", report.undelivered());
    println!();

    // Final occupancy table.  Counts are read after shutdown, so they are
    // stable.
    let kinds: Vec<BikeType> = BikeType::all(config.bike_types).collect();
    print!("{:<8} {:<9} {:<7}", "Site", "Capacity", "Total");
    for kind in &kinds {
        print!(" {:<6}", kind.to_string());
    }
    println!();
    println!("{}", "-".repeat(26 + 7 * kinds.len()));
    for (site, total) in config.site_ids().zip(&report.occupancy) {
        let label = if site == config.depot { format!("{} *", site.0) } else { site.0.to_string() };
        print!("{:<8} {:<9} {:<7}", label, config.capacity_of(site), total);
        for count in &report.counts_by_type[site.index()] {
            print!(" {:<6}", count);
        }
        println!();
    }
    println!("(* depot)");

    Ok(())
}
