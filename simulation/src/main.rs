//! Headless ecosystem run.
//!
//! Ticks the simulation without a renderer, logs progress, and writes the
//! per-tick statistics history to JSON at the end.
//!
//! Usage: `ecosystem-simulation [ticks] [config.json]`

use anyhow::Context;
use simulation::{SimulationConfig, SimulationWorld, TickStats};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_TICKS: u64 = 2000;
const STATS_FILE: &str = "simulation_stats.json";
const LOG_EVERY: u64 = 200;

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut args = std::env::args().skip(1);
    let ticks: u64 = match args.next() {
        Some(raw) => raw.parse().context("ticks argument must be an integer")?,
        None => DEFAULT_TICKS,
    };
    let config = match args.next() {
        Some(path) => {
            info!(path = %path, "loading config");
            SimulationConfig::from_path(&path)?
        }
        None => SimulationConfig::default(),
    };

    info!("Ecosystem simulation starting...");
    let mut world = SimulationWorld::new(config);
    world.reset();

    let start = std::time::Instant::now();
    let mut history: Vec<TickStats> = Vec::with_capacity(ticks as usize);
    for _ in 0..ticks {
        let stats = world.tick();
        if stats.tick % LOG_EVERY == 0 {
            info!(
                tick = stats.tick,
                prey = stats.prey_count,
                predators = stats.predator_count,
                food = stats.food_count,
                prey_avg_energy = stats.prey_avg_energy as f64,
                "progress"
            );
        }
        history.push(stats);
    }
    let elapsed = start.elapsed();

    info!(
        "Run complete: {:?} total, {:?} per tick, {} prey / {} predators surviving, \
         {} prey births, {} prey deaths, {} predator births, {} predator deaths",
        elapsed,
        elapsed / ticks.max(1) as u32,
        world.prey_count(),
        world.predator_count(),
        world.counters.total_prey_births,
        world.counters.total_prey_deaths,
        world.counters.total_predator_births,
        world.counters.total_predator_deaths,
    );

    let json = serde_json::to_string(&history)?;
    std::fs::write(STATS_FILE, json)
        .with_context(|| format!("failed to write {}", STATS_FILE))?;
    info!(file = STATS_FILE, "statistics history written");

    Ok(())
}
