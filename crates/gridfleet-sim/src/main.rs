//! Gridfleet simulation driver.
//!
//! Owns the periodic timer the engine itself deliberately does not have:
//! each tick applies scripted commands, advances flight lifecycles, runs
//! the engine's detect/resolve/metrics evaluation, and logs the outcome.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gridfleet_core::{Conflict, Coordinator, Drone, Metrics, SimulationSpeed};
use gridfleet_sim::config::SimConfig;
use gridfleet_sim::observer::TracingObserver;
use gridfleet_sim::scenarios::Scenario;

#[derive(Debug, Parser)]
#[command(name = "gridfleet-sim", about = "Run a canned drone coordination scenario")]
struct Args {
    /// Scenario to run: crossing, parity, converging or quiet
    #[arg(long, default_value = "crossing")]
    scenario: String,

    /// Speed multiplier (1-8); defaults to GRIDFLEET_SPEED or 1
    #[arg(long)]
    speed: Option<u8>,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 30)]
    ticks: u64,

    /// Seed for reroute jitter; omit for OS entropy
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final engine snapshot as JSON
    #[arg(long)]
    json: bool,
}

/// Immutable end-of-run snapshot for machine consumers.
#[derive(Serialize)]
struct Snapshot<'a> {
    drones: &'a [Drone],
    conflicts: &'a [Conflict],
    metrics: &'a Metrics,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridfleet_sim=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = SimConfig::from_env();
    let speed = SimulationSpeed::new(args.speed.unwrap_or(config.speed))?;
    let scenario = Scenario::by_name(&args.scenario).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown scenario '{}' (expected one of {:?})",
            args.scenario,
            Scenario::names()
        )
    })?;

    let mut coordinator = match args.seed {
        Some(seed) => Coordinator::with_seed(seed),
        None => Coordinator::new(),
    };
    coordinator.add_observer(Box::new(TracingObserver));

    tracing::info!(
        scenario = %scenario.name,
        speed = speed.multiplier(),
        ticks = args.ticks,
        "starting simulation"
    );

    let mut ticker =
        tokio::time::interval(speed.scale(Duration::from_millis(config.tick_interval_ms)));

    for tick in 0..args.ticks {
        ticker.tick().await;

        scenario.apply(tick, &mut coordinator);
        coordinator.advance_flights();
        coordinator.tick();

        for conflict in coordinator.conflicts() {
            tracing::warn!(
                severity = %conflict.severity,
                time_to_conflict_s = conflict.time_to_conflict,
                "conflict {} <-> {} at ({:.1}, {:.1})",
                conflict.drone_ids[0],
                conflict.drone_ids[1],
                conflict.position.x,
                conflict.position.y,
            );
        }

        if tick % 5 == 0 {
            let metrics = coordinator.metrics();
            tracing::info!(
                tick,
                active = metrics.active_flights,
                queued = metrics.queued_flights,
                completed = metrics.completed_flights,
                safety = metrics.safety_score,
                efficiency = metrics.efficiency_score,
                "fleet status"
            );
        }
    }

    let metrics = coordinator.metrics();
    tracing::info!(
        completed = metrics.completed_flights,
        conflicts_detected = metrics.conflicts_detected,
        conflicts_resolved = metrics.conflicts_resolved,
        average_flight_time_s = metrics.average_flight_time_s,
        "simulation finished"
    );

    if args.json {
        let snapshot = Snapshot {
            drones: coordinator.drones(),
            conflicts: coordinator.conflicts(),
            metrics: coordinator.metrics(),
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    Ok(())
}
