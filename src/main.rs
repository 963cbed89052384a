//! Headless runner: drives one mission with an autopilot and prints the
//! terminal record.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use haulage::leaderboard::{JsonFileScoreStore, Leaderboard};
use haulage::math::{angle_between, angle_difference_rad};
use haulage::{init_logging, level, Archetype, Effect, FrameInput, MissionResult, Simulation, Tuning};
use log::{info, warn};

/// Headless delivery run driven by a simple autopilot
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in level key
    #[arg(short, long, default_value = "LEVEL_1")]
    level: String,
    /// Mission archetype
    #[arg(short, long, default_value = "standard")]
    mission: Archetype,
    /// Wall-clock budget for the run in simulated seconds
    #[arg(long, default_value_t = 200.0)]
    seconds: f32,
    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    fps: u16,
    /// Seed for actor placement and behaviour
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// TOML file overriding tuning values
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// JSON score table to submit the result to
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Name recorded on the score table
    #[arg(long, default_value = "AUTOPILOT")]
    player: String,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Full throttle toward the mission target, easing off for sharp turns.
fn autopilot(sim: &Simulation) -> FrameInput {
    let truck = sim.truck();
    let desired = angle_between(truck.position(), sim.mission().target_position());
    let error = angle_difference_rad(truck.rotation(), desired);
    let sharp = error.abs() > 1.2;
    FrameInput {
        forward: !sharp || truck.speed_factor() < 0.5,
        left: error < -0.05,
        right: error > 0.05,
        handbrake: sharp && truck.speed_factor() > 0.8,
        ..FrameInput::idle()
    }
}

fn run(args: &Args) -> Result<Option<MissionResult>> {
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path).context("loading tuning overrides")?,
        None => Tuning::default(),
    };
    let descriptor = level::builtin(&args.level)?;
    let mut sim = Simulation::new(descriptor, args.mission, tuning, args.seed)
        .with_context(|| format!("starting {} on {}", args.mission, args.level))?;

    let dt = 1.0 / f32::from(args.fps.max(1));
    while sim.clock() < args.seconds {
        let input = autopilot(&sim);
        for effect in sim.step_aabb(&input, dt) {
            match effect {
                Effect::MissionEnded(record) => return Ok(Some(*record)),
                Effect::PickupOccurred { label, .. } => info!("picked up cargo at {label}"),
                Effect::StopCompleted { next } => info!("stop done, heading for stop {next}"),
                Effect::CollisionOccurred { total, .. } => info!("collision #{total}"),
                Effect::Crushed {
                    category,
                    score_delta,
                    ..
                } => info!("crushed {category} ({score_delta:+})"),
                _ => {}
            }
        }
    }

    let hud = sim.hud();
    warn!(
        "run budget exhausted with {:.1}s left on the clock: {}",
        hud.time_remaining, hud.objective
    );
    Ok(None)
}

fn main() -> Result<()> {
    let args = Args::parse();
    if !init_logging(args.verbose) {
        warn!("logger already installed; --verbose has no effect");
    }

    let Some(record) = run(&args)? else {
        return Ok(());
    };
    info!(
        "{}",
        serde_json::to_string_pretty(&record).context("serialising mission record")?
    );

    if let Some(path) = &args.scores {
        let mut board = Leaderboard::new(JsonFileScoreStore::new(path));
        if record.success {
            let rank = board.submit(&args.player, record.score, record.mission_name)?;
            info!("leaderboard rank: {rank}");
        }
    }
    Ok(())
}
