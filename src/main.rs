/*
 * Nexus Swarm Simulation
 *
 * A first-person walk through a handful of drifting point clouds ("nexuses").
 * Each nexus bounces inside the world bounds, wobbles in place, drifts away
 * from the player when approached and is pulled towards nearby nexuses.
 * Distant nexuses are drawn with fewer points.
 *
 * Run with --headless <FRAMES> to simulate without a window.
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use nexuses::{app, headless, SimulationParams};

#[derive(Parser, Debug)]
#[command(name = "nexuses", version, about = "First-person particle swarm simulation")]
struct Args {
    /// JSON file with simulation parameters; missing fields keep their defaults
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed for spawning nexuses (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of nexuses
    #[arg(long, value_name = "N")]
    nexuses: Option<usize>,

    /// Points in each nexus
    #[arg(long, value_name = "N")]
    points: Option<usize>,

    /// Simulate this many frames without opening a window
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,

    /// Draw every point regardless of distance
    #[arg(long)]
    no_lod: bool,

    /// Turn off the idle wobble
    #[arg(long)]
    no_wobble: bool,

    /// Let nexuses leave the world bounds
    #[arg(long)]
    no_reflection: bool,
}

impl Args {
    fn params(&self) -> Result<SimulationParams> {
        let mut params = match &self.config {
            Some(path) => SimulationParams::from_json_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SimulationParams::default(),
        };

        if let Some(seed) = self.seed {
            params.rng_seed = Some(seed);
        }
        if let Some(count) = self.nexuses {
            params.nexus_count = count;
        }
        if let Some(points) = self.points {
            params.points_per_nexus = points;
        }
        params.enable_lod &= !self.no_lod;
        params.enable_wobble &= !self.no_wobble;
        params.enable_reflection &= !self.no_reflection;

        params.validate().context("invalid command line parameters")?;
        Ok(params)
    }
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let params = args.params()?;

    if let Some(frames) = args.headless {
        let summary = headless::run(params, frames)?;
        for (id, center) in summary.centers.iter().enumerate() {
            info!(nexus = id, x = center.x, y = center.y, z = center.z, "Final nexus center");
        }
        return Ok(());
    }

    info!("Starting nexus viewer");
    app::set_initial_params(params);
    nannou::app(app::model).update(app::update).run();

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
