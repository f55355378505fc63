/*
 * Headless Module
 *
 * Runs the simulation without a window at a fixed frame rate. Used by the
 * `--headless` command line mode and by the benchmarks. The camera stays at
 * its configured start position for the whole run.
 */

use nannou::prelude::{Rgb, Vec3};
use tracing::info;

use crate::error::ConfigError;
use crate::lod::{forward_visible, LodSelector, PointSink};
use crate::nexus::NexusId;
use crate::params::SimulationParams;
use crate::physics::Simulation;

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub elapsed: f64,
    pub total_points: usize,
    pub visible_points: usize,
    pub mean_speed: f32,
    pub max_speed: f32,
    pub centers: Vec<Vec3>,
}

// Sink that only counts what it receives
#[derive(Debug, Default)]
pub struct CountingSink {
    pub points: usize,
}

impl PointSink for CountingSink {
    fn submit(&mut self, _nexus: NexusId, points: &mut dyn Iterator<Item = (Vec3, Rgb<f32>)>) {
        self.points += points.count();
    }
}

pub fn run(params: SimulationParams, frames: u64) -> Result<HeadlessSummary, ConfigError> {
    let mut simulation = Simulation::new(params)?;
    Ok(run_simulation(&mut simulation, frames))
}

pub fn run_simulation(simulation: &mut Simulation, frames: u64) -> HeadlessSummary {
    let params = simulation.params().clone();
    let camera = params.camera_start();
    let delta = 1.0 / params.fixed_physics_fps;

    for _ in 0..frames {
        simulation.advance(delta, camera);
    }

    let selector = params.enable_lod.then(|| LodSelector::new(params.lod_levels.clone()));
    let mut sink = CountingSink::default();
    let visible_points = forward_visible(simulation, camera, selector.as_ref(), &mut sink);
    debug_assert_eq!(visible_points, sink.points);

    let speeds: Vec<f32> = simulation.nexuses().iter().map(|n| n.velocity.length()).collect();
    let mean_speed = speeds.iter().sum::<f32>() / speeds.len().max(1) as f32;
    let max_speed = speeds.iter().cloned().fold(0.0, f32::max);

    let summary = HeadlessSummary {
        frames: simulation.frame(),
        elapsed: simulation.elapsed(),
        total_points: simulation.total_points(),
        visible_points,
        mean_speed,
        max_speed,
        centers: simulation.nexuses().iter().map(|n| n.center).collect(),
    };

    info!(
        frames = summary.frames,
        elapsed = summary.elapsed,
        total_points = summary.total_points,
        visible_points = summary.visible_points,
        mean_speed = summary.mean_speed,
        max_speed = summary.max_speed,
        "Headless run finished",
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params(seed: u64) -> SimulationParams {
        SimulationParams {
            nexus_count: 3,
            points_per_nexus: 64,
            rng_seed: Some(seed),
            ..SimulationParams::default()
        }
    }

    #[test]
    fn runs_requested_frames() {
        let summary = run(small_params(5), 120).expect("run");
        assert_eq!(summary.frames, 120);
        assert_eq!(summary.total_points, 192);
        assert_eq!(summary.centers.len(), 3);
        assert!((summary.elapsed - 2.0).abs() < 1e-3);
    }

    #[test]
    fn same_seed_same_result() {
        let a = run(small_params(21), 300).expect("run");
        let b = run(small_params(21), 300).expect("run");
        assert_eq!(a, b);
    }

    #[test]
    fn lod_disabled_forwards_everything() {
        let params = SimulationParams {
            enable_lod: false,
            camera_start: [500.0, 0.0, 0.0],
            ..small_params(2)
        };
        let summary = run(params, 1).expect("run");
        assert_eq!(summary.visible_points, summary.total_points);
    }

    #[test]
    fn distant_camera_thins_points() {
        let params = SimulationParams {
            points_per_nexus: 2000,
            camera_start: [500.0, 0.0, 0.0],
            ..small_params(2)
        };
        let summary = run(params, 1).expect("run");
        assert_eq!(summary.visible_points, 3 * 100);
    }
}
