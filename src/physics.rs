/*
 * Physics Module
 *
 * This module owns the nexuses and advances them one frame at a time.
 * Every call to advance runs, for each nexus:
 * 1. Translate: move the center by the velocity (not scaled by the frame time)
 * 2. Reflect: reverse the velocity when the center is outside the world bounds
 * 3. Wobble: perturb the point offsets with a time-based sine pattern
 * 4. Repulsion: push away from the camera when it is close
 * 5. Attraction: pull towards other nexuses that are close
 * 6. Damping: scale the velocity down
 *
 * Steps 1-3 run for every nexus before steps 4-6 start, so the pairwise
 * attraction always reads the centers of one consistent frame and the result
 * does not depend on the order the nexuses are stored in.
 */

use std::f64::consts::TAU;

use nannou::prelude::Vec3;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::nexus::Nexus;
use crate::params::SimulationParams;

pub struct Simulation {
    params: SimulationParams,
    nexuses: Vec<Nexus>,
    // Seconds since the simulation started, drives the wobble
    elapsed: f64,
    frame: u64,
    // Center snapshot reused between frames
    centers: Vec<Vec3>,
}

impl Simulation {
    // Create the configured number of random nexuses
    pub fn new(params: SimulationParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let mut rng = params.seeded_rng();
        let nexuses: Vec<Nexus> = (0..params.nexus_count)
            .map(|id| Nexus::random(id, &mut rng, &params))
            .collect();

        info!(
            nexuses = params.nexus_count,
            points_per_nexus = params.points_per_nexus,
            seed = ?params.rng_seed,
            "Created nexus simulation",
        );

        Ok(Self::with_nexuses(params, nexuses))
    }

    // Build a simulation around nexuses created by the caller
    pub fn from_nexuses(params: SimulationParams, nexuses: Vec<Nexus>) -> Result<Self, ConfigError> {
        params.validate()?;
        if nexuses.iter().any(|nexus| !nexus.is_finite()) {
            return Err(ConfigError::Invalid("nexus state must be finite"));
        }
        Ok(Self::with_nexuses(params, nexuses))
    }

    fn with_nexuses(params: SimulationParams, nexuses: Vec<Nexus>) -> Self {
        let centers = Vec::with_capacity(nexuses.len());
        Self {
            params,
            nexuses,
            elapsed: 0.0,
            frame: 0,
            centers,
        }
    }

    pub fn nexuses(&self) -> &[Nexus] {
        &self.nexuses
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    // Swap in new forces and toggles without touching the nexuses
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), ConfigError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    // Wobble clock wrapped to one period so it keeps f32 precision on long runs
    fn wobble_time(&self) -> f32 {
        (self.elapsed % TAU) as f32
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn total_points(&self) -> usize {
        self.nexuses.iter().map(Nexus::point_count).sum()
    }

    // Advance every nexus by one frame
    pub fn advance(&mut self, delta_seconds: f32, camera_position: Vec3) {
        let delta = if delta_seconds.is_finite() && delta_seconds >= 0.0 {
            delta_seconds
        } else {
            debug!(delta_seconds, "Clamping invalid frame delta to zero");
            0.0
        };
        self.elapsed += f64::from(delta);

        self.move_nexuses();

        if self.params.enable_wobble {
            self.wobble_nexuses();
        }

        self.apply_forces(camera_position);

        self.frame += 1;
    }

    // Translate and reflect
    fn move_nexuses(&mut self) {
        let bounds = self.params.bounds;
        let reflect = self.params.enable_reflection;

        for nexus in &mut self.nexuses {
            nexus.translate();

            if reflect && nexus.reflect_if_outside(&bounds) {
                debug!(nexus = nexus.id, frame = self.frame, "Nexus bounced off the world bounds");
            }
        }
    }

    fn wobble_nexuses(&mut self) {
        let time = self.wobble_time();
        let amplitude = self.params.wobble_amplitude;

        if self.params.enable_parallel {
            self.nexuses
                .par_iter_mut()
                .for_each(|nexus| nexus.wobble(time, amplitude));
        } else {
            for nexus in &mut self.nexuses {
                nexus.wobble(time, amplitude);
            }
        }
    }

    // Repulsion from the camera, attraction between nexuses, then damping
    fn apply_forces(&mut self, camera_position: Vec3) {
        let params = &self.params;

        self.centers.clear();
        self.centers.extend(self.nexuses.iter().map(|nexus| nexus.center));

        let camera_valid = camera_position.is_finite();
        if !camera_valid {
            debug!(?camera_position, "Ignoring non-finite camera position for repulsion");
        }

        for (i, nexus) in self.nexuses.iter_mut().enumerate() {
            let center = self.centers[i];

            if camera_valid && center.distance(camera_position) < params.repulsion_radius {
                let toward_camera = (camera_position - center).normalize_or_zero();
                nexus.apply_force(-toward_camera * params.repulsion_strength);
            }

            for (j, &other) in self.centers.iter().enumerate() {
                if i != j && center.distance(other) < params.attraction_radius {
                    let toward_other = (other - center).normalize_or_zero();
                    nexus.apply_force(toward_other * params.attraction_strength);
                }
            }

            nexus.damp(params.damping);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nannou::prelude::{vec3, Rgb};

    fn far_away() -> Vec3 {
        vec3(1000.0, 1000.0, 1000.0)
    }

    fn nexus(id: usize, center: Vec3, velocity: Vec3) -> Nexus {
        Nexus::new(id, center, velocity, vec![Vec3::ZERO; 4], vec![Rgb::new(1.0, 1.0, 1.0); 4])
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-7
    }

    #[test]
    fn builds_configured_nexuses() {
        let params = SimulationParams {
            nexus_count: 4,
            points_per_nexus: 50,
            rng_seed: Some(1),
            ..SimulationParams::default()
        };
        let simulation = Simulation::new(params).expect("simulation");
        assert_eq!(simulation.nexuses().len(), 4);
        assert_eq!(simulation.total_points(), 200);
        assert_eq!(simulation.frame(), 0);
    }

    #[test]
    fn rejects_invalid_params() {
        let params = SimulationParams { nexus_count: 0, ..SimulationParams::default() };
        assert!(Simulation::new(params).is_err());
    }

    #[test]
    fn translation_is_not_scaled_by_delta() {
        let params = SimulationParams::default();
        let mut a = Simulation::from_nexuses(params.clone(), vec![nexus(0, Vec3::ZERO, vec3(0.01, 0.0, 0.0))])
            .expect("simulation");
        let mut b = Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, vec3(0.01, 0.0, 0.0))])
            .expect("simulation");

        a.advance(1.0 / 60.0, far_away());
        b.advance(0.5, far_away());

        assert_eq!(a.nexuses()[0].center, vec3(0.01, 0.0, 0.0));
        assert_eq!(b.nexuses()[0].center, vec3(0.01, 0.0, 0.0));
    }

    #[test]
    fn camera_inside_radius_pushes_nexus_away() {
        let params = SimulationParams::default();
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, Vec3::ZERO)]).expect("simulation");

        simulation.advance(1.0 / 60.0, vec3(0.0, 0.0, 1.0));

        assert!(approx(simulation.nexuses()[0].velocity, vec3(0.0, 0.0, -0.01 * 0.99)));
    }

    #[test]
    fn camera_outside_radius_has_no_effect() {
        let params = SimulationParams::default();
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, Vec3::ZERO)]).expect("simulation");

        simulation.advance(1.0 / 60.0, vec3(0.0, 0.0, 5.0));

        assert_eq!(simulation.nexuses()[0].velocity, Vec3::ZERO);
    }

    #[test]
    fn nearby_nexuses_attract_each_other() {
        let params = SimulationParams::default();
        let mut simulation = Simulation::from_nexuses(
            params,
            vec![nexus(0, Vec3::ZERO, Vec3::ZERO), nexus(1, vec3(1.0, 0.0, 0.0), Vec3::ZERO)],
        )
        .expect("simulation");

        simulation.advance(1.0 / 60.0, far_away());

        let expected = 0.001 * 0.99;
        assert!(approx(simulation.nexuses()[0].velocity, vec3(expected, 0.0, 0.0)));
        assert!(approx(simulation.nexuses()[1].velocity, vec3(-expected, 0.0, 0.0)));
    }

    #[test]
    fn attraction_reads_post_translate_centers() {
        // The second nexus moves into range during this frame; both must see it
        let params = SimulationParams::default();
        let mut simulation = Simulation::from_nexuses(
            params,
            vec![nexus(0, Vec3::ZERO, Vec3::ZERO), nexus(1, vec3(2.5, 0.0, 0.0), vec3(-1.0, 0.0, 0.0))],
        )
        .expect("simulation");

        simulation.advance(1.0 / 60.0, far_away());

        assert!(simulation.nexuses()[0].velocity.x > 0.0);
        assert!(simulation.nexuses()[1].velocity.x < -0.98);
    }

    #[test]
    fn coincident_nexuses_do_not_produce_nan() {
        let params = SimulationParams::default();
        let mut simulation = Simulation::from_nexuses(
            params,
            vec![nexus(0, Vec3::ZERO, Vec3::ZERO), nexus(1, Vec3::ZERO, Vec3::ZERO)],
        )
        .expect("simulation");

        simulation.advance(1.0 / 60.0, Vec3::ZERO);

        assert!(simulation.nexuses().iter().all(Nexus::is_finite));
    }

    #[test]
    fn reflection_can_be_disabled() {
        let params = SimulationParams { enable_reflection: false, damping: 1.0, ..SimulationParams::default() };
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, vec3(15.0, 0.0, 0.0), vec3(0.1, 0.0, 0.0))])
                .expect("simulation");

        simulation.advance(1.0 / 60.0, far_away());

        assert_eq!(simulation.nexuses()[0].velocity, vec3(0.1, 0.0, 0.0));
    }

    #[test]
    fn wobble_can_be_disabled() {
        let params = SimulationParams { enable_wobble: false, ..SimulationParams::default() };
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, Vec3::ZERO)]).expect("simulation");

        for _ in 0..10 {
            simulation.advance(1.0 / 60.0, far_away());
        }

        assert!(simulation.nexuses()[0].offsets().iter().all(|o| *o == Vec3::ZERO));
    }

    #[test]
    fn invalid_delta_is_clamped() {
        let params = SimulationParams::default();
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, vec3(0.01, 0.0, 0.0))]).expect("simulation");

        simulation.advance(0.25, far_away());
        simulation.advance(f32::NAN, far_away());
        simulation.advance(-3.0, far_away());

        assert_eq!(simulation.elapsed(), 0.25);
        assert_eq!(simulation.frame(), 3);
        assert!(simulation.nexuses()[0].is_finite());
    }

    #[test]
    fn wobble_clock_keeps_running_after_days() {
        let mut simulation =
            Simulation::from_nexuses(SimulationParams::default(), vec![nexus(0, Vec3::ZERO, Vec3::ZERO)])
                .expect("simulation");
        simulation.elapsed = 2f64.powi(19);

        let step = 1.0 / 60.0;
        let mut previous = simulation.wobble_time();
        for _ in 0..120 {
            simulation.advance(step, far_away());
            let time = simulation.wobble_time();
            assert!((0.0..std::f32::consts::TAU + 1e-4).contains(&time));

            let advanced = (time - previous).rem_euclid(std::f32::consts::TAU);
            assert!((advanced - step).abs() < 1e-3);
            previous = time;
        }
        assert!(simulation.elapsed() > 2f64.powi(19) + 1.9);
    }

    #[test]
    fn non_finite_camera_is_ignored() {
        let params = SimulationParams::default();
        let mut simulation =
            Simulation::from_nexuses(params, vec![nexus(0, Vec3::ZERO, Vec3::ZERO)]).expect("simulation");

        simulation.advance(1.0 / 60.0, vec3(f32::NAN, 0.0, 0.0));

        assert_eq!(simulation.nexuses()[0].velocity, Vec3::ZERO);
        assert!(simulation.nexuses()[0].is_finite());
    }

    #[test]
    fn parallel_and_sequential_wobble_agree() {
        let base = SimulationParams {
            nexus_count: 5,
            points_per_nexus: 200,
            rng_seed: Some(99),
            ..SimulationParams::default()
        };
        let mut parallel = Simulation::new(SimulationParams { enable_parallel: true, ..base.clone() }).expect("simulation");
        let mut sequential = Simulation::new(SimulationParams { enable_parallel: false, ..base }).expect("simulation");

        for _ in 0..30 {
            parallel.advance(1.0 / 60.0, vec3(0.0, 1.6, 0.0));
            sequential.advance(1.0 / 60.0, vec3(0.0, 1.6, 0.0));
        }

        for (a, b) in parallel.nexuses().iter().zip(sequential.nexuses()) {
            assert_eq!(a.center, b.center);
            assert_eq!(a.velocity, b.velocity);
            assert_eq!(a.offsets(), b.offsets());
        }
    }
}
