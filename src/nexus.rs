/*
 * Nexus Module
 *
 * This module defines the Nexus struct: a cluster of colored points that
 * drifts through the world as a rigid group with one shared velocity.
 * Each nexus keeps its point offsets relative to its center, so moving the
 * center moves every point. The point count is fixed when the nexus is
 * created and never changes afterwards.
 */

use nannou::prelude::{vec3, Rgb, Vec3};
use rand::Rng;

use crate::params::{SimulationParams, WorldBounds};

pub type NexusId = usize;

#[derive(Clone, Debug)]
pub struct Nexus {
    pub id: NexusId,
    pub center: Vec3,
    pub velocity: Vec3,
    offsets: Vec<Vec3>,
    colors: Vec<Rgb<f32>>,
}

impl Nexus {
    pub fn new(id: NexusId, center: Vec3, velocity: Vec3, offsets: Vec<Vec3>, colors: Vec<Rgb<f32>>) -> Self {
        assert!(!offsets.is_empty(), "a nexus needs at least one point");
        assert_eq!(offsets.len(), colors.len(), "every point needs exactly one color");

        Self {
            id,
            center,
            velocity,
            offsets,
            colors,
        }
    }

    // Create a nexus with a random center, velocity, point cloud and colors
    pub fn random<R: Rng + ?Sized>(id: NexusId, rng: &mut R, params: &SimulationParams) -> Self {
        let spawn = &params.spawn;
        let center = vec3(
            rng.gen_range(spawn.center_min[0]..spawn.center_max[0]),
            rng.gen_range(spawn.center_min[1]..spawn.center_max[1]),
            rng.gen_range(spawn.center_min[2]..spawn.center_max[2]),
        );

        let velocity = if spawn.max_initial_speed > 0.0 {
            let s = spawn.max_initial_speed;
            vec3(rng.gen_range(-s..s), rng.gen_range(-s..s), rng.gen_range(-s..s))
        } else {
            Vec3::ZERO
        };

        let extent = spawn.offset_extent;
        let mut offsets = Vec::with_capacity(params.points_per_nexus);
        let mut colors = Vec::with_capacity(params.points_per_nexus);
        for _ in 0..params.points_per_nexus {
            offsets.push(vec3(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            ));
            colors.push(Rgb::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()));
        }

        Self::new(id, center, velocity, offsets, colors)
    }

    #[inline]
    pub fn point_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    pub fn colors(&self) -> &[Rgb<f32>] {
        &self.colors
    }

    // World-space positions and colors of all points, in stored order
    pub fn points(&self) -> impl Iterator<Item = (Vec3, Rgb<f32>)> + '_ {
        let center = self.center;
        self.offsets
            .iter()
            .zip(self.colors.iter())
            .map(move |(offset, color)| (center + *offset, *color))
    }

    // Move the whole group by one velocity step
    #[inline]
    pub fn translate(&mut self) {
        self.center += self.velocity;
    }

    // Flip every velocity component when the center has left the box.
    // Returns true if the nexus bounced.
    #[inline]
    pub fn reflect_if_outside(&mut self, bounds: &WorldBounds) -> bool {
        if bounds.is_outside(self.center) {
            self.velocity = -self.velocity;
            true
        } else {
            false
        }
    }

    // Decorative perturbation of every point offset. The phase of point j is
    // the flat index of its x component in an interleaved xyz buffer (3 * j).
    pub fn wobble(&mut self, time: f32, amplitude: f32) {
        for (j, offset) in self.offsets.iter_mut().enumerate() {
            let phase = time + (j * 3) as f32;
            offset.x += phase.sin() * amplitude;
            offset.y += phase.cos() * amplitude;
            offset.z += (phase + std::f32::consts::PI).sin() * amplitude;
        }
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.velocity += force;
    }

    #[inline]
    pub fn damp(&mut self, factor: f32) {
        self.velocity *= factor;
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite()
            && self.velocity.is_finite()
            && self.offsets.iter().all(|o| o.is_finite())
            && self
                .colors
                .iter()
                .all(|c| c.red.is_finite() && c.green.is_finite() && c.blue.is_finite())
    }
}
