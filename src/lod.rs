/*
 * Level of Detail Module
 *
 * This module decides how many points of each nexus are handed to the
 * renderer this frame, based only on the distance between the camera and
 * the nexus center. Points are always forwarded in their stored order, so a
 * nexus that is thinned out shows a stable prefix of its points and nothing
 * is deleted from the simulation.
 *
 * The renderer is reached through the PointSink trait; the simulation never
 * calls back into drawing code.
 */

use nannou::prelude::{Rgb, Vec3};
use serde::{Deserialize, Serialize};

use crate::nexus::{Nexus, NexusId};
use crate::physics::Simulation;

// Beyond `distance`, at most `visible_points` points are drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LodLevel {
    pub distance: f32,
    pub visible_points: usize,
}

impl LodLevel {
    pub fn new(distance: f32, visible_points: usize) -> Self {
        Self {
            distance,
            visible_points,
        }
    }
}

// Passive receiver for the points that survive level-of-detail thinning
pub trait PointSink {
    fn submit(&mut self, nexus: NexusId, points: &mut dyn Iterator<Item = (Vec3, Rgb<f32>)>);
}

impl PointSink for Vec<(NexusId, Vec3, Rgb<f32>)> {
    fn submit(&mut self, nexus: NexusId, points: &mut dyn Iterator<Item = (Vec3, Rgb<f32>)>) {
        self.extend(points.map(|(position, color)| (nexus, position, color)));
    }
}

#[derive(Debug, Clone)]
pub struct LodSelector {
    levels: Vec<LodLevel>,
}

impl LodSelector {
    // Levels must be ordered by increasing distance (checked by SimulationParams::validate)
    pub fn new(levels: Vec<LodLevel>) -> Self {
        debug_assert!(levels.windows(2).all(|w| w[0].distance < w[1].distance));
        Self { levels }
    }

    // Number of points of `nexus` to draw from `camera`
    pub fn select(&self, nexus: &Nexus, camera: Vec3) -> usize {
        let distance = nexus.center.distance(camera);
        self.count_for_distance(distance, nexus.point_count())
    }

    pub fn count_for_distance(&self, distance: f32, point_count: usize) -> usize {
        let mut visible = point_count;

        for level in &self.levels {
            if distance > level.distance {
                visible = level.visible_points;
            } else {
                break;
            }
        }

        visible.min(point_count)
    }
}

// Send the visible prefix of every nexus to the sink and return how many
// points were forwarded in total. With `selector` absent every point is sent.
pub fn forward_visible<S: PointSink + ?Sized>(
    simulation: &Simulation,
    camera: Vec3,
    selector: Option<&LodSelector>,
    sink: &mut S,
) -> usize {
    let mut total = 0;

    for nexus in simulation.nexuses() {
        let count = match selector {
            Some(selector) => selector.select(nexus, camera),
            None => nexus.point_count(),
        };

        let mut points = nexus.points().take(count);
        sink.submit(nexus.id, &mut points);
        total += count;
    }

    total
}
