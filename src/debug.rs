/*
 * Debug Information Module
 *
 * This module defines the DebugInfo struct that contains performance metrics
 * and other debug information to be displayed in the UI.
 *
 * Includes metrics for:
 * - FPS (frames per second)
 * - Frame time
 * - Number of points drawn after level of detail vs. stored points
 * - Physics steps taken this frame
 */

use std::cell::Cell;
use std::time::Duration;

use nannou::prelude::Vec3;

// Debug information to display
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    // Written by the renderer, which only has shared access to the model
    pub visible_points: Cell<usize>,
    pub total_points: usize,
    pub physics_updates_per_frame: usize,
    pub simulation_frame: u64,
    pub camera_position: Vec3,
}

impl Default for DebugInfo {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time: Duration::ZERO,
            visible_points: Cell::new(0),
            total_points: 0,
            physics_updates_per_frame: 0,
            simulation_frame: 0,
            camera_position: Vec3::ZERO,
        }
    }
}

impl DebugInfo {
    // Share of stored points that made it to the screen
    pub fn lod_ratio(&self) -> f32 {
        if self.total_points == 0 {
            return 0.0;
        }
        self.visible_points.get() as f32 / self.total_points as f32
    }
}
