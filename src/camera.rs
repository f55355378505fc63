/*
 * Camera Module
 *
 * This module defines the first-person Camera: a position plus yaw and pitch.
 * It moves from a per-frame input snapshot and projects world points to
 * screen space with a simple perspective transform, which is all the
 * renderer needs to draw the nexus point clouds.
 */

use nannou::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::input::InputSnapshot;

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov_y: 75.0f32.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    // Unit view direction; yaw = pitch = 0 looks down -Z
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        vec3(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
    }

    // Horizontal unit vector to the right of the view direction
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        vec3(cos_yaw, 0.0, -sin_yaw)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    // Apply one frame of look and movement input
    pub fn apply_input(&mut self, input: &InputSnapshot, move_speed: f32, look_speed: f32) {
        self.yaw -= input.look_delta.x * look_speed;
        self.pitch += input.look_delta.y * look_speed;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);

        let forward = self.forward();
        let right = self.right();

        if input.forward {
            self.position += forward * move_speed;
        }
        if input.backward {
            self.position -= forward * move_speed;
        }
        if input.left {
            self.position -= right * move_speed;
        }
        if input.right {
            self.position += right * move_speed;
        }
    }

    // Pixels per world unit at depth 1
    pub fn focal_length(&self, window_rect: Rect) -> f32 {
        (window_rect.h() / 2.0) / (self.fov_y / 2.0).tan()
    }

    // Project a world point to window coordinates. Returns the screen position
    // and the view depth, or None when the point is outside the near/far range.
    pub fn world_to_screen(&self, point: Vec3, window_rect: Rect) -> Option<(Vec2, f32)> {
        let relative = point - self.position;
        let depth = relative.dot(self.forward());

        if depth < self.near || depth > self.far {
            return None;
        }

        let focal = self.focal_length(window_rect);
        let view = vec2(relative.dot(self.right()), relative.dot(self.up()));

        Some((view * (focal / depth) + window_rect.xy(), depth))
    }

    // Cut a world segment where it crosses behind the near plane. The cut is
    // placed at twice the near distance so both ends still project.
    pub fn clip_segment(&self, start: Vec3, end: Vec3) -> Option<(Vec3, Vec3)> {
        let forward = self.forward();
        let plane = self.near * 2.0;
        let depth_start = (start - self.position).dot(forward);
        let depth_end = (end - self.position).dot(forward);

        match (depth_start >= plane, depth_end >= plane) {
            (true, true) => Some((start, end)),
            (false, false) => None,
            (true, false) => {
                let t = (depth_start - plane) / (depth_start - depth_end);
                Some((start, start.lerp(end, t)))
            }
            (false, true) => {
                let t = (plane - depth_start) / (depth_end - depth_start);
                Some((start.lerp(end, t), end))
            }
        }
    }
}
