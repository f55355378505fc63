/*
 * Renderer Module
 *
 * This module draws the nexus simulation from the first-person camera.
 * It draws the floor grid and the points that survive level-of-detail
 * thinning, then the egui panel on top.
 *
 * Optimized for performance by:
 * - Only drawing the LOD prefix of each nexus
 * - Skipping points behind the camera or beyond the far plane
 */

use nannou::prelude::*;
use tracing::warn;

use crate::app::Model;
use crate::camera::Camera;
use crate::lod::{self, PointSink};
use crate::nexus::NexusId;

// 20x20 floor grid at y = -0.5
const FLOOR_HALF_SIZE: f32 = 10.0;
const FLOOR_HEIGHT: f32 = -0.5;
const FLOOR_LINES: usize = 21;

// Draws submitted points as small squares scaled by distance
struct ScreenSink<'a> {
    draw: &'a Draw,
    camera: &'a Camera,
    window_rect: Rect,
    focal: f32,
    point_size: f32,
}

impl PointSink for ScreenSink<'_> {
    fn submit(&mut self, _nexus: NexusId, points: &mut dyn Iterator<Item = (Vec3, Rgb<f32>)>) {
        for (position, color) in points {
            let Some((screen, depth)) = self.camera.world_to_screen(position, self.window_rect) else {
                continue;
            };
            if !self.window_rect.contains(screen) {
                continue;
            }

            let size = (self.point_size * self.focal / depth).max(1.0);
            self.draw
                .rect()
                .xy(screen)
                .w_h(size, size)
                .color(color);
        }
    }
}

// Render the model
pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    draw.background().color(BLACK);

    let window_rect = app.window_rect();

    if model.params.show_floor {
        draw_floor(&draw, &model.camera, window_rect);
    }

    let mut sink = ScreenSink {
        draw: &draw,
        camera: &model.camera,
        window_rect,
        focal: model.camera.focal_length(window_rect),
        point_size: model.params.point_size,
    };

    let selector = model.params.enable_lod.then_some(&model.lod);
    let visible = lod::forward_visible(&model.simulation, model.camera.position, selector, &mut sink);
    model.debug_info.visible_points.set(visible);

    if model.params.show_debug {
        draw_debug_overlay(&draw, model, window_rect);
    }

    if let Err(err) = draw.to_frame(app, &frame) {
        warn!(?err, "Failed to draw frame");
    }

    if let Err(err) = model.egui.draw_to_frame(&frame) {
        warn!(?err, "Failed to draw UI");
    }
}

fn draw_floor(draw: &Draw, camera: &Camera, window_rect: Rect) {
    let color = rgba(0.8, 0.8, 0.8, 0.5);
    let step = 2.0 * FLOOR_HALF_SIZE / (FLOOR_LINES - 1) as f32;

    for i in 0..FLOOR_LINES {
        let offset = -FLOOR_HALF_SIZE + i as f32 * step;

        let lines = [
            (vec3(offset, FLOOR_HEIGHT, -FLOOR_HALF_SIZE), vec3(offset, FLOOR_HEIGHT, FLOOR_HALF_SIZE)),
            (vec3(-FLOOR_HALF_SIZE, FLOOR_HEIGHT, offset), vec3(FLOOR_HALF_SIZE, FLOOR_HEIGHT, offset)),
        ];

        for (start, end) in lines {
            let Some((start, end)) = camera.clip_segment(start, end) else {
                continue;
            };
            if let (Some((a, _)), Some((b, _))) = (
                camera.world_to_screen(start, window_rect),
                camera.world_to_screen(end, window_rect),
            ) {
                draw.line().start(a).end(b).weight(1.0).color(color);
            }
        }
    }
}

// Small text overlay in the bottom-left corner
fn draw_debug_overlay(draw: &Draw, model: &Model, window_rect: Rect) {
    let info = &model.debug_info;
    let lines = [
        format!("FPS: {:.1}", info.fps),
        format!("Points: {} / {}", info.visible_points.get(), info.total_points),
        format!("Physics steps: {}", info.physics_updates_per_frame),
        format!(
            "Camera: ({:.1}, {:.1}, {:.1})",
            info.camera_position.x, info.camera_position.y, info.camera_position.z
        ),
    ];

    let margin = 20.0;
    let line_height = 18.0;
    for (i, text) in lines.iter().enumerate() {
        draw.text(text)
            .x_y(
                window_rect.left() + margin + 100.0,
                window_rect.bottom() + margin + (lines.len() - i) as f32 * line_height,
            )
            .w(200.0)
            .left_justify()
            .color(WHITE)
            .font_size(14);
    }
}
