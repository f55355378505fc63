/*
 * UI Module
 *
 * This module contains the egui control panel for the nexus viewer.
 * It exposes the optional behaviors (LOD, wobble, reflection), the force
 * constants and the nexus layout. Parameter change detection is handled by
 * the SimulationParams struct.
 */

use nannou_egui::{egui, Egui};

use crate::debug::DebugInfo;
use crate::params::SimulationParams;

// Update the UI and return whether the nexuses must be rebuilt, whether any
// parameter changed and whether the camera should be reset
pub fn update_ui(egui: &mut Egui, params: &mut SimulationParams, debug_info: &DebugInfo) -> (bool, bool, bool) {
    let mut reset_nexuses = false;
    let mut reset_camera = false;

    params.take_snapshot();

    let ctx = egui.begin_frame();

    egui::Window::new("Nexus Controls")
        .default_pos([10.0, 10.0])
        .show(&ctx, |ui| {
            ui.collapsing("Nexuses", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.nexus_count, SimulationParams::get_nexus_count_range())
                        .text("Nexus Count"),
                );
                ui.add(
                    egui::Slider::new(&mut params.points_per_nexus, SimulationParams::get_points_per_nexus_range())
                        .text("Points per Nexus"),
                );

                if ui.button("Reset Nexuses").clicked() {
                    reset_nexuses = true;
                }
            });

            ui.collapsing("Behavior", |ui| {
                ui.checkbox(&mut params.enable_lod, "Level of Detail");
                ui.checkbox(&mut params.enable_wobble, "Idle Wobble");
                ui.checkbox(&mut params.enable_reflection, "Boundary Reflection");
                ui.checkbox(&mut params.enable_parallel, "Parallel Wobble");
            });

            ui.collapsing("Forces", |ui| {
                ui.add(
                    egui::Slider::new(&mut params.repulsion_strength, SimulationParams::get_strength_range())
                        .text("Player Repulsion"),
                );
                ui.add(
                    egui::Slider::new(&mut params.attraction_strength, SimulationParams::get_strength_range())
                        .text("Nexus Attraction"),
                );
                ui.add(
                    egui::Slider::new(&mut params.wobble_amplitude, SimulationParams::get_strength_range())
                        .text("Wobble Amplitude"),
                );
                ui.add(egui::Slider::new(&mut params.damping, SimulationParams::get_damping_range()).text("Damping"));
            });

            ui.collapsing("Camera", |ui| {
                ui.label("Move: W/A/S/D");
                ui.label("Look: drag with the left mouse button");
                ui.add(
                    egui::Slider::new(&mut params.move_speed, SimulationParams::get_move_speed_range())
                        .text("Move Speed"),
                );
                if ui.button("Reset Camera").clicked() {
                    reset_camera = true;
                }
                let p = debug_info.camera_position;
                ui.label(format!("Position: ({:.1}, {:.1}, {:.1})", p.x, p.y, p.z));
            });

            ui.collapsing("Performance", |ui| {
                ui.label(format!("FPS: {:.1}", debug_info.fps));
                ui.label(format!("Frame time: {:.2} ms", debug_info.frame_time.as_secs_f64() * 1000.0));
                ui.label(format!("Physics steps this frame: {}", debug_info.physics_updates_per_frame));
                ui.label(format!("Simulation frame: {}", debug_info.simulation_frame));
                ui.label(format!(
                    "Visible points: {} / {} ({:.0}%)",
                    debug_info.visible_points.get(),
                    debug_info.total_points,
                    debug_info.lod_ratio() * 100.0
                ));
            });

            ui.checkbox(&mut params.show_floor, "Show Floor");
            ui.checkbox(&mut params.show_debug, "Show Debug Info");
            ui.checkbox(&mut params.pause_simulation, "Pause Simulation");
        });

    let (structural_change, ui_changed) = params.detect_changes();

    (reset_nexuses || structural_change, ui_changed, reset_camera)
}
