/*
 * Application Module
 *
 * This module defines the main application model for the nexus viewer.
 * It creates the window, routes window events into the input state and
 * runs the simulation with a fixed timestep:
 * - Input events are collected into InputState and read once per frame
 * - The camera moves from that snapshot before physics runs
 * - Physics advances in fixed steps, catching up after slow frames
 */

use std::sync::OnceLock;
use std::time::Instant;

use nannou::prelude::*;
use nannou::winit::event::{MouseButton, WindowEvent};
use nannou_egui::Egui;
use tracing::{info, warn};

use crate::camera::Camera;
use crate::debug::DebugInfo;
use crate::input::InputState;
use crate::lod::LodSelector;
use crate::params::SimulationParams;
use crate::physics::Simulation;
use crate::renderer;
use crate::timestep::FixedStep;
use crate::ui;

// Parameters chosen on the command line, read when nannou builds the model
static INITIAL_PARAMS: OnceLock<SimulationParams> = OnceLock::new();

pub fn set_initial_params(params: SimulationParams) {
    if INITIAL_PARAMS.set(params).is_err() {
        warn!("Initial parameters were already set; keeping the first value");
    }
}

// Main model for the application
pub struct Model {
    pub simulation: Simulation,
    pub params: SimulationParams,
    pub lod: LodSelector,
    pub egui: Egui,
    pub debug_info: DebugInfo,
    pub camera: Camera,
    pub input: InputState,
    // Fixed timestep physics
    pub timestep: FixedStep,
    pub last_update_time: Instant,
}

// Initialize the model
pub fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Nexus Swarm")
        .size(1280, 800)
        .view(renderer::view)
        .key_pressed(key_pressed)
        .key_released(key_released)
        .mouse_moved(mouse_moved)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .unfocused(unfocused)
        .raw_event(raw_window_event)
        .build()
        .expect("Failed to build the main window");

    let window = app.window(window_id).expect("Main window vanished after creation");
    let egui = Egui::from_window(&window);

    let params = INITIAL_PARAMS.get().cloned().unwrap_or_default();
    let simulation = Simulation::new(params.clone()).expect("Simulation parameters are validated before launch");
    let lod = LodSelector::new(params.lod_levels.clone());
    let camera = Camera::new(params.camera_start());
    let timestep = FixedStep::from_rate(params.fixed_physics_fps);

    let mut debug_info = DebugInfo::default();
    debug_info.total_points = simulation.total_points();

    info!(
        nexuses = simulation.nexuses().len(),
        points = simulation.total_points(),
        "Viewer ready",
    );

    Model {
        simulation,
        params,
        lod,
        egui,
        debug_info,
        camera,
        input: InputState::new(),
        timestep,
        last_update_time: Instant::now(),
    }
}

// Update the model
pub fn update(app: &App, model: &mut Model, update: Update) {
    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;

    let (rebuild, ui_changed, reset_camera) =
        ui::update_ui(&mut model.egui, &mut model.params, &model.debug_info);

    if rebuild {
        rebuild_simulation(model);
    } else if ui_changed {
        apply_params(model);
    }

    if reset_camera {
        model.camera = Camera::new(model.params.camera_start());
    }

    // One input snapshot per frame
    let input = model.input.snapshot();
    model
        .camera
        .apply_input(&input, model.params.move_speed, model.params.look_speed);

    step_physics(model);

    model.debug_info.simulation_frame = model.simulation.frame();
    model.debug_info.camera_position = model.camera.position;
}

// Run as many fixed physics steps as the elapsed time calls for
fn step_physics(model: &mut Model) {
    let now = Instant::now();
    let frame_time = now.duration_since(model.last_update_time);
    model.last_update_time = now;

    let steps = model.timestep.steps(frame_time, model.params.pause_simulation);
    let step_secs = model.timestep.step().as_secs_f32();
    for _ in 0..steps {
        model.simulation.advance(step_secs, model.camera.position);
    }

    model.debug_info.physics_updates_per_frame = steps;
}

// Recreate the nexuses after a structural parameter change
fn rebuild_simulation(model: &mut Model) {
    match Simulation::new(model.params.clone()) {
        Ok(simulation) => {
            info!(
                nexuses = model.params.nexus_count,
                points_per_nexus = model.params.points_per_nexus,
                "Rebuilt nexuses",
            );
            model.debug_info.total_points = simulation.total_points();
            model.simulation = simulation;
            apply_params(model);
        }
        Err(err) => warn!(%err, "Keeping current nexuses, new parameters are invalid"),
    }
}

// Push forces and toggles from the UI into the running simulation
fn apply_params(model: &mut Model) {
    if let Err(err) = model.simulation.set_params(model.params.clone()) {
        warn!(%err, "Ignoring invalid parameter change");
        return;
    }
    model.lod = LodSelector::new(model.params.lod_levels.clone());
    model
        .timestep
        .set_step(FixedStep::from_rate(model.params.fixed_physics_fps).step());
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    model.input.key_changed(key, true);
}

fn key_released(_app: &App, model: &mut Model, key: Key) {
    model.input.key_changed(key, false);
}

fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    model.input.cursor_moved(pos);
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    // Clicks on the control panel do not turn the camera
    if button == MouseButton::Left && !model.egui.ctx().is_pointer_over_area() {
        model.input.begin_look(app.mouse.position());
    }
}

fn mouse_released(_app: &App, model: &mut Model, button: MouseButton) {
    if button == MouseButton::Left {
        model.input.end_look();
    }
}

fn unfocused(_app: &App, model: &mut Model) {
    model.input.clear();
}

// Pass raw events to egui
fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    model.egui.handle_raw_event(event);
}
