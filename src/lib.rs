/*
 * Nexus Swarm Simulation - Module Definitions
 *
 * This file defines the module structure for the nexus simulation.
 * The simulation core (nexus, physics, lod) has no dependency on the
 * window; the viewer modules (app, renderer, ui) drive it from nannou.
 */

// Re-export key components for easier access
pub use app::Model;
pub use camera::Camera;
pub use debug::DebugInfo;
pub use error::ConfigError;
pub use headless::HeadlessSummary;
pub use input::{InputSnapshot, InputState};
pub use lod::{forward_visible, LodLevel, LodSelector, PointSink};
pub use nexus::{Nexus, NexusId};
pub use params::{SimulationParams, SpawnParams, WorldBounds};
pub use physics::Simulation;
pub use timestep::FixedStep;

// Define modules
pub mod app;
pub mod camera;
pub mod debug;
pub mod error;
pub mod headless;
pub mod input;
pub mod lod;
pub mod nexus;
pub mod params;
pub mod physics;
pub mod renderer;
pub mod timestep;
pub mod ui;
