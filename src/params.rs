/*
 * Simulation Parameters Module
 *
 * This module defines the SimulationParams struct that contains all the
 * adjustable parameters for the nexus simulation. A single struct enumerates
 * which optional behaviors (level of detail, idle wobble, boundary reflection)
 * are active. Parameters can be loaded from a JSON file, overridden from the
 * command line and modified through the UI. It also provides change detection
 * so the app knows when the nexuses have to be rebuilt.
 */

use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use nannou::prelude::{vec3, Vec3};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lod::LodLevel;

// Half-extents of the axis-aligned box the nexuses bounce inside
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldBounds {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    // True when any component of the point lies strictly outside the box
    #[inline]
    pub fn is_outside(&self, point: Vec3) -> bool {
        point.x.abs() > self.x || point.y.abs() > self.y || point.z.abs() > self.z
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::new(10.0, 5.0, 10.0)
    }
}

// Ranges nexuses are spawned in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    pub center_min: [f32; 3],
    pub center_max: [f32; 3],
    pub offset_extent: f32,
    pub max_initial_speed: f32,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            center_min: [-5.0, 1.0, -5.0],
            center_max: [5.0, 5.0, 5.0],
            offset_extent: 1.0,
            max_initial_speed: 0.01,
        }
    }
}

// Parameters for the simulation that can be adjusted via config file, CLI or UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParams {
    pub nexus_count: usize,
    pub points_per_nexus: usize,
    pub bounds: WorldBounds,
    pub spawn: SpawnParams,
    pub rng_seed: Option<u64>,

    // Forces
    pub wobble_amplitude: f32,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    pub attraction_radius: f32,
    pub attraction_strength: f32,
    pub damping: f32,

    // Level of detail, ordered by increasing distance
    pub lod_levels: Vec<LodLevel>,

    // Optional behaviors
    pub enable_lod: bool,
    pub enable_wobble: bool,
    pub enable_reflection: bool,
    pub enable_parallel: bool,

    // Viewer settings
    pub move_speed: f32,
    pub look_speed: f32,
    pub camera_start: [f32; 3],
    pub fixed_physics_fps: f32,
    pub point_size: f32,
    pub show_floor: bool,
    pub show_debug: bool,
    pub pause_simulation: bool,

    // Internal state for tracking changes
    #[serde(skip)]
    pub previous_values: Option<ParamSnapshot>,
}

// A snapshot of parameter values used for change detection
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSnapshot {
    nexus_count: usize,
    points_per_nexus: usize,
    rng_seed: Option<u64>,
    wobble_amplitude: f32,
    repulsion_strength: f32,
    attraction_strength: f32,
    damping: f32,
    enable_lod: bool,
    enable_wobble: bool,
    enable_reflection: bool,
    enable_parallel: bool,
    show_floor: bool,
    show_debug: bool,
    pause_simulation: bool,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            nexus_count: 7,
            points_per_nexus: 2000,
            bounds: WorldBounds::default(),
            spawn: SpawnParams::default(),
            rng_seed: None,
            wobble_amplitude: 0.002,
            repulsion_radius: 2.0,
            repulsion_strength: 0.01,
            attraction_radius: 2.0,
            attraction_strength: 0.001,
            damping: 0.99,
            lod_levels: vec![
                LodLevel::new(10.0, 2000),
                LodLevel::new(20.0, 1000),
                LodLevel::new(30.0, 500),
                LodLevel::new(40.0, 250),
                LodLevel::new(50.0, 100),
            ],
            enable_lod: true,
            enable_wobble: true,
            enable_reflection: true,
            enable_parallel: true,
            move_speed: 0.1,
            look_speed: 0.002,
            camera_start: [0.0, 1.6, 0.0],
            fixed_physics_fps: 60.0,
            point_size: 0.02,
            show_floor: true,
            show_debug: false,
            pause_simulation: false,
            previous_values: None,
        }
    }
}

impl SimulationParams {
    // Load parameters from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let params: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nexus_count == 0 {
            return Err(ConfigError::Invalid("nexus_count must be non-zero"));
        }
        if self.points_per_nexus == 0 {
            return Err(ConfigError::Invalid("points_per_nexus must be non-zero"));
        }
        let b = self.bounds;
        if !(b.x.is_finite() && b.y.is_finite() && b.z.is_finite()) || b.x <= 0.0 || b.y <= 0.0 || b.z <= 0.0 {
            return Err(ConfigError::Invalid("bounds must be positive and finite"));
        }
        let spawn_ok = self
            .spawn
            .center_min
            .iter()
            .zip(self.spawn.center_max.iter())
            .all(|(lo, hi)| lo.is_finite() && hi.is_finite() && lo < hi);
        if !spawn_ok {
            return Err(ConfigError::Invalid("spawn.center_min must be below spawn.center_max"));
        }
        if !(self.spawn.offset_extent.is_finite() && self.spawn.offset_extent > 0.0) {
            return Err(ConfigError::Invalid("spawn.offset_extent must be positive"));
        }
        if !(self.spawn.max_initial_speed.is_finite() && self.spawn.max_initial_speed >= 0.0) {
            return Err(ConfigError::Invalid("spawn.max_initial_speed must be non-negative"));
        }
        if !(self.repulsion_radius.is_finite() && self.repulsion_radius > 0.0)
            || !(self.attraction_radius.is_finite() && self.attraction_radius > 0.0)
        {
            return Err(ConfigError::Invalid("interaction radii must be positive"));
        }
        if !(self.wobble_amplitude.is_finite() && self.wobble_amplitude >= 0.0)
            || !(self.repulsion_strength.is_finite() && self.repulsion_strength >= 0.0)
            || !(self.attraction_strength.is_finite() && self.attraction_strength >= 0.0)
        {
            return Err(ConfigError::Invalid("force strengths must be non-negative"));
        }
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid("damping must be in (0, 1]"));
        }
        for pair in self.lod_levels.windows(2) {
            if pair[1].distance <= pair[0].distance {
                return Err(ConfigError::Invalid("lod_levels distances must be strictly increasing"));
            }
            if pair[1].visible_points > pair[0].visible_points {
                return Err(ConfigError::Invalid("lod_levels visible_points must not increase with distance"));
            }
        }
        if self.lod_levels.iter().any(|level| !level.distance.is_finite() || level.distance < 0.0) {
            return Err(ConfigError::Invalid("lod_levels distances must be finite and non-negative"));
        }
        if !(self.fixed_physics_fps.is_finite() && self.fixed_physics_fps > 0.0) {
            return Err(ConfigError::Invalid("fixed_physics_fps must be positive"));
        }
        if !(self.point_size.is_finite() && self.point_size > 0.0)
            || !(self.move_speed.is_finite() && self.move_speed >= 0.0)
            || !self.look_speed.is_finite()
        {
            return Err(ConfigError::Invalid("viewer sizes and speeds must be finite"));
        }
        if self.camera_start.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid("camera_start must be finite"));
        }
        Ok(())
    }

    pub fn camera_start(&self) -> Vec3 {
        vec3(self.camera_start[0], self.camera_start[1], self.camera_start[2])
    }

    // Returns an RNG from the configured seed, or from entropy if absent
    pub fn seeded_rng(&self) -> SmallRng {
        match self.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }

    // Take a snapshot of current parameter values for change detection
    pub fn take_snapshot(&mut self) {
        self.previous_values = Some(self.snapshot());
    }

    fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            nexus_count: self.nexus_count,
            points_per_nexus: self.points_per_nexus,
            rng_seed: self.rng_seed,
            wobble_amplitude: self.wobble_amplitude,
            repulsion_strength: self.repulsion_strength,
            attraction_strength: self.attraction_strength,
            damping: self.damping,
            enable_lod: self.enable_lod,
            enable_wobble: self.enable_wobble,
            enable_reflection: self.enable_reflection,
            enable_parallel: self.enable_parallel,
            show_floor: self.show_floor,
            show_debug: self.show_debug,
            pause_simulation: self.pause_simulation,
        }
    }

    // Check if any parameters have changed since the last snapshot
    // Returns a tuple of (nexuses_need_rebuild, any_ui_changed)
    pub fn detect_changes(&self) -> (bool, bool) {
        let Some(prev) = &self.previous_values else {
            return (false, false);
        };
        let current = self.snapshot();

        let structural = current.nexus_count != prev.nexus_count
            || current.points_per_nexus != prev.points_per_nexus
            || current.rng_seed != prev.rng_seed;

        (structural, structural || current != *prev)
    }

    // Get parameter ranges for UI sliders
    pub fn get_nexus_count_range() -> RangeInclusive<usize> {
        1..=64
    }

    pub fn get_points_per_nexus_range() -> RangeInclusive<usize> {
        1..=20000
    }

    pub fn get_strength_range() -> RangeInclusive<f32> {
        0.0..=0.05
    }

    pub fn get_damping_range() -> RangeInclusive<f32> {
        0.9..=1.0
    }

    pub fn get_move_speed_range() -> RangeInclusive<f32> {
        0.01..=1.0
    }
}
