//! Game Configuration
//!
//! Static tuning surface for the simulation. Every section derives
//! serde so a whole config can be loaded from JSON, and `Default`
//! carries the shipped game's constants. Call [`GameConfig::validate`]
//! after deserializing untrusted input.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Maze must have at least 2x2 cells.
    #[error("maze size must be at least 2, got {0}")]
    MazeTooSmall(usize),

    /// A length parameter must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Extra opening fraction outside [0, 1].
    #[error("extra_opening_fraction must be in [0, 1], got {0}")]
    BadOpeningFraction(f32),

    /// A session must start with at least one life.
    #[error("initial_lives must be at least 1")]
    ZeroLives,
}

/// Tire (player body) tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TireConfig {
    /// Tire radius in world units.
    pub radius: f32,
    /// Horizontal acceleration per tick while grounded and controlled.
    pub roll_speed: f32,
    /// Visual tilt rate per tick (renderer hint, not used in physics).
    pub tilt_speed: f32,
    /// Horizontal speed clamp.
    pub max_speed: f32,
}

impl Default for TireConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            roll_speed: 0.015,
            tilt_speed: 0.03,
            max_speed: 0.1,
        }
    }
}

/// Physics integration constants, all per-tick at 60 Hz.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration per tick.
    pub gravity: f32,
    /// Horizontal velocity multiplier per tick while grounded.
    pub friction: f32,
    /// Velocity fraction retained on wall bounce.
    pub restitution: f32,
    /// Horizontal velocity multiplier per tick while airborne.
    pub air_drag: f32,
    /// Whole-velocity multiplier applied after a wall collision.
    pub collision_damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.003,
            friction: 0.98,
            restitution: 0.25,
            air_drag: 0.9,
            collision_damping: 0.9,
        }
    }
}

/// Maze layout tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Grid dimension (the maze is size x size cells).
    pub size: usize,
    /// Side length of one cell in world units.
    pub cell_size: f32,
    /// Wall height above the floor.
    pub wall_height: f32,
    /// Wall thickness.
    pub wall_thickness: f32,
    /// Fraction of interior walls removed after carving, for loops.
    pub extra_opening_fraction: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            size: 15,
            cell_size: 5.0,
            wall_height: 3.0,
            wall_thickness: 0.5,
            extra_opening_fraction: 0.1,
        }
    }
}

/// Special door and static hazard tuning.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorConfig {
    /// Door footprint width and depth.
    pub door_size: f32,
    /// Door slab height.
    pub door_height: f32,
    /// Launch impulse magnitude for jumper doors.
    pub jumper_force: f32,
    /// Number of teleporter doors.
    pub teleporter_count: usize,
    /// Number of teleport destination doors.
    pub exit_count: usize,
    /// Number of jumper doors.
    pub jumper_count: usize,
    /// Number of candidate trap locations.
    pub trap_location_count: usize,
    /// Number of spike hazards.
    pub spike_count: usize,
    /// Number of lava hazards.
    pub lava_count: usize,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            door_size: 3.0,
            door_height: 0.1,
            jumper_force: 0.75,
            teleporter_count: 4,
            exit_count: 4,
            jumper_count: 2,
            trap_location_count: 5,
            spike_count: 3,
            lava_count: 2,
        }
    }
}

/// Session rules: lives, timers, scoring, bounds.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lives at session start.
    pub initial_lives: u32,
    /// Ticks between trap spawns (300 = 5 s at 60 Hz).
    pub trap_spawn_interval_ticks: u64,
    /// Ticks a spawned trap stays active (180 = 3 s).
    pub trap_duration_ticks: u64,
    /// Ticks after spawn/respawn during which traps and out-of-bounds
    /// checks are suppressed (300 = 5 s).
    pub grace_period_ticks: u64,
    /// Score awarded for using a teleporter.
    pub teleport_score: u32,
    /// Score awarded for using a jumper.
    pub jump_score: u32,
    /// Score awarded for completing the level.
    pub level_score: u32,
    /// Y below which the player counts as fallen out of the world.
    pub fall_floor_y: f32,
    /// Horizontal slack outside the maze before out-of-bounds triggers.
    pub bounds_buffer: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_lives: 3,
            trap_spawn_interval_ticks: 300,
            trap_duration_ticks: 180,
            grace_period_ticks: 300,
            teleport_score: 50,
            jump_score: 30,
            level_score: 500,
            fall_floor_y: -20.0,
            bounds_buffer: 5.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tire tuning.
    pub tire: TireConfig,
    /// Physics constants.
    pub physics: PhysicsConfig,
    /// Maze layout.
    pub maze: MazeConfig,
    /// Doors and hazards.
    pub doors: DoorConfig,
    /// Session rules.
    pub session: SessionConfig,
}

impl GameConfig {
    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.maze.size < 2 {
            return Err(ConfigError::MazeTooSmall(self.maze.size));
        }
        for (name, value) in [
            ("cell_size", self.maze.cell_size),
            ("wall_height", self.maze.wall_height),
            ("wall_thickness", self.maze.wall_thickness),
            ("radius", self.tire.radius),
            ("door_size", self.doors.door_size),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        let frac = self.maze.extra_opening_fraction;
        if !(0.0..=1.0).contains(&frac) {
            return Err(ConfigError::BadOpeningFraction(frac));
        }
        if self.session.initial_lives == 0 {
            return Err(ConfigError::ZeroLives);
        }
        Ok(())
    }
}
