//! Player Body Physics
//!
//! The tire is integrated as a point body with a radius: gravity,
//! ground friction, strong airborne drag, directional acceleration
//! while grounded and controllable, and a speed clamp. Roll angles are
//! tracked for the renderer but never feed back into physics.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::{PhysicsConfig, TireConfig};
use crate::game::input::InputFrame;

/// Motion state derived from the body flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionState {
    /// Resting on the floor, player input applies.
    Grounded,
    /// Off the floor under normal gravity.
    Airborne,
    /// Launched by a jumper door; control is locked until landing.
    LaunchedNoControl,
}

/// The player's tire body.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Center position in world space.
    pub position: Vec3,
    /// Velocity in world units per tick.
    pub velocity: Vec3,
    /// Rotation around the x axis (forward roll), renderer hint.
    pub pitch: f32,
    /// Rotation around the z axis (sideways roll), renderer hint.
    pub roll: f32,
    /// Tire radius.
    pub radius: f32,
    on_ground: bool,
    in_air: bool,
    can_control: bool,
}

impl PlayerBody {
    /// Place a fresh body at a spawn position.
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            pitch: 0.0,
            roll: 0.0,
            radius,
            on_ground: false,
            in_air: false,
            can_control: true,
        }
    }

    /// Current motion state.
    pub fn motion_state(&self) -> MotionState {
        if !self.can_control {
            MotionState::LaunchedNoControl
        } else if self.on_ground {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        }
    }

    /// Is the body resting on the floor?
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Does player input currently steer the body?
    pub fn can_control(&self) -> bool {
        self.can_control
    }

    /// Height at or below which the body counts as grounded.
    ///
    /// Deliberately generous (half a unit of slack) so the tire does
    /// not flicker between states while rolling over seams.
    pub fn ground_height(&self) -> f32 {
        self.radius + 0.5
    }

    /// Advance one tick of tire physics.
    pub fn update(&mut self, input: &InputFrame, tire: &TireConfig, physics: &PhysicsConfig) {
        let ground_height = self.ground_height();
        self.on_ground = self.position.y <= ground_height;

        if !self.on_ground {
            self.in_air = true;
            // Airborne drag kills horizontal momentum quickly
            self.velocity.x *= physics.air_drag;
            self.velocity.z *= physics.air_drag;
        } else if self.in_air && self.velocity.y <= 0.0 {
            // Just landed; an ascending launch still counts as airborne
            // even inside the ground slack band
            self.in_air = false;
            self.can_control = true;
        }

        if !self.on_ground {
            self.velocity.y -= physics.gravity;
        } else {
            self.velocity.y = self.velocity.y.max(0.0);
            if self.position.y < ground_height {
                self.position.y = ground_height;
            }
        }

        if self.can_control && self.on_ground {
            self.velocity.x += input.steer_x() * tire.roll_speed;
            self.velocity.z += input.steer_z() * tire.roll_speed;
        } else if !self.can_control {
            // Launched: the jumper owns the trajectory until landing
            self.velocity.x = 0.0;
            self.velocity.z = 0.0;
        }

        self.velocity.x *= physics.friction;
        self.velocity.z *= physics.friction;

        let horizontal = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let speed = horizontal.length();
        if speed > tire.max_speed {
            let scale = tire.max_speed / speed;
            self.velocity.x *= scale;
            self.velocity.z *= scale;
        }

        self.position += self.velocity;

        if self.on_ground {
            self.pitch -= self.velocity.z / self.radius;
            self.roll += self.velocity.x / self.radius;
        }

        if self.position.y < self.radius {
            self.position.y = self.radius;
            self.velocity.y = 0.0;
            self.on_ground = true;
        }
    }

    /// Add a launch impulse and lock out control until landing.
    ///
    /// The impulse is applied as given; scaling is the caller's
    /// business.
    pub fn apply_force(&mut self, impulse: Vec3) {
        self.velocity += impulse;
        self.in_air = true;
        self.can_control = false;
    }

    /// Move back to a spawn position with all motion cleared.
    pub fn reset(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.pitch = 0.0;
        self.roll = 0.0;
        self.on_ground = false;
        self.in_air = false;
        self.can_control = true;
    }
}
