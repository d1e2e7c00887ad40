//! Per-Tick Input Snapshot
//!
//! The embedding layer (keyboard, gamepad, replay file) samples its
//! sources and hands the simulation one of these per tick. The core
//! never reads devices itself, which is what makes scripted replays
//! possible.

use serde::{Deserialize, Serialize};

/// Directional controls held during one tick.
///
/// Forward is toward -z (deeper into the maze). Opposite directions
/// held together cancel out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Steer toward -x.
    pub left: bool,
    /// Steer toward +x.
    pub right: bool,
    /// Roll toward the exit (-z).
    pub forward: bool,
    /// Roll back toward the entrance (+z).
    pub backward: bool,
}

impl InputFrame {
    /// A frame with nothing held.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Net steering on the x axis: -1, 0, or 1.
    pub fn steer_x(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }

    /// Net drive on the z axis: -1 (forward), 0, or 1.
    pub fn steer_z(&self) -> f32 {
        (self.backward as i8 - self.forward as i8) as f32
    }
}
