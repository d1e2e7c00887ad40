//! Game Events
//!
//! Discrete notifications the simulation emits for UI, audio, and
//! replay consumers. Events accumulate in the session during a tick
//! and are drained into the tick result, so each event is observed
//! exactly once.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What happened.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventKind {
    /// The player touched an active trap.
    TrapHit,
    /// The player touched a spike hazard.
    SpikeHit,
    /// The player touched a lava hazard.
    LavaHit,
    /// A teleporter moved the player.
    Teleported {
        /// Position before the jump.
        from: Vec3,
        /// Position after the jump.
        to: Vec3,
    },
    /// A jumper door launched the player.
    Jumped {
        /// The applied impulse.
        impulse: Vec3,
    },
    /// First visit to the map midpoint, worth an extra life.
    MidpointBonus,
    /// The player entered the goal volume.
    GoalReached,
    /// Lives ran out.
    GameOver,
    /// The level was completed.
    LevelComplete {
        /// Session time at completion.
        elapsed_ms: u64,
        /// Lives left at completion.
        lives_remaining: u32,
    },
    /// The life count changed in either direction.
    LivesChanged {
        /// New life count.
        lives: u32,
    },
    /// Once-a-second clock update for the HUD.
    TimerTick {
        /// Session time so far.
        elapsed_ms: u64,
    },
}

/// An event stamped with the tick it occurred on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick counter value when the event fired.
    pub tick: u64,
    /// The event itself.
    pub kind: EventKind,
}

impl GameEvent {
    /// Stamp an event kind with its tick.
    pub fn new(tick: u64, kind: EventKind) -> Self {
        Self { tick, kind }
    }
}
