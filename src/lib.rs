//! # Tiremaze Simulation Core
//!
//! Deterministic simulation for a 3D rolling-tire maze arcade game:
//! a player-controlled tire navigates a procedurally generated maze,
//! avoiding traps, spikes, and lava, and using special doors
//! (teleporters, jumpers) to reach the goal.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TIREMAZE CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Simulation primitives                     │
//! │  ├── aabb.rs     - Axis-aligned bounding boxes               │
//! │  └── rng.rs      - Seeded deterministic PRNG                 │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── maze.rs     - Procedural maze generation                │
//! │  ├── input.rs    - Per-tick input snapshot                   │
//! │  ├── player.rs   - Tire body physics + motion states         │
//! │  ├── collision.rs- Wall collision resolution                 │
//! │  ├── hazard.rs   - Doors, traps, spikes, lava                │
//! │  ├── events.rs   - Events emitted to UI/audio collaborators  │
//! │  ├── state.rs    - Session state and phase machine           │
//! │  └── tick.rs     - Per-frame update orchestration            │
//! │                                                              │
//! │  config.rs       - Static configuration surface              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! Given the same seed, configuration, and input sequence, a session
//! produces identical maze layouts, hazard placements, trajectories,
//! and event streams:
//! - All randomness flows through one seeded PCG32 owned by the session
//! - Timers are tick deadlines, never wall-clock reads
//! - One fixed mutation order per tick, no concurrent access
//!
//! Rendering, audio, and UI are external collaborators: they read
//! positions and box extents from [`GameSession`] and consume the
//! discrete [`game::events::GameEvent`]s each tick returns.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::GameConfig;
pub use core::aabb::Aabb;
pub use core::rng::GameRng;
pub use game::input::InputFrame;
pub use game::player::{MotionState, PlayerBody};
pub use game::state::{GameSession, SessionPhase};
pub use game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Milliseconds represented by one tick.
pub const TICK_MS: u64 = 1000 / TICK_RATE as u64;
