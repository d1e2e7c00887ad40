//! Game logic modules.
//!
//! All deterministic: the per-tick mutation order is fixed by
//! [`tick::tick`] and the only randomness is the session's seeded RNG.

pub mod collision;
pub mod events;
pub mod hazard;
pub mod input;
pub mod maze;
pub mod player;
pub mod state;
pub mod tick;
