//! Simulation primitives shared across game modules.
//!
//! Everything in here is deterministic: the only source of randomness
//! is the seeded [`rng::GameRng`].

pub mod aabb;
pub mod rng;
