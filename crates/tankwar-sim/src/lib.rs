//! Round simulation for Tank War.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces RoundSnapshots for the frontend.

pub mod engine;
pub mod round;
pub mod systems;
pub mod world_setup;

pub use engine::RoundEngine;
pub use tankwar_core as core;

#[cfg(test)]
mod tests;
