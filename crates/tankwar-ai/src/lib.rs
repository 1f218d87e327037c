//! Enemy AI for Tank War.
//!
//! Implements the per-enemy wander/fire state machine and archetype stats.

pub mod fsm;
pub mod profiles;

pub use tankwar_core as core;
