//! Core types and definitions for the Tank War simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, intents, snapshots, events, constants and the
//! round configuration. It has no dependency on any runtime or renderer.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
