//! Tile maps for Tank War.
//!
//! Provides the tile vocabulary, the immutable `TileGrid`, the text map
//! format, and the built-in arena.

pub mod arenas;
pub mod grid;

pub use arenas::default_arena;
pub use grid::{TileGrid, TileKind};
