//! Round bookkeeping owned by the engine.
//!
//! Stored in `RoundEngine` next to the ECS world, NOT as entities.

use tankwar_ai::fsm::BrainParams;
use tankwar_core::config::RoundConfig;
use tankwar_core::enums::{PlayerId, RoundOutcome};
use tankwar_core::types::{Rect, TileCoord};

/// Quota counters, scoreboard and the terminal flag.
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    pub outcome: RoundOutcome,
    pub enemies_total: u32,
    pub enemies_spawned: u32,
    /// Scoreboard; survives a player's removal.
    pub scores: [u32; 2],
    /// Replacement spawns requested by kill credits this tick.
    pending_spawns: u32,
}

impl RoundState {
    pub fn new(enemies_total: u32) -> Self {
        Self {
            enemies_total,
            ..Default::default()
        }
    }

    /// Record a terminal outcome. The first one wins; returns whether this call set it.
    pub fn terminate(&mut self, outcome: RoundOutcome) -> bool {
        if self.outcome.is_terminal() || !outcome.is_terminal() {
            return false;
        }
        self.outcome = outcome;
        true
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    pub fn quota_exhausted(&self) -> bool {
        self.enemies_spawned >= self.enemies_total
    }

    pub fn score(&self, id: PlayerId) -> u32 {
        self.scores[slot(id)]
    }

    pub fn add_point(&mut self, id: PlayerId) {
        self.scores[slot(id)] += 1;
    }

    pub fn request_spawn(&mut self) {
        self.pending_spawns += 1;
    }

    pub fn take_pending_spawns(&mut self) -> u32 {
        std::mem::take(&mut self.pending_spawns)
    }
}

fn slot(id: PlayerId) -> usize {
    match id {
        PlayerId::P1 => 0,
        PlayerId::P2 => 1,
    }
}

/// Per-round constants derived from the map and config at load time.
#[derive(Debug, Clone)]
pub struct Arena {
    pub config: RoundConfig,
    pub brain: BrainParams,
    /// Whole map in pixels.
    pub playfield: Rect,
    /// Empty cells inside the spawn band, row-major.
    pub enemy_spawn_tiles: Vec<TileCoord>,
}

impl Arena {
    pub fn tile_size(&self) -> i32 {
        self.config.tile_size
    }
}
