//! Simulation constants and tuning defaults.
//!
//! Values that a round may override live in [`crate::config::RoundConfig`];
//! the constants here are the defaults it falls back to.

/// Simulation tick rate (Hz). One tick per rendered frame.
pub const TICK_RATE: u32 = 60;

// --- Grid ---

/// Edge length of one map tile in pixels.
pub const TILE_SIZE: i32 = 32;

/// Default arena width in tiles.
pub const ARENA_WIDTH_TILES: usize = 26;

/// Default arena height in tiles.
pub const ARENA_HEIGHT_TILES: usize = 26;

/// First row (inclusive) where enemies may spawn.
pub const ENEMY_SPAWN_ROW_MIN: i32 = 3;

/// Last row (inclusive) where enemies may spawn.
pub const ENEMY_SPAWN_ROW_MAX: i32 = 21;

// --- Players ---

pub const PLAYER_MAX_HP: i32 = 3;

/// Pixels per tick.
pub const PLAYER_SPEED: i32 = 3;

pub const PLAYER_HEAL_ON_KILL: i32 = 1;

pub const PLAYER_FIRE_COOLDOWN_MS: u64 = 500;

// --- Enemies ---

pub const ENEMY_TOTAL_COUNT: u32 = 20;

pub const ENEMY_START_COUNT: u32 = 8;

pub const ENEMY_MAX_ON_SCREEN: u32 = 8;

pub const ENEMY_LIGHT_HP: i32 = 1;

pub const ENEMY_HEAVY_HP: i32 = 2;

/// Pixels per tick.
pub const ENEMY_SPEED: i32 = 2;

pub const ENEMY_FIRE_INTERVAL_MS: u64 = 1500;

/// Bounds (inclusive) of the randomized retarget interval.
pub const ENEMY_RETARGET_MIN_MS: u64 = 1000;
pub const ENEMY_RETARGET_MAX_MS: u64 = 3000;

// --- Bullets ---

/// Pixels per tick.
pub const BULLET_SPEED: i32 = 7;

/// Bullets are a quarter tile square.
pub const BULLET_SIZE_DIVISOR: i32 = 4;

/// Damage dealt by one bullet or one tick of tank overlap.
pub const HIT_DAMAGE: i32 = 1;

/// Default RNG seed for a round.
pub const DEFAULT_SEED: u64 = 42;
