//! Round configuration bundle.
//!
//! Every field has a default matching the stock game, so a JSON file only
//! needs to name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{Result, TankwarError};

/// Tuning values for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Enemies spawned over the whole round.
    pub total_enemies: u32,
    /// Enemies placed at round start.
    pub start_enemies: u32,
    /// Cap on live enemies at any moment.
    pub max_concurrent_enemies: u32,
    pub player_max_hp: i32,
    /// Pixels per tick.
    pub player_speed: i32,
    /// Pixels per tick.
    pub enemy_speed: i32,
    pub enemy_fire_interval_ms: u64,
    /// Pixels per tick.
    pub bullet_speed: i32,
    pub player_fire_cooldown_ms: u64,
    pub heal_on_kill_amount: i32,

    pub seed: u64,
    pub light_enemy_hp: i32,
    pub heavy_enemy_hp: i32,
    pub enemy_retarget_min_ms: u64,
    pub enemy_retarget_max_ms: u64,
    /// Inclusive row band where empty tiles admit enemy spawns.
    pub spawn_row_min: i32,
    pub spawn_row_max: i32,
    pub tile_size: i32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            total_enemies: ENEMY_TOTAL_COUNT,
            start_enemies: ENEMY_START_COUNT,
            max_concurrent_enemies: ENEMY_MAX_ON_SCREEN,
            player_max_hp: PLAYER_MAX_HP,
            player_speed: PLAYER_SPEED,
            enemy_speed: ENEMY_SPEED,
            enemy_fire_interval_ms: ENEMY_FIRE_INTERVAL_MS,
            bullet_speed: BULLET_SPEED,
            player_fire_cooldown_ms: PLAYER_FIRE_COOLDOWN_MS,
            heal_on_kill_amount: PLAYER_HEAL_ON_KILL,
            seed: DEFAULT_SEED,
            light_enemy_hp: ENEMY_LIGHT_HP,
            heavy_enemy_hp: ENEMY_HEAVY_HP,
            enemy_retarget_min_ms: ENEMY_RETARGET_MIN_MS,
            enemy_retarget_max_ms: ENEMY_RETARGET_MAX_MS,
            spawn_row_min: ENEMY_SPAWN_ROW_MIN,
            spawn_row_max: ENEMY_SPAWN_ROW_MAX,
            tile_size: TILE_SIZE,
        }
    }
}

impl RoundConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RoundConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Bullet edge length in pixels.
    pub fn bullet_size(&self) -> i32 {
        (self.tile_size / BULLET_SIZE_DIVISOR).max(1)
    }

    /// Reject combinations the engine cannot run.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(TankwarError::InvalidConfig(msg.to_string()));

        if self.tile_size <= 0 {
            return invalid("tile_size must be positive");
        }
        if self.max_concurrent_enemies == 0 {
            return invalid("max_concurrent_enemies must be at least 1");
        }
        if self.start_enemies > self.total_enemies {
            return invalid("start_enemies exceeds total_enemies");
        }
        if self.player_max_hp <= 0 || self.light_enemy_hp <= 0 || self.heavy_enemy_hp <= 0 {
            return invalid("hit points must be positive");
        }
        if self.player_speed <= 0 || self.enemy_speed <= 0 || self.bullet_speed <= 0 {
            return invalid("speeds must be positive");
        }
        if self.heal_on_kill_amount < 0 {
            return invalid("heal_on_kill_amount must not be negative");
        }
        if self.enemy_retarget_min_ms > self.enemy_retarget_max_ms {
            return invalid("enemy retarget range is inverted");
        }
        if self.spawn_row_min > self.spawn_row_max {
            return invalid("spawn row band is inverted");
        }
        Ok(())
    }
}
