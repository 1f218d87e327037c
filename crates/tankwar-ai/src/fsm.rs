//! Enemy behaviour state machine.
//!
//! Pure functions over plain data: given an enemy's timers and the round
//! clock, decide whether it retargets and whether it fires this tick.
//! No ECS dependency; randomness comes from the caller's RNG.

use rand::seq::SliceRandom;
use rand::Rng;

use tankwar_core::config::RoundConfig;
use tankwar_core::enums::Direction;
use tankwar_core::types::interval_elapsed;

/// Fixed tuning shared by every enemy in a round.
#[derive(Debug, Clone, Copy)]
pub struct BrainParams {
    /// Pixels per tick after a retarget.
    pub speed: i32,
    pub fire_interval_ms: u64,
    pub retarget_min_ms: u64,
    pub retarget_max_ms: u64,
}

impl BrainParams {
    pub fn from_config(config: &RoundConfig) -> Self {
        Self {
            speed: config.enemy_speed,
            fire_interval_ms: config.enemy_fire_interval_ms,
            retarget_min_ms: config.enemy_retarget_min_ms,
            retarget_max_ms: config.enemy_retarget_max_ms,
        }
    }
}

/// Input to the FSM for a single enemy.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub facing: Direction,
    pub speed: i32,
    pub now_ms: u64,
    pub retargeted_at_ms: u64,
    pub retarget_interval_ms: u64,
    pub fired_at_ms: u64,
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyUpdate {
    pub facing: Direction,
    pub speed: i32,
    pub retargeted_at_ms: u64,
    pub retarget_interval_ms: u64,
    pub fired_at_ms: u64,
    /// Whether a new direction was rolled this tick.
    pub retargeted: bool,
    /// Whether the enemy fires this tick.
    pub fire: bool,
}

/// Starting state for a freshly spawned enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnState {
    pub facing: Direction,
    pub speed: i32,
    pub retarget_interval_ms: u64,
}

/// Roll the initial facing and retarget interval. Timers start at spawn time.
pub fn spawn_state<R: Rng + ?Sized>(params: &BrainParams, rng: &mut R) -> SpawnState {
    SpawnState {
        retarget_interval_ms: roll_retarget_interval(params, rng),
        facing: roll_direction(rng),
        speed: params.speed,
    }
}

/// Evaluate one tick for one enemy.
///
/// Movement and firing run on independent timers. A retarget restores full
/// speed even if a collision stopped the tank; collisions never touch the timers.
pub fn evaluate<R: Rng + ?Sized>(
    ctx: &EnemyContext,
    params: &BrainParams,
    rng: &mut R,
) -> EnemyUpdate {
    let mut update = EnemyUpdate {
        facing: ctx.facing,
        speed: ctx.speed,
        retargeted_at_ms: ctx.retargeted_at_ms,
        retarget_interval_ms: ctx.retarget_interval_ms,
        fired_at_ms: ctx.fired_at_ms,
        retargeted: false,
        fire: false,
    };

    if interval_elapsed(ctx.now_ms, ctx.retargeted_at_ms, ctx.retarget_interval_ms) {
        update.retargeted_at_ms = ctx.now_ms;
        update.retarget_interval_ms = roll_retarget_interval(params, rng);
        update.facing = roll_direction(rng);
        update.speed = params.speed;
        update.retargeted = true;
    }

    if interval_elapsed(ctx.now_ms, ctx.fired_at_ms, params.fire_interval_ms) {
        update.fired_at_ms = ctx.now_ms;
        update.fire = true;
    }

    update
}

/// Uniform over the four directions.
pub fn roll_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL.choose(rng).copied().unwrap_or_default()
}

/// Uniform over the inclusive retarget range.
pub fn roll_retarget_interval<R: Rng + ?Sized>(params: &BrainParams, rng: &mut R) -> u64 {
    rng.gen_range(params.retarget_min_ms..=params.retarget_max_ms)
}
