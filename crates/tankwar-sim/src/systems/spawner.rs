//! Enemy spawner: places enemies on random spawn tiles within the round quota
//! and the concurrent cap.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use tankwar_ai::fsm::spawn_state;
use tankwar_ai::profiles::roll_kind;
use tankwar_core::components::EnemyTank;
use tankwar_core::events::GameEvent;

use crate::round::{Arena, RoundState};
use crate::world_setup::{self, SerialCounter};

/// Number of enemies currently on the field.
pub fn live_enemies(world: &World) -> u32 {
    world.query::<&EnemyTank>().iter().count() as u32
}

/// Try to spawn one enemy.
///
/// Does nothing once the quota is used up, while the field is at the cap,
/// or when the map has no spawn tiles. The tile is drawn uniformly with
/// replacement, so two enemies may share a tile.
pub fn spawn_one(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    serials: &mut SerialCounter,
    events: &mut Vec<GameEvent>,
) -> Option<Entity> {
    if round.quota_exhausted() {
        return None;
    }
    if live_enemies(world) >= arena.config.max_concurrent_enemies {
        return None;
    }
    let cell = *arena.enemy_spawn_tiles.choose(rng)?;

    let kind = roll_kind(rng);
    let state = spawn_state(&arena.brain, rng);
    let entity = world_setup::spawn_enemy(world, serials, arena, cell, kind, state, now_ms);
    round.enemies_spawned += 1;

    log::debug!(
        "Spawned {kind:?} enemy at ({}, {}), {}/{}",
        cell.col,
        cell.row,
        round.enemies_spawned,
        round.enemies_total
    );
    events.push(GameEvent::EnemySpawned { kind });
    Some(entity)
}

/// Opening wave: up to `start_enemies` spawns.
pub fn spawn_opening(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    rng: &mut ChaCha8Rng,
    serials: &mut SerialCounter,
    events: &mut Vec<GameEvent>,
) {
    for _ in 0..arena.config.start_enemies {
        if spawn_one(world, arena, round, rng, 0, serials, events).is_none() {
            break;
        }
    }
}

/// One spawn attempt per kill credit earned this tick.
pub fn run(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    serials: &mut SerialCounter,
    events: &mut Vec<GameEvent>,
) {
    for _ in 0..round.take_pending_spawns() {
        spawn_one(world, arena, round, rng, now_ms, serials, events);
    }
}
