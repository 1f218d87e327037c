//! Enemy AI system: runs the wander/fire state machine for every live enemy.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use tankwar_ai::fsm::{self, EnemyContext};
use tankwar_core::components::{Body, Drive, EnemyTank};
use tankwar_core::enums::OwnerTag;
use tankwar_core::events::GameEvent;

use crate::round::Arena;
use crate::systems::in_spawn_order;
use crate::world_setup::{self, SerialCounter};

/// Evaluate each enemy in spawn order so RNG draws are reproducible.
pub fn run(
    world: &mut World,
    arena: &Arena,
    rng: &mut ChaCha8Rng,
    now_ms: u64,
    serials: &mut SerialCounter,
    events: &mut Vec<GameEvent>,
) {
    let mut shots = Vec::new();

    for entity in in_spawn_order::<EnemyTank>(world) {
        let Ok((enemy, drive, body)) =
            world.query_one_mut::<(&mut EnemyTank, &mut Drive, &Body)>(entity)
        else {
            continue;
        };

        let ctx = EnemyContext {
            facing: drive.facing,
            speed: drive.speed,
            now_ms,
            retargeted_at_ms: enemy.retargeted_at_ms,
            retarget_interval_ms: enemy.retarget_interval_ms,
            fired_at_ms: enemy.fired_at_ms,
        };
        let update = fsm::evaluate(&ctx, &arena.brain, rng);

        drive.facing = update.facing;
        drive.speed = update.speed;
        enemy.retargeted_at_ms = update.retargeted_at_ms;
        enemy.retarget_interval_ms = update.retarget_interval_ms;
        enemy.fired_at_ms = update.fired_at_ms;

        // Fires along the facing chosen this tick, from the pre-move position.
        if update.fire {
            shots.push((body.rect, update.facing));
        }
    }

    for (rect, facing) in shots {
        world_setup::spawn_bullet(world, serials, arena, rect, facing, OwnerTag::Enemy);
        events.push(GameEvent::BulletFired {
            owner: OwnerTag::Enemy,
        });
    }
}
