//! Player intent system: applies each player's per-tick fire and drive intent.

use hecs::World;

use tankwar_core::commands::TickIntents;
use tankwar_core::components::{Body, Drive, PlayerTank};
use tankwar_core::enums::{Direction, PlayerId};
use tankwar_core::events::GameEvent;
use tankwar_core::types::{interval_elapsed, Rect};

use crate::round::Arena;
use crate::world_setup::{self, SerialCounter};

/// Fire first (from the current facing), then set facing and speed.
///
/// A shot is accepted only once strictly more than the cooldown has passed
/// since the previous accepted shot. No direction means the tank stands still.
pub fn run(
    world: &mut World,
    intents: &TickIntents,
    arena: &Arena,
    now_ms: u64,
    serials: &mut SerialCounter,
    events: &mut Vec<GameEvent>,
) {
    let config = &arena.config;
    let mut shots: Vec<(PlayerId, Rect, Direction)> = Vec::new();

    for (_entity, (player, drive, body)) in
        world.query_mut::<(&mut PlayerTank, &mut Drive, &Body)>()
    {
        let intent = intents.for_player(player.id);

        if intent.fire
            && interval_elapsed(now_ms, player.last_fired_ms, config.player_fire_cooldown_ms)
        {
            player.last_fired_ms = now_ms;
            shots.push((player.id, body.rect, drive.facing));
        }

        match intent.direction {
            Some(direction) => {
                drive.facing = direction;
                drive.speed = config.player_speed;
            }
            None => drive.speed = 0,
        }
    }

    // P1's bullet gets the lower serial.
    shots.sort_by_key(|(id, _, _)| *id);
    for (id, rect, facing) in shots {
        let owner = id.tag();
        world_setup::spawn_bullet(world, serials, arena, rect, facing, owner);
        events.push(GameEvent::BulletFired { owner });
    }
}
