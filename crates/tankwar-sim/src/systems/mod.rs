//! ECS systems that operate on the round world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! Round-level bookkeeping is passed in explicitly; everything else lives in components.

pub mod bullets;
pub mod combat;
pub mod damage;
pub mod enemy_ai;
pub mod intents;
pub mod movement;
pub mod outcome;
pub mod snapshot;
pub mod spawner;

use hecs::{Component, Entity, World};

use tankwar_core::components::Serial;

/// Entities carrying `T`, oldest spawn first.
pub(crate) fn in_spawn_order<T: Component>(world: &World) -> Vec<Entity> {
    let mut found: Vec<(Serial, Entity)> = world
        .query::<(&Serial, &T)>()
        .iter()
        .map(|(entity, (serial, _))| (*serial, entity))
        .collect();
    found.sort_by_key(|(serial, _)| *serial);
    found.into_iter().map(|(_, entity)| entity).collect()
}
