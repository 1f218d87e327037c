//! Bullet flight: straight-line motion and removal once off the playfield.

use hecs::{Entity, World};

use tankwar_core::components::{Body, Bullet};

use crate::round::Arena;

/// Advance every bullet and despawn those no longer touching the playfield.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, arena: &Arena, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, (bullet, body)) in world.query_mut::<(&Bullet, &mut Body)>() {
        body.rect.translate(bullet.direction.unit() * bullet.speed);
        if !body.rect.intersects(&arena.playfield) {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
