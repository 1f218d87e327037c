//! Combat resolution: bullets against obstacles, players and enemies,
//! then tank-on-tank overlap.
//!
//! Each pass first computes its full hit list from the positions at the
//! start of the pass, then applies the hits in order. Every bullet that
//! makes contact is consumed, even if its target was already removed
//! earlier in the same pass.

use hecs::{Entity, World};

use tankwar_core::components::{
    Body, Bullet, EnemyTank, Hazard, Health, Obstacle, Owner, PlayerTank,
};
use tankwar_core::constants::HIT_DAMAGE;
use tankwar_core::enums::{ObstacleKind, OwnerTag, PlayerId, RoundOutcome};
use tankwar_core::events::GameEvent;
use tankwar_core::types::{Rect, TileCoord};

use crate::round::{Arena, RoundState};
use crate::systems::damage::{self, DamageOutcome};
use crate::systems::in_spawn_order;

/// How far the combat pass got this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Completed,
    /// A player bullet struck the hazard core; nothing else resolves this tick.
    Halted { by: PlayerId },
}

/// Run every combat pass in order.
pub fn run(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    if let Resolution::Halted { by } = resolve_obstacle_hits(world, round, events) {
        return Resolution::Halted { by };
    }
    resolve_player_hits(world, arena, round, events);
    resolve_enemy_hits(world, arena, round, events);
    resolve_tank_overlaps(world, arena, round, events);
    Resolution::Completed
}

struct BulletHit {
    bullet: Entity,
    owner: OwnerTag,
    target: Entity,
}

fn live_bullets(world: &World) -> Vec<(Entity, Rect, OwnerTag)> {
    in_spawn_order::<Bullet>(world)
        .into_iter()
        .filter_map(|entity| {
            let mut query = world.query_one::<(&Body, &Owner)>(entity).ok()?;
            let (body, owner) = query.get()?;
            Some((entity, body.rect, owner.0))
        })
        .collect()
}

fn tank_rects<T: hecs::Component>(world: &World) -> Vec<(Entity, Rect)> {
    in_spawn_order::<T>(world)
        .into_iter()
        .filter_map(|entity| {
            let body = world.get::<&Body>(entity).ok()?;
            Some((entity, body.rect))
        })
        .collect()
}

/// Bullets against walls and the hazard core.
fn resolve_obstacle_hits(
    world: &mut World,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) -> Resolution {
    let mut obstacles: Vec<(TileCoord, Entity, Rect, ObstacleKind)> = world
        .query::<(&Obstacle, &Body)>()
        .iter()
        .map(|(entity, (obstacle, body))| (obstacle.cell, entity, body.rect, obstacle.kind))
        .collect();
    obstacles.sort_by_key(|(cell, ..)| (cell.row, cell.col));

    let hits: Vec<(BulletHit, ObstacleKind)> = live_bullets(world)
        .into_iter()
        .filter_map(|(bullet, rect, owner)| {
            obstacles
                .iter()
                .find(|(_, _, wall, _)| rect.intersects(wall))
                .map(|&(_, target, _, kind)| {
                    (
                        BulletHit {
                            bullet,
                            owner,
                            target,
                        },
                        kind,
                    )
                })
        })
        .collect();

    for (hit, kind) in hits {
        let _ = world.despawn(hit.bullet);
        match kind {
            ObstacleKind::IndestructibleWall => {
                events.push(GameEvent::WallHit { kind });
            }
            ObstacleKind::BreakableWall => {
                events.push(GameEvent::WallHit { kind });
                let used_up = match world.get::<&mut Obstacle>(hit.target) {
                    Ok(mut wall) => wall.durability.absorb_hit(),
                    Err(_) => false,
                };
                if used_up {
                    let _ = world.despawn(hit.target);
                    events.push(GameEvent::WallDestroyed);
                }
            }
            ObstacleKind::HazardCore => {
                let Some(shooter) = hit.owner.player() else {
                    continue;
                };
                strike_hazard(world, round, shooter, events);
                return Resolution::Halted { by: shooter };
            }
        }
    }

    Resolution::Completed
}

/// A player hit the hazard: the opponent wins and every hazard tile goes.
fn strike_hazard(
    world: &mut World,
    round: &mut RoundState,
    shooter: PlayerId,
    events: &mut Vec<GameEvent>,
) {
    let hazards: Vec<Entity> = world
        .query::<&Hazard>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();
    for entity in hazards {
        let _ = world.despawn(entity);
    }

    events.push(GameEvent::HazardStruck { by: shooter.tag() });
    let winner = shooter.opponent();
    if round.terminate(RoundOutcome::Elimination { winner }) {
        log::info!("{shooter:?} struck the hazard core, {winner:?} wins");
    }
}

/// Bullets against players. A player is never hit by its own bullets.
fn resolve_player_hits(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) {
    let bullets = live_bullets(world);
    let mut hits = Vec::new();
    for (target, tank) in tank_rects::<PlayerTank>(world) {
        let Ok(tag) = world.get::<&Owner>(target).map(|owner| owner.0) else {
            continue;
        };
        for &(bullet, rect, owner) in &bullets {
            if owner != tag && rect.intersects(&tank) {
                hits.push(BulletHit {
                    bullet,
                    owner,
                    target,
                });
            }
        }
    }

    for hit in hits {
        let _ = world.despawn(hit.bullet);
        damage::apply(world, hit.target, HIT_DAMAGE, hit.owner, arena, round, events);
    }
}

/// Player bullets against enemies. Enemies ignore each other's bullets.
fn resolve_enemy_hits(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) {
    let bullets = live_bullets(world);
    let mut hits = Vec::new();
    for (target, tank) in tank_rects::<EnemyTank>(world) {
        for &(bullet, rect, owner) in &bullets {
            if owner != OwnerTag::Enemy && rect.intersects(&tank) {
                hits.push(BulletHit {
                    bullet,
                    owner,
                    target,
                });
            }
        }
    }

    for hit in hits {
        let _ = world.despawn(hit.bullet);
        let outcome =
            damage::apply(world, hit.target, HIT_DAMAGE, hit.owner, arena, round, events);
        if let DamageOutcome::Destroyed { credit } = outcome {
            credit_kill(world, arena, round, credit);
        }
    }
}

/// Every overlapping player/enemy pair trades one point of damage.
///
/// Contacts are rechecked before each trade: an enemy destroyed by an
/// earlier pair deals no more damage, and a player sent back to spawn
/// no longer touches the enemies it left behind.
fn resolve_tank_overlaps(
    world: &mut World,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) {
    let enemies = tank_rects::<EnemyTank>(world);
    let mut pairs = Vec::new();
    for (player, tank) in tank_rects::<PlayerTank>(world) {
        let Ok(tag) = world.get::<&Owner>(player).map(|owner| owner.0) else {
            continue;
        };
        for &(enemy, rect) in &enemies {
            if rect.intersects(&tank) {
                pairs.push((player, tag, enemy));
            }
        }
    }

    for (player, tag, enemy) in pairs {
        if !still_touching(world, player, enemy) {
            continue;
        }
        damage::apply(world, player, HIT_DAMAGE, OwnerTag::Enemy, arena, round, events);
        let outcome = damage::apply(world, enemy, HIT_DAMAGE, tag, arena, round, events);
        if let DamageOutcome::Destroyed { credit } = outcome {
            credit_kill(world, arena, round, credit);
        }
    }
}

fn still_touching(world: &World, player: Entity, enemy: Entity) -> bool {
    let (Ok(a), Ok(b)) = (world.get::<&Body>(player), world.get::<&Body>(enemy)) else {
        return false;
    };
    a.rect.intersects(&b.rect)
}

/// Score, heal and a replacement spawn for the crediting player.
fn credit_kill(world: &mut World, arena: &Arena, round: &mut RoundState, credit: OwnerTag) {
    let Some(id) = credit.player() else {
        return;
    };
    round.add_point(id);
    round.request_spawn();

    for (_entity, (player, health)) in world.query_mut::<(&PlayerTank, &mut Health)>() {
        if player.id == id {
            health.hp = (health.hp + arena.config.heal_on_kill_amount).min(health.max);
        }
    }
    log::debug!("Kill credited to {id:?}, score {}", round.score(id));
}
