//! Damage dispatch shared by every tank.
//!
//! Bullets and melee overlaps both go through [`apply`], which looks up the
//! target's role and routes to the player or enemy rule set.

use hecs::{Entity, World};

use tankwar_ai::profiles::demoted_kind;
use tankwar_core::components::{Body, Drive, EnemyTank, Health, Owner, PlayerTank};
use tankwar_core::enums::{Direction, EnemyKind, OwnerTag, PlayerId, RoundOutcome};
use tankwar_core::events::GameEvent;

use crate::round::{Arena, RoundState};

/// What a damage application did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target already gone, or shooter shares its tag.
    Ignored,
    /// Lost hit points but still standing.
    Wounded,
    /// A heavy enemy dropped to light.
    Demoted,
    /// A player was sent back to spawn at full health.
    Respawned,
    /// A player was removed by the other player.
    Eliminated { winner: PlayerId },
    /// An enemy was destroyed; the shooter earns a kill credit.
    Destroyed { credit: OwnerTag },
}

/// Which rule set a tank follows.
#[derive(Debug, Clone, Copy)]
enum TankRole {
    Player { id: PlayerId },
    Enemy { kind: EnemyKind },
}

fn role_of(world: &World, entity: Entity) -> Option<TankRole> {
    if let Ok(player) = world.get::<&PlayerTank>(entity) {
        return Some(TankRole::Player { id: player.id });
    }
    if let Ok(enemy) = world.get::<&EnemyTank>(entity) {
        return Some(TankRole::Enemy { kind: enemy.kind });
    }
    None
}

/// Apply `amount` damage from `shooter` to the tank `target`.
///
/// Idempotent against removed targets, and a tank never takes damage from
/// its own tag.
pub fn apply(
    world: &mut World,
    target: Entity,
    amount: i32,
    shooter: OwnerTag,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    let Some(role) = role_of(world, target) else {
        return DamageOutcome::Ignored;
    };
    match world.get::<&Owner>(target) {
        Ok(owner) if owner.0 != shooter => {}
        _ => return DamageOutcome::Ignored,
    }

    let hp_after = {
        let Ok(mut health) = world.get::<&mut Health>(target) else {
            return DamageOutcome::Ignored;
        };
        health.hp = (health.hp - amount).max(0);
        health.hp
    };

    match role {
        TankRole::Player { id } => {
            damage_player(world, target, id, hp_after, shooter, arena, round, events)
        }
        TankRole::Enemy { kind } => damage_enemy(world, target, kind, hp_after, shooter, events),
    }
}

#[allow(clippy::too_many_arguments)]
fn damage_player(
    world: &mut World,
    target: Entity,
    id: PlayerId,
    hp_after: i32,
    shooter: OwnerTag,
    arena: &Arena,
    round: &mut RoundState,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    if hp_after > 0 {
        return DamageOutcome::Wounded;
    }

    match shooter.player() {
        None => {
            respawn_player(world, target, arena);
            log::debug!("{id:?} destroyed by an enemy, respawning");
            events.push(GameEvent::PlayerRespawned { player: id });
            DamageOutcome::Respawned
        }
        Some(winner) => {
            let _ = world.despawn(target);
            round.terminate(RoundOutcome::Elimination { winner });
            log::info!("{id:?} eliminated by {winner:?}");
            events.push(GameEvent::PlayerDestroyed {
                player: id,
                by: shooter,
            });
            DamageOutcome::Eliminated { winner }
        }
    }
}

/// Full health, back on the spawn cell, facing up.
fn respawn_player(world: &mut World, target: Entity, arena: &Arena) {
    let Ok((player, health, body, drive)) =
        world.query_one_mut::<(&PlayerTank, &mut Health, &mut Body, &mut Drive)>(target)
    else {
        return;
    };
    health.hp = health.max;
    body.rect = player.spawn.to_rect(arena.tile_size());
    drive.facing = Direction::Up;
}

fn damage_enemy(
    world: &mut World,
    target: Entity,
    kind: EnemyKind,
    hp_after: i32,
    shooter: OwnerTag,
    events: &mut Vec<GameEvent>,
) -> DamageOutcome {
    if hp_after <= 0 {
        let _ = world.despawn(target);
        events.push(GameEvent::EnemyDestroyed { by: shooter });
        return DamageOutcome::Destroyed { credit: shooter };
    }

    match demoted_kind(kind, hp_after) {
        Some(lighter) => {
            if let Ok(mut enemy) = world.get::<&mut EnemyTank>(target) {
                enemy.kind = lighter;
            }
            events.push(GameEvent::EnemyDemoted);
            DamageOutcome::Demoted
        }
        None => DamageOutcome::Wounded,
    }
}
