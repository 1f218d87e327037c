//! Snapshot system: queries the round world and builds a complete RoundSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use tankwar_core::components::*;
use tankwar_core::enums::PlayerId;
use tankwar_core::events::GameEvent;
use tankwar_core::state::*;
use tankwar_core::types::{Rect, SimTime};

use crate::round::RoundState;
use crate::systems::spawner::live_enemies;

/// Build a complete RoundSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    round: &RoundState,
    events: Vec<GameEvent>,
) -> RoundSnapshot {
    let live = live_enemies(world);

    RoundSnapshot {
        time: *time,
        outcome: round.outcome,
        players: build_players(world, round),
        enemies: build_enemies(world),
        bullets: build_bullets(world),
        obstacles: build_obstacles(world),
        bushes: build_bushes(world),
        counters: EnemyCounters {
            total: round.enemies_total,
            spawned: round.enemies_spawned,
            live,
            remaining: round.enemies_total.saturating_sub(round.enemies_spawned) + live,
        },
        scores: Scoreboard {
            p1: round.score(PlayerId::P1),
            p2: round.score(PlayerId::P2),
        },
        events,
    }
}

fn build_players(world: &World, round: &RoundState) -> Vec<PlayerView> {
    let mut players: Vec<PlayerView> = world
        .query::<(&PlayerTank, &Body, &Drive, &Health)>()
        .iter()
        .map(|(_, (player, body, drive, health))| PlayerView {
            id: player.id,
            rect: body.rect,
            facing: drive.facing,
            hp: health.hp,
            max_hp: health.max,
            score: round.score(player.id),
        })
        .collect();
    players.sort_by_key(|p| p.id);
    players
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&EnemyTank, &Serial, &Body, &Drive, &Health)>()
        .iter()
        .map(|(_, (enemy, serial, body, drive, health))| EnemyView {
            serial: serial.0,
            kind: enemy.kind,
            rect: body.rect,
            facing: drive.facing,
            hp: health.hp,
            max_hp: health.max,
        })
        .collect();
    enemies.sort_by_key(|e| e.serial);
    enemies
}

fn build_bullets(world: &World) -> Vec<BulletView> {
    let mut bullets: Vec<BulletView> = world
        .query::<(&Bullet, &Serial, &Body, &Owner)>()
        .iter()
        .map(|(_, (bullet, serial, body, owner))| BulletView {
            serial: serial.0,
            owner: owner.0,
            rect: body.rect,
            direction: bullet.direction,
        })
        .collect();
    bullets.sort_by_key(|b| b.serial);
    bullets
}

/// Row-major by source cell.
fn build_obstacles(world: &World) -> Vec<ObstacleView> {
    let mut obstacles: Vec<(i32, i32, ObstacleView)> = world
        .query::<(&Obstacle, &Body)>()
        .iter()
        .map(|(_, (obstacle, body))| {
            (
                obstacle.cell.row,
                obstacle.cell.col,
                ObstacleView {
                    kind: obstacle.kind,
                    rect: body.rect,
                    durability: obstacle.durability,
                },
            )
        })
        .collect();
    obstacles.sort_by_key(|(row, col, _)| (*row, *col));
    obstacles.into_iter().map(|(_, _, view)| view).collect()
}

fn build_bushes(world: &World) -> Vec<Rect> {
    let mut bushes: Vec<Rect> = world
        .query::<(&Bush, &Body)>()
        .iter()
        .map(|(_, (_, body))| body.rect)
        .collect();
    bushes.sort_by_key(|r| (r.y, r.x));
    bushes
}
