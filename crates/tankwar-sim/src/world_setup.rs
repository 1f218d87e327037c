//! Map loading and entity spawn factories.
//!
//! Turns a `TileGrid` into obstacle, hazard and bush entities, and builds
//! the component bundles for players, enemies and bullets.

use hecs::{Entity, World};

use tankwar_ai::fsm::{BrainParams, SpawnState};
use tankwar_ai::profiles::get_profile;
use tankwar_core::components::*;
use tankwar_core::config::RoundConfig;
use tankwar_core::enums::*;
use tankwar_core::types::{Rect, TileCoord};
use tankwar_map::{TileGrid, TileKind};

use crate::round::Arena;

/// Hands out spawn-order serial numbers.
#[derive(Debug, Clone, Default)]
pub struct SerialCounter {
    next: u32,
}

impl SerialCounter {
    pub fn next(&mut self) -> Serial {
        let serial = Serial(self.next);
        self.next += 1;
        serial
    }
}

/// Place every static tile of `grid` into the world and collect enemy spawn cells.
///
/// Walls and hazard cores become obstacles; hazard cores are also tagged
/// `Hazard`. Bushes become non-colliding decoration. Empty cells inside the
/// configured row band are recorded as enemy spawn points.
pub fn load_map(world: &mut World, grid: &TileGrid, config: &RoundConfig) -> Arena {
    let tile = config.tile_size;
    let spawn_rows = config.spawn_row_min..=config.spawn_row_max;
    let mut enemy_spawn_tiles = Vec::new();

    for (coord, kind) in grid.cells() {
        match kind {
            TileKind::BreakableWall => {
                world.spawn(obstacle_bundle(coord, ObstacleKind::BreakableWall, tile));
            }
            TileKind::IndestructibleWall => {
                world.spawn(obstacle_bundle(coord, ObstacleKind::IndestructibleWall, tile));
            }
            TileKind::HazardCore => {
                let (body, obstacle) = obstacle_bundle(coord, ObstacleKind::HazardCore, tile);
                world.spawn((body, obstacle, Hazard));
            }
            TileKind::Bush => {
                world.spawn((
                    Bush,
                    Body {
                        rect: coord.to_rect(tile),
                    },
                ));
            }
            TileKind::Empty => {
                if spawn_rows.contains(&coord.row) {
                    enemy_spawn_tiles.push(coord);
                }
            }
        }
    }

    let playfield = Rect::new(
        0,
        0,
        grid.width() as i32 * tile,
        grid.height() as i32 * tile,
    );

    log::debug!(
        "Loaded {}x{} map with {} enemy spawn tiles",
        grid.width(),
        grid.height(),
        enemy_spawn_tiles.len()
    );

    Arena {
        config: config.clone(),
        brain: BrainParams::from_config(config),
        playfield,
        enemy_spawn_tiles,
    }
}

fn obstacle_bundle(coord: TileCoord, kind: ObstacleKind, tile: i32) -> (Body, Obstacle) {
    (
        Body {
            rect: coord.to_rect(tile),
        },
        Obstacle {
            kind,
            durability: Durability::initial(kind),
            cell: coord,
        },
    )
}

/// Spawn a player tank on its spawn cell, facing up and idle.
pub fn spawn_player(
    world: &mut World,
    serials: &mut SerialCounter,
    arena: &Arena,
    id: PlayerId,
    spawn: TileCoord,
    now_ms: u64,
) -> Entity {
    let config = &arena.config;
    world.spawn((
        PlayerTank {
            id,
            spawn,
            last_fired_ms: now_ms,
        },
        Body {
            rect: spawn.to_rect(config.tile_size),
        },
        Drive {
            facing: Direction::Up,
            speed: 0,
        },
        Health::full(config.player_max_hp),
        Owner(id.tag()),
        serials.next(),
    ))
}

/// Spawn an enemy tank. Its AI timers start at `now_ms`.
pub fn spawn_enemy(
    world: &mut World,
    serials: &mut SerialCounter,
    arena: &Arena,
    cell: TileCoord,
    kind: EnemyKind,
    state: SpawnState,
    now_ms: u64,
) -> Entity {
    let profile = get_profile(kind, &arena.config);
    world.spawn((
        EnemyTank {
            kind,
            retargeted_at_ms: now_ms,
            retarget_interval_ms: state.retarget_interval_ms,
            fired_at_ms: now_ms,
        },
        Body {
            rect: cell.to_rect(arena.tile_size()),
        },
        Drive {
            facing: state.facing,
            speed: state.speed,
        },
        Health::full(profile.max_hp),
        Owner(OwnerTag::Enemy),
        serials.next(),
    ))
}

/// Spawn a bullet leaving the centre of `shooter` in `direction`.
pub fn spawn_bullet(
    world: &mut World,
    serials: &mut SerialCounter,
    arena: &Arena,
    shooter: Rect,
    direction: Direction,
    owner: OwnerTag,
) -> Entity {
    let rect = Rect::launched_from(shooter.center(), arena.config.bullet_size(), direction);
    world.spawn((
        Bullet {
            direction,
            speed: arena.config.bullet_speed,
        },
        Body { rect },
        Owner(owner),
        serials.next(),
    ))
}
