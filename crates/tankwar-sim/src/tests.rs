//! Tests for the round engine, collision resolver, combat rules and spawner.

use glam::IVec2;
use hecs::{Entity, World};
use proptest::prelude::*;

use tankwar_core::commands::{PlayerIntent, TickIntents};
use tankwar_core::components::{Body, Drive, EnemyTank, Health, PlayerTank};
use tankwar_core::config::RoundConfig;
use tankwar_core::enums::*;
use tankwar_core::events::GameEvent;
use tankwar_core::state::RoundSnapshot;
use tankwar_core::types::{Rect, TileCoord};
use tankwar_map::{default_arena, TileGrid};

use crate::engine::RoundEngine;
use crate::round::RoundState;
use crate::systems::damage::{self, DamageOutcome};
use crate::systems::movement::resolve_motion;
use crate::world_setup::{self, SerialCounter};

/// Iron-bordered 7x7 room; P1 at (1,5), P2 at (5,5).
const OPEN_MAP: &str = "\
2222222
2000002
2000002
2000002
2000002
2A000B2
2222222
";

/// OPEN_MAP with a hazard core at (3,2).
const HAZARD_MAP: &str = "\
2222222
2000002
2005002
2000002
2000002
2A000B2
2222222
";

/// Brick at (3,2), iron at (3,4).
const WALL_MAP: &str = "\
2222222
2000002
2001002
2000002
2002002
2A000B2
2222222
";

/// Bush strip across row 2.
const BUSH_MAP: &str = "\
2222222
2000002
2333332
2000002
2000002
2A000B2
2222222
";

/// Row 2 admits exactly one enemy spawn tile, (3,2). P1 sits below it at (3,6).
const LANE_MAP: &str = "\
2222222
2B00002
2220222
2000002
2000002
2000002
200A002
2222222
";

/// No opening wave, no spawn tiles, enemies that never shoot on their own.
fn quiet_config() -> RoundConfig {
    RoundConfig {
        total_enemies: 1,
        start_enemies: 0,
        max_concurrent_enemies: 4,
        enemy_fire_interval_ms: 600_000,
        spawn_row_min: 0,
        spawn_row_max: 0,
        ..Default::default()
    }
}

fn lane_config(total_enemies: u32) -> RoundConfig {
    RoundConfig {
        total_enemies,
        start_enemies: 1,
        max_concurrent_enemies: 1,
        enemy_fire_interval_ms: 600_000,
        player_fire_cooldown_ms: 0,
        spawn_row_min: 2,
        spawn_row_max: 2,
        ..Default::default()
    }
}

fn engine_on(map: &str, config: RoundConfig) -> RoundEngine {
    let grid = TileGrid::parse(map).unwrap();
    RoundEngine::new_round(&grid, config)
}

fn idle() -> TickIntents {
    TickIntents::default()
}

fn player_entity(engine: &RoundEngine, id: PlayerId) -> Entity {
    engine
        .world()
        .query::<&PlayerTank>()
        .iter()
        .find(|(_, player)| player.id == id)
        .map(|(entity, _)| entity)
        .expect("player present")
}

fn enemy_entities(engine: &RoundEngine) -> Vec<Entity> {
    engine
        .world()
        .query::<&EnemyTank>()
        .iter()
        .map(|(entity, _)| entity)
        .collect()
}

fn set_hp(engine: &mut RoundEngine, entity: Entity, hp: i32) {
    engine.world_mut().get::<&mut Health>(entity).unwrap().hp = hp;
}

fn place(engine: &mut RoundEngine, entity: Entity, rect: Rect) {
    engine.world_mut().get::<&mut Body>(entity).unwrap().rect = rect;
}

fn cell_rect(col: i32, row: i32) -> Rect {
    TileCoord::new(col, row).to_rect(32)
}

fn count_events(snap: &RoundSnapshot, pred: impl Fn(&GameEvent) -> bool) -> usize {
    snap.events.iter().filter(|e| pred(e)).count()
}

// ---- Map loading ----

#[test]
fn test_load_map_builds_obstacles_bushes_and_spawn_band() {
    let grid = TileGrid::parse(WALL_MAP).unwrap();
    let config = RoundConfig {
        spawn_row_min: 1,
        spawn_row_max: 2,
        ..quiet_config()
    };
    let mut world = World::new();
    let arena = world_setup::load_map(&mut world, &grid, &config);

    // 24 border irons + 1 brick + 1 inner iron.
    let obstacles = world
        .query::<&tankwar_core::components::Obstacle>()
        .iter()
        .count();
    assert_eq!(obstacles, 26);
    assert_eq!(arena.playfield, Rect::new(0, 0, 224, 224));

    // Row 1 has five empty cells, row 2 four (brick at col 3).
    assert_eq!(arena.enemy_spawn_tiles.len(), 9);
    assert!(arena
        .enemy_spawn_tiles
        .iter()
        .all(|c| (1..=2).contains(&c.row)));
    assert!(!arena.enemy_spawn_tiles.contains(&TileCoord::new(3, 2)));

    let grid = TileGrid::parse(BUSH_MAP).unwrap();
    let mut world = World::new();
    world_setup::load_map(&mut world, &grid, &quiet_config());
    let bushes = world.query::<&tankwar_core::components::Bush>().iter().count();
    assert_eq!(bushes, 5);
}

#[test]
fn test_new_round_places_players_and_opening_wave() {
    let mut engine = RoundEngine::new_round(&default_arena(), RoundConfig::default());
    let snap = engine.snapshot();

    assert_eq!(snap.players.len(), 2);
    assert_eq!(snap.player(PlayerId::P1).unwrap().rect, cell_rect(8, 24));
    assert_eq!(snap.player(PlayerId::P2).unwrap().rect, cell_rect(17, 24));
    assert_eq!(snap.enemies.len(), 8);
    assert_eq!(snap.counters.spawned, 8);
    assert_eq!(snap.counters.live, 8);
    assert_eq!(snap.counters.remaining, 20);
    assert!(snap
        .enemies
        .iter()
        .all(|e| (3..=21).contains(&(e.rect.y / 32))));

    // Opening-wave events arrive with the first tick.
    let first = engine.advance_tick(&idle());
    assert_eq!(
        count_events(&first, |e| matches!(e, GameEvent::EnemySpawned { .. })),
        8
    );
}

#[test]
fn test_spawner_without_spawn_tiles_is_noop() {
    let config = RoundConfig {
        total_enemies: 3,
        start_enemies: 3,
        ..quiet_config()
    };
    let engine = engine_on(OPEN_MAP, config);
    assert_eq!(engine.round().enemies_spawned, 0);
    assert!(enemy_entities(&engine).is_empty());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "validated config")]
fn test_new_round_rejects_inverted_retarget_range() {
    let config = RoundConfig {
        enemy_retarget_min_ms: 3000,
        enemy_retarget_max_ms: 1000,
        ..Default::default()
    };
    RoundEngine::new_round(&default_arena(), config);
}

// ---- Determinism ----

fn scripted_intents(tick: u32) -> TickIntents {
    let dir = Direction::ALL[(tick / 40) as usize % 4];
    TickIntents {
        p1: PlayerIntent {
            direction: Some(dir),
            fire: tick % 7 == 0,
        },
        p2: PlayerIntent {
            direction: Some(Direction::ALL[(tick / 25) as usize % 4]),
            fire: tick % 5 == 0,
        },
    }
}

#[test]
fn test_determinism_same_seed() {
    let grid = default_arena();
    let mut engine_a = RoundEngine::with_seed(&grid, RoundConfig::default(), 12345);
    let mut engine_b = RoundEngine::with_seed(&grid, RoundConfig::default(), 12345);

    for tick in 0..600 {
        let snap_a = engine_a.advance_tick(&scripted_intents(tick));
        let snap_b = engine_b.advance_tick(&scripted_intents(tick));

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let grid = default_arena();
    let mut engine_a = RoundEngine::with_seed(&grid, RoundConfig::default(), 111);
    let mut engine_b = RoundEngine::with_seed(&grid, RoundConfig::default(), 222);

    let mut diverged = false;
    for tick in 0..300 {
        let snap_a = engine_a.advance_tick(&scripted_intents(tick));
        let snap_b = engine_b.advance_tick(&scripted_intents(tick));
        if serde_json::to_string(&snap_a).unwrap() != serde_json::to_string(&snap_b).unwrap() {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

#[test]
fn test_reset_starts_a_fresh_round() {
    let grid = default_arena();
    let mut engine = RoundEngine::new_round(&grid, RoundConfig::default());
    for tick in 0..120 {
        engine.advance_tick(&scripted_intents(tick));
    }
    assert!(engine.time().tick > 0);

    engine.reset(&grid, RoundConfig::default());
    let fresh = RoundEngine::new_round(&grid, RoundConfig::default());
    assert_eq!(engine.time().tick, 0);
    assert_eq!(
        serde_json::to_string(&engine.snapshot()).unwrap(),
        serde_json::to_string(&fresh.snapshot()).unwrap()
    );
}

// ---- Collision resolver ----

#[test]
fn test_resolver_snaps_flush_on_x() {
    let bounds = Rect::new(0, 0, 640, 640);
    let wall = Rect::new(34, 0, 32, 32);

    let moved = resolve_motion(Rect::new(0, 0, 32, 32), IVec2::new(3, 0), &[wall], bounds);
    assert_eq!(moved.rect, Rect::new(2, 0, 32, 32));
    assert!(moved.blocked);

    let moved = resolve_motion(Rect::new(68, 0, 32, 32), IVec2::new(-3, 0), &[wall], bounds);
    assert_eq!(moved.rect.x, 66);
}

#[test]
fn test_resolver_snaps_flush_on_y() {
    let bounds = Rect::new(0, 0, 640, 640);
    let wall = Rect::new(0, 64, 32, 32);

    let moved = resolve_motion(Rect::new(0, 98, 32, 32), IVec2::new(0, -3), &[wall], bounds);
    assert_eq!(moved.rect.y, 96);

    let moved = resolve_motion(Rect::new(0, 30, 32, 32), IVec2::new(0, 3), &[wall], bounds);
    assert_eq!(moved.rect.y, 32);
}

#[test]
fn test_resolver_x_hit_cancels_y_step() {
    let bounds = Rect::new(0, 0, 640, 640);
    let wall = Rect::new(34, 0, 32, 32);

    let moved = resolve_motion(Rect::new(0, 0, 32, 32), IVec2::new(3, 3), &[wall], bounds);
    assert_eq!(moved.rect, Rect::new(2, 0, 32, 32), "y step must not apply");
}

#[test]
fn test_resolver_edge_contact_is_free() {
    let bounds = Rect::new(0, 0, 640, 640);
    let wall = Rect::new(35, 0, 32, 32);

    let moved = resolve_motion(Rect::new(0, 0, 32, 32), IVec2::new(3, 0), &[wall], bounds);
    assert_eq!(moved.rect.x, 3);
    assert!(!moved.blocked);
}

#[test]
fn test_resolver_clamps_to_bounds() {
    let bounds = Rect::new(0, 0, 100, 100);
    let moved = resolve_motion(Rect::new(1, 66, 32, 32), IVec2::new(-3, 0), &[], bounds);
    assert_eq!(moved.rect.x, 0);
    assert!(moved.blocked);

    let moved = resolve_motion(Rect::new(10, 66, 32, 32), IVec2::new(0, 3), &[], bounds);
    assert_eq!(moved.rect.y, 68);
}

#[test]
fn test_player_stops_flush_against_border() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());

    for _ in 0..20 {
        engine.advance_tick(&TickIntents::only(
            PlayerId::P1,
            PlayerIntent::moving(Direction::Left),
        ));
    }
    for _ in 0..60 {
        engine.advance_tick(&TickIntents::only(
            PlayerId::P1,
            PlayerIntent::moving(Direction::Up),
        ));
    }

    let p1 = engine.snapshot().player(PlayerId::P1).unwrap().clone();
    assert_eq!(p1.rect, Rect::new(32, 32, 32, 32));
    assert_eq!(p1.facing, Direction::Up);
    assert_eq!(p1.hp, 3, "walls never damage tanks");
}

#[test]
fn test_bushes_do_not_block() {
    let mut engine = engine_on(BUSH_MAP, quiet_config());

    for _ in 0..60 {
        engine.advance_tick(&TickIntents::only(
            PlayerId::P1,
            PlayerIntent::moving(Direction::Up),
        ));
    }
    let snap = engine.snapshot();
    assert_eq!(snap.player(PlayerId::P1).unwrap().rect.y, 32);
    assert_eq!(snap.bushes.len(), 5);
}

#[test]
fn test_idle_intent_stops_player() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    engine.advance_tick(&TickIntents::only(
        PlayerId::P1,
        PlayerIntent::moving(Direction::Right),
    ));
    let after_move = engine.snapshot().player(PlayerId::P1).unwrap().rect;
    assert_eq!(after_move.x, 35);

    engine.advance_tick(&idle());
    let snap = engine.snapshot();
    let p1 = snap.player(PlayerId::P1).unwrap();
    assert_eq!(p1.rect, after_move);
    assert_eq!(p1.facing, Direction::Right, "facing persists while idle");
}

// ---- Firing ----

#[test]
fn test_player_fire_cooldown_is_strict() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());

    let mut fired_at = Vec::new();
    for tick in 0..70 {
        let snap = engine.advance_tick(&TickIntents::only(PlayerId::P1, PlayerIntent::firing()));
        if count_events(&snap, |e| *e == GameEvent::BulletFired { owner: OwnerTag::P1 }) > 0 {
            fired_at.push(tick);
        }
    }
    // 516 ms is the first clock reading past 500; the next is 1033 - 516 > 500.
    assert_eq!(fired_at, vec![31, 62]);
}

#[test]
fn test_bullet_launches_from_tank_centre() {
    let mut engine = engine_on(
        OPEN_MAP,
        RoundConfig {
            player_fire_cooldown_ms: 0,
            ..quiet_config()
        },
    );
    engine.advance_tick(&idle());
    let snap = engine.advance_tick(&TickIntents::only(PlayerId::P1, PlayerIntent::firing()));

    assert_eq!(snap.bullets.len(), 1);
    let bullet = &snap.bullets[0];
    assert_eq!(bullet.owner, OwnerTag::P1);
    assert_eq!(bullet.direction, Direction::Up);
    // P1 centre is (48, 176); the bullet already flew one step.
    assert_eq!(bullet.rect, Rect::new(44, 168 - 7, 8, 8));
}

// ---- Bullets vs obstacles ----

#[test]
fn test_breakable_wall_removed_on_first_hit_and_both_bullets_consumed() {
    let mut engine = engine_on(WALL_MAP, quiet_config());
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    engine.spawn_test_bullet(Rect::new(100, 97, 8, 8), Direction::Up, OwnerTag::Enemy);

    let snap = engine.advance_tick(&idle());
    assert!(snap.bullets.is_empty());
    assert!(!snap
        .obstacles
        .iter()
        .any(|o| o.kind == ObstacleKind::BreakableWall));
    assert_eq!(count_events(&snap, |e| *e == GameEvent::WallDestroyed), 1);
    assert_eq!(
        count_events(&snap, |e| matches!(e, GameEvent::WallHit { .. })),
        2
    );
}

#[test]
fn test_indestructible_wall_never_wears_down() {
    let mut engine = engine_on(WALL_MAP, quiet_config());

    for _ in 0..50 {
        engine.spawn_test_bullet(Rect::new(108, 161, 8, 8), Direction::Up, OwnerTag::P2);
        let snap = engine.advance_tick(&idle());
        assert!(snap.bullets.is_empty());
    }

    let snap = engine.snapshot();
    let iron = snap
        .obstacles
        .iter()
        .find(|o| o.rect == cell_rect(3, 4))
        .expect("inner iron still standing");
    assert_eq!(iron.kind, ObstacleKind::IndestructibleWall);
    assert_eq!(iron.durability, Durability::Unbounded);
}

#[test]
fn test_bullet_leaving_playfield_is_removed() {
    let config = RoundConfig {
        player_fire_cooldown_ms: 0,
        ..quiet_config()
    };
    let grid = TileGrid::parse("000\n0A0\n000\n").unwrap();
    let mut engine = RoundEngine::new_round(&grid, config);

    engine.advance_tick(&idle());
    let snap = engine.advance_tick(&TickIntents::only(PlayerId::P1, PlayerIntent::firing()));
    assert_eq!(snap.bullets.len(), 1);

    let mut snap = snap;
    for _ in 0..20 {
        snap = engine.advance_tick(&idle());
    }
    assert!(snap.bullets.is_empty());
}

// ---- Hazard ----

#[test]
fn test_player_striking_hazard_loses() {
    for (shooter, winner) in [(OwnerTag::P1, PlayerId::P2), (OwnerTag::P2, PlayerId::P1)] {
        let mut engine = engine_on(HAZARD_MAP, quiet_config());
        engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, shooter);

        let snap = engine.advance_tick(&idle());
        assert_eq!(snap.outcome, RoundOutcome::Elimination { winner });
        assert!(!snap
            .obstacles
            .iter()
            .any(|o| o.kind == ObstacleKind::HazardCore));
        assert!(snap
            .events
            .contains(&GameEvent::HazardStruck { by: shooter }));
        assert!(snap.events.contains(&GameEvent::RoundEnded {
            outcome: RoundOutcome::Elimination { winner }
        }));
    }
}

#[test]
fn test_enemy_striking_hazard_changes_nothing() {
    let mut engine = engine_on(HAZARD_MAP, quiet_config());
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::Enemy);

    let snap = engine.advance_tick(&idle());
    assert_eq!(snap.outcome, RoundOutcome::Ongoing);
    assert!(snap.bullets.is_empty());
    assert_eq!(
        snap.obstacles
            .iter()
            .filter(|o| o.kind == ObstacleKind::HazardCore)
            .count(),
        1
    );
}

#[test]
fn test_hazard_strike_halts_remaining_combat() {
    let mut engine = engine_on(HAZARD_MAP, quiet_config());
    let p2 = player_entity(&engine, PlayerId::P2);
    set_hp(&mut engine, p2, 1);

    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    // Would respawn P2 if tank hits were resolved this tick.
    engine.spawn_test_bullet(Rect::new(148, 172, 8, 8), Direction::Right, OwnerTag::Enemy);

    let snap = engine.advance_tick(&idle());
    assert_eq!(
        snap.outcome,
        RoundOutcome::Elimination {
            winner: PlayerId::P2
        }
    );
    let p2_view = snap.player(PlayerId::P2).unwrap();
    assert_eq!(p2_view.hp, 1);
    assert_eq!(snap.bullets.len(), 1, "enemy bullet was never resolved");
    assert_eq!(
        count_events(&snap, |e| matches!(e, GameEvent::PlayerRespawned { .. })),
        0
    );
}

// ---- Bullets vs tanks ----

#[test]
fn test_enemy_kill_respawns_player() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    place(&mut engine, p1, cell_rect(3, 2));
    set_hp(&mut engine, p1, 1);
    engine.world_mut().get::<&mut Drive>(p1).unwrap().facing = Direction::Left;

    engine.spawn_test_bullet(Rect::new(84, 76, 8, 8), Direction::Right, OwnerTag::Enemy);
    let snap = engine.advance_tick(&idle());

    let view = snap.player(PlayerId::P1).expect("P1 respawned, not removed");
    assert_eq!(view.hp, view.max_hp);
    assert_eq!(view.rect, cell_rect(1, 5));
    assert_eq!(view.facing, Direction::Up);
    assert_eq!(snap.outcome, RoundOutcome::Ongoing);
    assert!(snap.bullets.is_empty());
    assert!(snap.events.contains(&GameEvent::PlayerRespawned {
        player: PlayerId::P1
    }));
}

#[test]
fn test_enemy_bullet_wounds_without_respawn() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    place(&mut engine, p1, cell_rect(3, 2));

    engine.spawn_test_bullet(Rect::new(84, 76, 8, 8), Direction::Right, OwnerTag::Enemy);
    let snap = engine.advance_tick(&idle());

    let view = snap.player(PlayerId::P1).unwrap();
    assert_eq!(view.hp, 2);
    assert_eq!(view.rect, cell_rect(3, 2));
}

#[test]
fn test_rival_kill_eliminates_player() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    place(&mut engine, p1, cell_rect(3, 2));
    set_hp(&mut engine, p1, 1);

    engine.spawn_test_bullet(Rect::new(84, 76, 8, 8), Direction::Right, OwnerTag::P2);
    let snap = engine.advance_tick(&idle());

    assert_eq!(
        snap.outcome,
        RoundOutcome::Elimination {
            winner: PlayerId::P2
        }
    );
    assert!(snap.player(PlayerId::P1).is_none());
    assert!(!engine.world().contains(p1));
    assert!(snap.events.contains(&GameEvent::PlayerDestroyed {
        player: PlayerId::P1,
        by: OwnerTag::P2
    }));
}

#[test]
fn test_first_elimination_is_final() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    let p2 = player_entity(&engine, PlayerId::P2);
    set_hp(&mut engine, p1, 1);
    set_hp(&mut engine, p2, 1);

    // Each bullet lands inside the other player's tank this tick.
    engine.spawn_test_bullet(Rect::new(28, 172, 8, 8), Direction::Right, OwnerTag::P2);
    engine.spawn_test_bullet(Rect::new(156, 172, 8, 8), Direction::Right, OwnerTag::P1);
    let snap = engine.advance_tick(&idle());

    // P1 resolves first, so P2's shot decides the round.
    assert_eq!(
        snap.outcome,
        RoundOutcome::Elimination {
            winner: PlayerId::P2
        }
    );
    assert!(snap.players.is_empty());
}

#[test]
fn test_own_bullet_never_hurts_shooter() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    engine.spawn_test_bullet(Rect::new(40, 172, 8, 8), Direction::Right, OwnerTag::P1);

    let snap = engine.advance_tick(&idle());
    assert_eq!(snap.player(PlayerId::P1).unwrap().hp, 3);
    assert_eq!(snap.bullets.len(), 1, "own bullet passes through");
}

#[test]
fn test_damage_ignores_own_tag_for_every_combination() {
    let grid = TileGrid::parse(OPEN_MAP).unwrap();
    let config = quiet_config();
    let mut world = World::new();
    let mut serials = SerialCounter::default();
    let mut round = RoundState::new(config.total_enemies);
    let mut events = Vec::new();
    let arena = world_setup::load_map(&mut world, &grid, &config);

    let mut spawn_player = |world: &mut World, id, col| {
        world_setup::spawn_player(world, &mut serials, &arena, id, TileCoord::new(col, 5), 0)
    };
    let p1 = spawn_player(&mut world, PlayerId::P1, 1);
    let p2 = spawn_player(&mut world, PlayerId::P2, 5);

    let state = tankwar_ai::fsm::SpawnState {
        facing: Direction::Down,
        speed: 0,
        retarget_interval_ms: 1000,
    };
    let mut spawn_enemy = |world: &mut World, kind, col| {
        let cell = TileCoord::new(col, 2);
        world_setup::spawn_enemy(world, &mut serials, &arena, cell, kind, state, 0)
    };
    let light = spawn_enemy(&mut world, EnemyKind::Light, 2);
    let heavy = spawn_enemy(&mut world, EnemyKind::Heavy, 4);

    for (target, own) in [
        (p1, OwnerTag::P1),
        (p2, OwnerTag::P2),
        (light, OwnerTag::Enemy),
        (heavy, OwnerTag::Enemy),
    ] {
        let before = world.get::<&Health>(target).unwrap().hp;
        let outcome = damage::apply(&mut world, target, 1, own, &arena, &mut round, &mut events);
        assert_eq!(outcome, DamageOutcome::Ignored);
        assert_eq!(world.get::<&Health>(target).unwrap().hp, before);
    }
    assert!(events.is_empty());
    assert_eq!(round.outcome, RoundOutcome::Ongoing);

    // Damage to a removed tank is a no-op.
    world.despawn(light).unwrap();
    let outcome =
        damage::apply(&mut world, light, 1, OwnerTag::P1, &arena, &mut round, &mut events);
    assert_eq!(outcome, DamageOutcome::Ignored);
}

// ---- Bullets vs enemies ----

#[test]
fn test_heavy_enemy_demotes_then_dies() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let enemy = engine.spawn_test_enemy(TileCoord::new(3, 2), EnemyKind::Heavy, Direction::Down);

    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    let snap = engine.advance_tick(&idle());

    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Light);
    assert_eq!(snap.enemies[0].hp, 1);
    assert!(snap.events.contains(&GameEvent::EnemyDemoted));
    assert_eq!(snap.score(PlayerId::P1), 0);

    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    let snap = engine.advance_tick(&idle());
    assert!(snap.enemies.is_empty());
    assert!(!engine.world().contains(enemy));
    assert_eq!(snap.score(PlayerId::P1), 1);
}

#[test]
fn test_enemy_bullets_pass_through_enemies() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    engine.spawn_test_enemy(TileCoord::new(3, 2), EnemyKind::Light, Direction::Down);
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::Enemy);

    let snap = engine.advance_tick(&idle());
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.bullets.len(), 1);
}

#[test]
fn test_two_bullets_on_one_enemy_credit_once() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    engine.spawn_test_enemy(TileCoord::new(3, 2), EnemyKind::Light, Direction::Down);
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    engine.spawn_test_bullet(Rect::new(100, 97, 8, 8), Direction::Up, OwnerTag::P2);

    let snap = engine.advance_tick(&idle());
    assert!(snap.enemies.is_empty());
    assert!(snap.bullets.is_empty(), "the late bullet is consumed too");
    assert_eq!(snap.score(PlayerId::P1), 1);
    assert_eq!(snap.score(PlayerId::P2), 0);
    assert_eq!(
        count_events(&snap, |e| matches!(e, GameEvent::EnemyDestroyed { .. })),
        1
    );
}

// ---- Tank overlap ----

#[test]
fn test_overlap_trades_damage_and_credits_kill() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    set_hp(&mut engine, p1, 2);
    engine.spawn_test_enemy(TileCoord::new(1, 5), EnemyKind::Light, Direction::Down);

    let snap = engine.advance_tick(&idle());
    let view = snap.player(PlayerId::P1).unwrap();
    // 2 - 1 for the ram, + 1 heal for the kill.
    assert_eq!(view.hp, 2);
    assert_eq!(view.score, 1);
    assert_eq!(snap.score(PlayerId::P1), 1);
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_overlap_can_respawn_and_credit_same_tick() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    place(&mut engine, p1, cell_rect(3, 3));
    set_hp(&mut engine, p1, 1);
    engine.spawn_test_enemy(TileCoord::new(3, 3), EnemyKind::Light, Direction::Down);

    let snap = engine.advance_tick(&idle());
    let view = snap.player(PlayerId::P1).unwrap();
    assert_eq!(view.rect, cell_rect(1, 5));
    assert_eq!(view.hp, view.max_hp);
    assert_eq!(view.score, 1);
    assert!(snap.enemies.is_empty());
}

#[test]
fn test_enemy_destroyed_by_overlap_spares_second_player() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    let p2 = player_entity(&engine, PlayerId::P2);
    place(&mut engine, p1, cell_rect(3, 3));
    place(&mut engine, p2, cell_rect(3, 3));
    engine.spawn_test_enemy(TileCoord::new(3, 3), EnemyKind::Light, Direction::Down);

    let snap = engine.advance_tick(&idle());
    assert!(snap.enemies.is_empty());
    // P1 trades first and kills it; the heal puts P1 back to full.
    let first = snap.player(PlayerId::P1).unwrap();
    assert_eq!(first.hp, first.max_hp);
    assert_eq!(first.score, 1);
    let second = snap.player(PlayerId::P2).unwrap();
    assert_eq!(second.hp, second.max_hp);
    assert_eq!(second.score, 0);
}

#[test]
fn test_respawned_player_leaves_remaining_contacts() {
    let mut engine = engine_on(OPEN_MAP, quiet_config());
    let p1 = player_entity(&engine, PlayerId::P1);
    place(&mut engine, p1, cell_rect(3, 3));
    set_hp(&mut engine, p1, 1);
    engine.spawn_test_enemy(TileCoord::new(3, 3), EnemyKind::Heavy, Direction::Down);
    engine.spawn_test_enemy(TileCoord::new(3, 3), EnemyKind::Heavy, Direction::Down);

    let snap = engine.advance_tick(&idle());
    let view = snap.player(PlayerId::P1).unwrap();
    assert_eq!(view.rect, cell_rect(1, 5));
    assert_eq!(view.hp, view.max_hp);
    assert_eq!(count_events(&snap, |e| matches!(e, GameEvent::PlayerRespawned { .. })), 1);

    assert_eq!(snap.enemies.len(), 2);
    assert_eq!(snap.enemies[0].kind, EnemyKind::Light);
    assert_eq!(snap.enemies[0].hp, 1);
    assert_eq!(snap.enemies[1].kind, EnemyKind::Heavy);
    assert_eq!(snap.enemies[1].hp, 2);
}

// ---- Enemy AI ----

#[test]
fn test_enemy_fires_on_interval_and_stays_flush_against_wall() {
    let config = RoundConfig {
        enemy_fire_interval_ms: 100,
        ..quiet_config()
    };
    let mut engine = engine_on(WALL_MAP, config);
    // Row 4, driving right into the iron block at (3,4).
    let enemy =
        engine.spawn_test_enemy(TileCoord::new(1, 4), EnemyKind::Light, Direction::Right);
    engine.world_mut().get::<&mut Drive>(enemy).unwrap().speed = 2;

    let mut fired_on = Vec::new();
    for tick in 0..30u64 {
        let snap = engine.advance_tick(&idle());
        let shots = count_events(&snap, |e| {
            matches!(e, GameEvent::BulletFired { owner: OwnerTag::Enemy })
        });
        if shots > 0 {
            assert_eq!(shots, 1);
            fired_on.push(tick);
        }
        if tick == 7 {
            // Launched from the pre-move centre (x = 46 + 16), then one step of flight.
            let bullet = snap.bullets.last().unwrap();
            assert_eq!(bullet.owner, OwnerTag::Enemy);
            assert_eq!(bullet.direction, Direction::Right);
            assert_eq!(bullet.rect, Rect::new(62 + 7, 140, 8, 8));
        }
        if tick >= 15 {
            assert_eq!(snap.enemies[0].rect, Rect::new(64, 128, 32, 32));
        }
        assert_eq!(snap.enemies[0].facing, Direction::Right);
    }
    // Strict 100 ms interval on the 60 Hz clock.
    assert_eq!(fired_on, vec![7, 14, 21, 28]);

    // Hitting the wall never resets the retarget timer.
    let retargeted_at = engine.world().get::<&EnemyTank>(enemy).unwrap().retargeted_at_ms;
    assert_eq!(retargeted_at, 0);
}

// ---- Round controller ----

#[test]
fn test_last_enemy_kill_wins_round() {
    let mut engine = engine_on(LANE_MAP, lane_config(1));
    let enemies = enemy_entities(&engine);
    assert_eq!(enemies.len(), 1);
    let enemy = enemies[0];
    {
        let world = engine.world_mut();
        world.get::<&mut EnemyTank>(enemy).unwrap().kind = EnemyKind::Light;
        *world.get::<&mut Health>(enemy).unwrap() = Health::full(1);
        world.get::<&mut Drive>(enemy).unwrap().speed = 0;
    }
    assert_eq!(engine.snapshot().enemies[0].rect, cell_rect(3, 2));

    let p1 = player_entity(&engine, PlayerId::P1);
    set_hp(&mut engine, p1, 2);

    engine.advance_tick(&idle());
    let mut snap = engine.advance_tick(&TickIntents::only(PlayerId::P1, PlayerIntent::firing()));
    for _ in 0..40 {
        if snap.outcome.is_terminal() {
            break;
        }
        snap = engine.advance_tick(&idle());
    }

    assert_eq!(
        snap.outcome,
        RoundOutcome::Victory {
            verdict: ScoreVerdict::Winner {
                player: PlayerId::P1
            }
        }
    );
    let view = snap.player(PlayerId::P1).unwrap();
    assert_eq!(view.score, 1);
    assert_eq!(view.hp, 3);
    assert_eq!(snap.counters.spawned, 1);
    assert_eq!(snap.counters.live, 0);
    assert_eq!(snap.counters.remaining, 0);
}

#[test]
fn test_kill_requests_replacement_spawn() {
    let mut engine = engine_on(LANE_MAP, lane_config(2));
    let enemy = enemy_entities(&engine)[0];
    {
        let world = engine.world_mut();
        *world.get::<&mut Health>(enemy).unwrap() = Health::full(1);
        world.get::<&mut Drive>(enemy).unwrap().speed = 0;
    }
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);

    let snap = engine.advance_tick(&idle());
    assert_eq!(snap.score(PlayerId::P1), 1);
    assert_eq!(snap.counters.spawned, 2);
    assert_eq!(snap.counters.live, 1);
    assert_eq!(snap.outcome, RoundOutcome::Ongoing);
    assert!(!engine.world().contains(enemy));
}

#[test]
fn test_empty_quota_is_an_immediate_tie() {
    let config = RoundConfig {
        total_enemies: 0,
        ..quiet_config()
    };
    let mut engine = engine_on(OPEN_MAP, config);
    let snap = engine.advance_tick(&idle());
    assert_eq!(
        snap.outcome,
        RoundOutcome::Victory {
            verdict: ScoreVerdict::Tie
        }
    );
}

#[test]
fn test_terminal_round_is_frozen() {
    let mut engine = engine_on(HAZARD_MAP, quiet_config());
    engine.spawn_test_bullet(Rect::new(108, 97, 8, 8), Direction::Up, OwnerTag::P1);
    engine.advance_tick(&idle());

    let time = engine.time();
    let before = engine.snapshot();
    for _ in 0..30 {
        let snap = engine.advance_tick(&TickIntents {
            p1: PlayerIntent::moving(Direction::Right),
            p2: PlayerIntent::moving(Direction::Left),
        });
        assert!(snap.events.is_empty());
    }
    assert_eq!(engine.time(), time);
    assert_eq!(
        serde_json::to_string(&engine.snapshot()).unwrap(),
        serde_json::to_string(&before).unwrap()
    );
}

// ---- Properties ----

fn open_grid_obstacles() -> impl Strategy<Value = Vec<Rect>> {
    prop::collection::btree_set((0i32..8, 0i32..8), 0..8).prop_map(|cells| {
        let mut cells: Vec<(i32, i32)> = cells.into_iter().collect();
        cells.sort_by_key(|(col, row)| (*row, *col));
        cells
            .into_iter()
            .map(|(col, row)| cell_rect(col, row))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_resolved_tank_never_overlaps_obstacle(
        obstacles in open_grid_obstacles(),
        x in 0i32..=224,
        y in 0i32..=224,
        vx in -32i32..=32,
        vy in -32i32..=32,
    ) {
        let bounds = Rect::new(0, 0, 256, 256);
        let start = Rect::new(x, y, 32, 32);
        prop_assume!(obstacles.iter().all(|o| !start.intersects(o)));

        let moved = resolve_motion(start, IVec2::new(vx, vy), &obstacles, bounds);
        for obstacle in &obstacles {
            prop_assert!(!moved.rect.intersects(obstacle), "{:?} overlaps {:?}", moved.rect, obstacle);
        }
        prop_assert!(moved.rect.left() >= 0 && moved.rect.right() <= 256);
        prop_assert!(moved.rect.top() >= 0 && moved.rect.bottom() <= 256);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_spawn_quota_and_cap_hold(
        total in 0u32..6,
        start_fraction in 0u32..=100,
        cap in 1u32..4,
        seed in any::<u64>(),
    ) {
        let config = RoundConfig {
            total_enemies: total,
            start_enemies: total * start_fraction / 100,
            max_concurrent_enemies: cap,
            player_fire_cooldown_ms: 0,
            seed,
            ..Default::default()
        };
        let mut engine = RoundEngine::new_round(&default_arena(), config);

        for tick in 0..400 {
            let snap = engine.advance_tick(&scripted_intents(tick));
            prop_assert!(snap.counters.spawned <= total);
            prop_assert!(snap.counters.live <= cap);
            prop_assert_eq!(
                snap.counters.remaining,
                total - snap.counters.spawned + snap.counters.live
            );
            for player in &snap.players {
                prop_assert!(player.hp >= 0 && player.hp <= player.max_hp);
            }

            let exhausted = snap.counters.spawned == total && snap.counters.live == 0;
            match snap.outcome {
                RoundOutcome::Victory { verdict } => {
                    prop_assert!(exhausted);
                    prop_assert_eq!(
                        verdict,
                        ScoreVerdict::from_scores(snap.scores.p1, snap.scores.p2)
                    );
                }
                RoundOutcome::Ongoing => prop_assert!(!exhausted),
                RoundOutcome::Elimination { .. } => {}
            }
            if snap.outcome.is_terminal() {
                break;
            }
        }
    }
}
