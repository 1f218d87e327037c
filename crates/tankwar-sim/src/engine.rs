//! Round engine: the core of the simulation.
//!
//! `RoundEngine` owns the hecs ECS world, applies per-tick player intents,
//! runs all systems, and produces `RoundSnapshot`s. Completely headless, so
//! a round can be replayed deterministically from a seed and an intent log.

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tankwar_core::commands::TickIntents;
use tankwar_core::config::RoundConfig;
use tankwar_core::enums::{PlayerId, RoundOutcome};
use tankwar_core::events::GameEvent;
use tankwar_core::state::RoundSnapshot;
use tankwar_core::types::SimTime;
use tankwar_map::TileGrid;

use crate::round::{Arena, RoundState};
use crate::systems;
use crate::systems::combat::Resolution;
use crate::world_setup::{self, SerialCounter};

/// The round engine. Owns the ECS world and all round state.
pub struct RoundEngine {
    world: World,
    time: SimTime,
    arena: Arena,
    round: RoundState,
    rng: ChaCha8Rng,
    serials: SerialCounter,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
}

impl RoundEngine {
    /// Build a fresh round from a map and config, seeded from `config.seed`.
    ///
    /// Both players are placed on their spawn cells and the opening wave of
    /// enemies is spawned before the first tick. `config` must pass
    /// [`RoundConfig::validate`].
    pub fn new_round(grid: &TileGrid, config: RoundConfig) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "new_round needs a validated config: {:?}",
            config.validate()
        );
        let mut world = World::new();
        let mut serials = SerialCounter::default();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut round = RoundState::new(config.total_enemies);
        let mut events = Vec::new();

        let arena = world_setup::load_map(&mut world, grid, &config);
        for (id, spawn) in PlayerId::BOTH.into_iter().zip(grid.player_spawns()) {
            world_setup::spawn_player(&mut world, &mut serials, &arena, id, spawn, 0);
        }
        systems::spawner::spawn_opening(
            &mut world,
            &arena,
            &mut round,
            &mut rng,
            &mut serials,
            &mut events,
        );

        log::info!(
            "New round: {}x{} map, {} enemies ({} at start), seed {}",
            grid.width(),
            grid.height(),
            config.total_enemies,
            round.enemies_spawned,
            config.seed
        );

        Self {
            world,
            time: SimTime::default(),
            arena,
            round,
            rng,
            serials,
            despawn_buffer: Vec::new(),
            events,
        }
    }

    /// Same as [`RoundEngine::new_round`] with the seed overridden.
    pub fn with_seed(grid: &TileGrid, config: RoundConfig, seed: u64) -> Self {
        Self::new_round(grid, RoundConfig { seed, ..config })
    }

    /// Discard everything and start over on `grid`.
    pub fn reset(&mut self, grid: &TileGrid, config: RoundConfig) {
        *self = Self::new_round(grid, config);
    }

    /// Advance the round by one tick and return the resulting snapshot.
    ///
    /// Once the outcome is terminal the world is frozen: no system runs and
    /// the clock stops.
    pub fn advance_tick(&mut self, intents: &TickIntents) -> RoundSnapshot {
        if !self.round.is_over() {
            self.run_systems(intents);
            self.time.advance();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.round, events)
    }

    /// Current state without advancing. Pending events are left in place.
    pub fn snapshot(&self) -> RoundSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.round, Vec::new())
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.round.outcome
    }

    /// Get the current round time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Quota counters, scoreboard and outcome.
    pub fn round(&self) -> &RoundState {
        &self.round
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for tests that stage exact positions.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn an enemy on `cell` outside the quota bookkeeping (for tests).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        cell: tankwar_core::types::TileCoord,
        kind: tankwar_core::enums::EnemyKind,
        facing: tankwar_core::enums::Direction,
    ) -> hecs::Entity {
        let state = tankwar_ai::fsm::SpawnState {
            facing,
            speed: 0,
            retarget_interval_ms: u64::MAX / 2,
        };
        let now_ms = self.time.elapsed_ms();
        world_setup::spawn_enemy(
            &mut self.world,
            &mut self.serials,
            &self.arena,
            cell,
            kind,
            state,
            now_ms,
        )
    }

    /// Spawn a bullet with an exact rectangle (for tests).
    #[cfg(test)]
    pub fn spawn_test_bullet(
        &mut self,
        rect: tankwar_core::types::Rect,
        direction: tankwar_core::enums::Direction,
        owner: tankwar_core::enums::OwnerTag,
    ) -> hecs::Entity {
        let entity = world_setup::spawn_bullet(
            &mut self.world,
            &mut self.serials,
            &self.arena,
            rect,
            direction,
            owner,
        );
        if let Ok(mut body) = self.world.get::<&mut tankwar_core::components::Body>(entity) {
            body.rect = rect;
        }
        entity
    }

    /// Run all systems in order.
    fn run_systems(&mut self, intents: &TickIntents) {
        let now_ms = self.time.elapsed_ms();

        // 1. Player fire and drive intents
        systems::intents::run(
            &mut self.world,
            intents,
            &self.arena,
            now_ms,
            &mut self.serials,
            &mut self.events,
        );

        // 2. Enemy retarget and fire
        systems::enemy_ai::run(
            &mut self.world,
            &self.arena,
            &mut self.rng,
            now_ms,
            &mut self.serials,
            &mut self.events,
        );

        // 3. Tank movement against obstacles
        systems::movement::run(&mut self.world, &self.arena);

        // 4. Bullet flight and off-field cleanup
        systems::bullets::run(&mut self.world, &self.arena, &mut self.despawn_buffer);

        // 5. Combat
        let resolution =
            systems::combat::run(&mut self.world, &self.arena, &mut self.round, &mut self.events);

        if resolution == Resolution::Completed {
            // 6. Replacement spawns for this tick's kill credits
            systems::spawner::run(
                &mut self.world,
                &self.arena,
                &mut self.round,
                &mut self.rng,
                now_ms,
                &mut self.serials,
                &mut self.events,
            );

            // 7. Victory check
            systems::outcome::run(&self.world, &mut self.round);
        }

        if self.round.is_over() {
            log::info!(
                "Round over at tick {}: {:?}",
                self.time.tick,
                self.round.outcome
            );
            self.events.push(GameEvent::RoundEnded {
                outcome: self.round.outcome,
            });
        }
    }
}
