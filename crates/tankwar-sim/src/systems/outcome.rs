//! Victory check: once every enemy has been spawned and destroyed, the
//! higher score wins.

use hecs::World;

use tankwar_core::enums::{PlayerId, RoundOutcome, ScoreVerdict};

use crate::round::RoundState;
use crate::systems::spawner::live_enemies;

/// Only evaluated while the round is still ongoing.
pub fn run(world: &World, round: &mut RoundState) {
    if round.is_over() || !round.quota_exhausted() || live_enemies(world) > 0 {
        return;
    }

    let verdict = ScoreVerdict::from_scores(round.score(PlayerId::P1), round.score(PlayerId::P2));
    round.terminate(RoundOutcome::Victory { verdict });
}
