//! Enemy archetype parameters.

use rand::Rng;

use tankwar_core::config::RoundConfig;
use tankwar_core::enums::EnemyKind;

/// Per-archetype stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyProfile {
    pub kind: EnemyKind,
    pub max_hp: i32,
}

pub fn get_profile(kind: EnemyKind, config: &RoundConfig) -> EnemyProfile {
    let max_hp = match kind {
        EnemyKind::Light => config.light_enemy_hp,
        EnemyKind::Heavy => config.heavy_enemy_hp,
    };
    EnemyProfile { kind, max_hp }
}

/// Light or Heavy with equal odds.
pub fn roll_kind<R: Rng + ?Sized>(rng: &mut R) -> EnemyKind {
    if rng.gen_bool(0.5) {
        EnemyKind::Light
    } else {
        EnemyKind::Heavy
    }
}

/// One-way Heavy -> Light transition once a heavy is down to its last hit point.
pub fn demoted_kind(kind: EnemyKind, hp_after_damage: i32) -> Option<EnemyKind> {
    match kind {
        EnemyKind::Heavy if hp_after_damage == 1 => Some(EnemyKind::Light),
        _ => None,
    }
}
