//! Fire-and-forget notifications for the audio and render layers.
//!
//! Events carry no semantics back into the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// A tank fired a bullet.
    BulletFired { owner: OwnerTag },
    /// A bullet struck a wall.
    WallHit { kind: ObstacleKind },
    /// A breakable wall ran out of durability.
    WallDestroyed,
    /// A bullet struck the hazard core.
    HazardStruck { by: OwnerTag },
    /// A new enemy entered the field.
    EnemySpawned { kind: EnemyKind },
    /// A heavy enemy dropped to light.
    EnemyDemoted,
    /// An enemy was destroyed and credited to a shooter.
    EnemyDestroyed { by: OwnerTag },
    /// A player was reset to their spawn tile after an enemy kill.
    PlayerRespawned { player: PlayerId },
    /// A player was permanently removed.
    PlayerDestroyed { player: PlayerId, by: OwnerTag },
    /// The round reached a terminal outcome.
    RoundEnded { outcome: RoundOutcome },
}
