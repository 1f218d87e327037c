//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behaviour beyond trivial
//! accessors. Game rules live in the sim systems, not here.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Rect, TileCoord};

/// Occupied rectangle of any placed entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Body {
    pub rect: Rect,
}

/// Stable spawn-order number, used to iterate tanks and bullets deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Serial(pub u32);

/// Faction of a tank or bullet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Owner(pub OwnerTag);

/// Facing direction plus current drive speed (pixels per tick, 0 = idle).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Drive {
    pub facing: Direction,
    pub speed: i32,
}

/// Hit points, kept within `0..=max`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { hp: max, max }
    }
}

/// Player-only tank state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTank {
    pub id: PlayerId,
    /// Respawn cell, fixed for the tank's lifetime.
    pub spawn: TileCoord,
    /// Round clock at the last accepted shot (round start counts as a shot).
    pub last_fired_ms: u64,
}

/// Enemy-only tank state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTank {
    pub kind: EnemyKind,
    /// Round clock at the last retarget.
    pub retargeted_at_ms: u64,
    /// Current randomized retarget interval.
    pub retarget_interval_ms: u64,
    /// Round clock at the last shot.
    pub fired_at_ms: u64,
}

/// A projectile in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bullet {
    pub direction: Direction,
    pub speed: i32,
}

/// Static, colliding map object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub durability: Durability,
    /// Source cell; lower row-major cells win collision tie-breaks.
    pub cell: TileCoord,
}

/// Marks an obstacle as part of the hazard subset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hazard;

/// Non-colliding foliage drawn above tanks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bush;
