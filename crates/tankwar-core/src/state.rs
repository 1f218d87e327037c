//! Round snapshot: the complete visible state handed to the render/UI layer.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{Rect, SimTime};

/// Everything a frontend needs to draw one frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub time: SimTime,
    pub outcome: RoundOutcome,
    pub players: Vec<PlayerView>,
    pub enemies: Vec<EnemyView>,
    pub bullets: Vec<BulletView>,
    pub obstacles: Vec<ObstacleView>,
    pub bushes: Vec<Rect>,
    pub counters: EnemyCounters,
    /// Final tally; kept even after a player is removed.
    pub scores: Scoreboard,
    /// Events produced since the previous snapshot.
    pub events: Vec<GameEvent>,
}

impl RoundSnapshot {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn score(&self, id: PlayerId) -> u32 {
        match id {
            PlayerId::P1 => self.scores.p1,
            PlayerId::P2 => self.scores.p2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub rect: Rect,
    pub facing: Direction,
    pub hp: i32,
    pub max_hp: i32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub serial: u32,
    pub kind: EnemyKind,
    pub rect: Rect,
    pub facing: Direction,
    pub hp: i32,
    pub max_hp: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulletView {
    pub serial: u32,
    pub owner: OwnerTag,
    pub rect: Rect,
    pub direction: Direction,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleView {
    pub kind: ObstacleKind,
    pub rect: Rect,
    pub durability: Durability,
}

/// Enemy quota bookkeeping for the HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyCounters {
    pub total: u32,
    pub spawned: u32,
    pub live: u32,
    /// Not yet spawned plus currently live.
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub p1: u32,
    pub p2: u32,
}
