//! Enumeration types used throughout the simulation.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Facing / travel direction of a tank or bullet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in screen space (y grows downward).
    pub fn unit(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// One of the two human-controlled seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::P1, PlayerId::P2];

    pub fn opponent(self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    pub fn tag(self) -> OwnerTag {
        OwnerTag::from(self)
    }
}

/// Faction tag carried by tanks and the bullets they fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OwnerTag {
    P1,
    P2,
    Enemy,
}

impl OwnerTag {
    /// The player behind this tag, if any.
    pub fn player(self) -> Option<PlayerId> {
        match self {
            OwnerTag::P1 => Some(PlayerId::P1),
            OwnerTag::P2 => Some(PlayerId::P2),
            OwnerTag::Enemy => None,
        }
    }
}

impl From<PlayerId> for OwnerTag {
    fn from(id: PlayerId) -> Self {
        match id {
            PlayerId::P1 => OwnerTag::P1,
            PlayerId::P2 => OwnerTag::P2,
        }
    }
}

/// Static obstacle kinds. Bushes are decoration and never obstacles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    BreakableWall,
    IndestructibleWall,
    HazardCore,
}

/// Remaining hits an obstacle can absorb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Durability {
    Finite(u32),
    Unbounded,
}

impl Durability {
    /// Initial durability for an obstacle kind.
    pub fn initial(kind: ObstacleKind) -> Self {
        match kind {
            ObstacleKind::BreakableWall | ObstacleKind::HazardCore => Durability::Finite(1),
            ObstacleKind::IndestructibleWall => Durability::Unbounded,
        }
    }

    /// Absorb one hit. Returns true when the obstacle is used up.
    pub fn absorb_hit(&mut self) -> bool {
        match self {
            Durability::Finite(hits) => {
                *hits = hits.saturating_sub(1);
                *hits == 0
            }
            Durability::Unbounded => false,
        }
    }
}

/// Enemy tank archetype. Heavy demotes to Light once, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Light,
    Heavy,
}

/// Result of comparing scores once the enemy quota is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum ScoreVerdict {
    Winner { player: PlayerId },
    Tie,
}

impl ScoreVerdict {
    pub fn from_scores(p1: u32, p2: u32) -> Self {
        match p1.cmp(&p2) {
            std::cmp::Ordering::Greater => ScoreVerdict::Winner {
                player: PlayerId::P1,
            },
            std::cmp::Ordering::Less => ScoreVerdict::Winner {
                player: PlayerId::P2,
            },
            std::cmp::Ordering::Equal => ScoreVerdict::Tie,
        }
    }
}

/// Round lifecycle. Anything other than `Ongoing` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoundOutcome {
    #[default]
    Ongoing,
    /// Enemy quota exhausted and the field is clear; decided on score.
    Victory { verdict: ScoreVerdict },
    /// A player was eliminated by the other player or by hazard misuse.
    Elimination { winner: PlayerId },
}

impl RoundOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RoundOutcome::Ongoing)
    }
}
