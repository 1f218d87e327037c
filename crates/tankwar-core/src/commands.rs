//! Per-tick intents supplied by the input layer.
//!
//! The engine samples one `TickIntents` per tick; nothing is queued across ticks.

use serde::{Deserialize, Serialize};

use crate::enums::{Direction, PlayerId};

/// What one player wants to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// Direction held this tick; `None` means stand still.
    pub direction: Option<Direction>,
    /// Fire request (subject to the player's cooldown).
    pub fire: bool,
}

impl PlayerIntent {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn moving(direction: Direction) -> Self {
        Self {
            direction: Some(direction),
            fire: false,
        }
    }

    pub fn firing() -> Self {
        Self {
            direction: None,
            fire: true,
        }
    }
}

/// Intents for both seats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickIntents {
    pub p1: PlayerIntent,
    pub p2: PlayerIntent,
}

impl TickIntents {
    pub fn for_player(&self, id: PlayerId) -> PlayerIntent {
        match id {
            PlayerId::P1 => self.p1,
            PlayerId::P2 => self.p2,
        }
    }

    /// Intents where only `id` acts.
    pub fn only(id: PlayerId, intent: PlayerIntent) -> Self {
        let mut intents = Self::default();
        match id {
            PlayerId::P1 => intents.p1 = intent,
            PlayerId::P2 => intents.p2 = intent,
        }
        intents
    }
}
