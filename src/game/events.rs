//! # Game Events
//!
//! Things that happened during a tick, for the renderer, the HUD and the
//! level sequencing to react to.

use crate::game::entities::{EntityId, MonsterKind};
use crate::utils::Vector2;
use serde::{Deserialize, Serialize};

/// Something that happened during the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A monster hit the knight. `at` is where the blood goes.
    HeroDamaged { amount: f32, remaining: f32, at: Vector2 },
    /// The knight's sword connected.
    MonsterHit {
        monster: EntityId,
        kind: MonsterKind,
        damage: f32,
        at: Vector2,
    },
    /// A monster's health reached zero.
    MonsterKilled {
        monster: EntityId,
        kind: MonsterKind,
        kill_reward: f32,
    },
    /// The knight swung the weapon.
    WeaponSwung { targets: usize },
    /// The knight's health reached zero.
    HeroDied,
    /// The knight reached stairs and was sent back to spawn.
    LevelExit { level: String },
    /// A level was (re)built and entered.
    LevelEntered { level: String },
}

impl GameEvent {
    /// Where a blood decal belongs, for events that leave one.
    pub fn blood_position(&self) -> Option<Vector2> {
        match self {
            GameEvent::HeroDamaged { at, .. } | GameEvent::MonsterHit { at, .. } => Some(*at),
            _ => None,
        }
    }

    /// A short line for the message log, if the event deserves one.
    pub fn message(&self) -> Option<String> {
        match self {
            GameEvent::HeroDamaged { amount, remaining, .. } => Some(format!(
                "You take {amount:.0} damage ({remaining:.0} left)"
            )),
            GameEvent::MonsterKilled { kind, .. } => Some(format!("The {kind:?} falls")),
            GameEvent::HeroDied => Some("You died".to_string()),
            GameEvent::LevelEntered { level } => Some(format!("Entering {level}")),
            _ => None,
        }
    }
}
