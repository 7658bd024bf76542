//! Error taxonomy shared by the battle resolver, market and session.

use std::fmt;
use thiserror::Error;

/// A spendable or gating resource an action can fall short on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Mana,
    Gold,
    Level,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Mana => "mana",
            Resource::Gold => "gold",
            Resource::Level => "level",
        };
        f.write_str(name)
    }
}

/// The kind of thing an action needed but could not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Monster,
    Spell,
    Potion,
    Weapon,
    Armor,
    Item,
    Market,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TargetKind::Monster => "monster",
            TargetKind::Spell => "spell",
            TargetKind::Potion => "potion",
            TargetKind::Weapon => "weapon",
            TargetKind::Armor => "armor",
            TargetKind::Item => "item",
            TargetKind::Market => "market",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Out-of-range answer from the decision source. Recovered by re-prompting.
    #[error("invalid selection {choice} (expected 0..={max})")]
    InvalidSelection { choice: i64, max: usize },

    /// Not enough mana, gold or level. The action is rejected, the turn is kept.
    #[error("not enough {resource}: need {needed}, have {available}")]
    InsufficientResource {
        resource: Resource,
        needed: u32,
        available: u32,
    },

    /// Nothing of the requested kind to act on.
    #[error("no {0} available")]
    NoValidTarget(TargetKind),

    #[error("map generation failed after {attempts} attempts")]
    MapGenerationFailed { attempts: u32 },

    #[error("invalid map size {rows}x{cols}")]
    InvalidMapSize { rows: usize, cols: usize },

    #[error("the party has been defeated")]
    GameOver,
}

impl GameError {
    /// Whether the error is handled inside the loop that produced it.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GameError::InvalidSelection { .. }
                | GameError::InsufficientResource { .. }
                | GameError::NoValidTarget(_)
        )
    }
}
