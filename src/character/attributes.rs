use crate::core::constants::LEVEL_UP_STAT_MULTIPLIER;
use serde::{Deserialize, Serialize};

pub const NUM_PRIMARY_STATS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttributeType {
    Strength,
    Dexterity,
    Agility,
}

impl AttributeType {
    pub fn all() -> [AttributeType; NUM_PRIMARY_STATS] {
        [
            AttributeType::Strength,
            AttributeType::Dexterity,
            AttributeType::Agility,
        ]
    }

    pub fn abbrev(&self) -> &str {
        match self {
            AttributeType::Strength => "Str",
            AttributeType::Dexterity => "Dex",
            AttributeType::Agility => "Agi",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            AttributeType::Strength => 0,
            AttributeType::Dexterity => 1,
            AttributeType::Agility => 2,
        }
    }
}

/// Strength, dexterity and agility of a hero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Attributes {
    values: [u32; NUM_PRIMARY_STATS],
}

impl Attributes {
    pub fn new(strength: u32, dexterity: u32, agility: u32) -> Self {
        Self {
            values: [strength, dexterity, agility],
        }
    }

    pub fn get(&self, attr: AttributeType) -> u32 {
        self.values[attr.index()]
    }

    pub fn set(&mut self, attr: AttributeType, value: u32) {
        self.values[attr.index()] = value;
    }

    pub fn strength(&self) -> u32 {
        self.get(AttributeType::Strength)
    }

    pub fn dexterity(&self) -> u32 {
        self.get(AttributeType::Dexterity)
    }

    pub fn agility(&self) -> u32 {
        self.get(AttributeType::Agility)
    }

    /// Multiplies one stat by the level-up factor, truncating.
    pub fn grow(&mut self, attr: AttributeType) {
        let grown = (self.get(attr) as f64 * LEVEL_UP_STAT_MULTIPLIER) as u32;
        self.set(attr, grown);
    }

    /// Applies the generic level-up growth to every stat.
    pub fn grow_all(&mut self) {
        for attr in AttributeType::all() {
            self.grow(attr);
        }
    }
}
