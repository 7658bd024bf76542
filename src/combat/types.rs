use super::math;
use crate::core::constants::{HP_PER_LEVEL, MONSTER_DODGE_PERCENT_MAX};
use serde::{Deserialize, Serialize};

/// Monster family. All three currently fight the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterSpecies {
    Dragon,
    Exoskeleton,
    Spirit,
}

impl MonsterSpecies {
    /// Pool order used when searching templates.
    pub fn all() -> [MonsterSpecies; 3] {
        [
            MonsterSpecies::Dragon,
            MonsterSpecies::Exoskeleton,
            MonsterSpecies::Spirit,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            MonsterSpecies::Dragon => "Dragon",
            MonsterSpecies::Exoskeleton => "Exoskeleton",
            MonsterSpecies::Spirit => "Spirit",
        }
    }
}

/// Flat record a monster is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub name: String,
    pub species: MonsterSpecies,
    pub level: u32,
    pub base_damage: u32,
    pub defense: u32,
    /// Percent, clamped to [0, 100].
    pub dodge_chance: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub species: MonsterSpecies,
    pub level: u32,
    pub hp: u32,
    pub base_damage: u32,
    pub defense: u32,
    dodge_percent: u32,
}

impl Monster {
    pub fn new(
        name: impl Into<String>,
        species: MonsterSpecies,
        level: u32,
        base_damage: u32,
        defense: u32,
        dodge_percent: u32,
    ) -> Self {
        let level = level.max(1);
        Self {
            name: name.into(),
            species,
            level,
            hp: level * HP_PER_LEVEL,
            base_damage,
            defense,
            dodge_percent: dodge_percent.min(MONSTER_DODGE_PERCENT_MAX),
        }
    }

    pub fn from_template(template: &MonsterTemplate) -> Self {
        Self::new(
            template.name.clone(),
            template.species,
            template.level,
            template.base_damage,
            template.defense,
            template.dodge_chance,
        )
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn dodge_percent(&self) -> u32 {
        self.dodge_percent
    }

    pub fn set_dodge_percent(&mut self, percent: u32) {
        self.dodge_percent = percent.min(MONSTER_DODGE_PERCENT_MAX);
    }

    /// Dodge probability, capped at 30%.
    pub fn dodge_chance(&self) -> f64 {
        math::monster_dodge_chance(self.dodge_percent)
    }

    pub fn describe(&self) -> String {
        format!(
            "{} the {} (L{}, HP:{}, Dmg:{}, Def:{}, Dodge:{}%)",
            self.name,
            self.species.name(),
            self.level,
            self.hp,
            self.base_damage,
            self.defense,
            self.dodge_percent
        )
    }
}
