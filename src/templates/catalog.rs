//! Template catalog: the immutable roster of heroes, monsters and items.

use crate::character::{Hero, HeroTemplate};
use crate::combat::{MonsterSpecies, MonsterTemplate};
use crate::core::error::GameError;
use crate::items::{Armor, Item, Potion, Spell, Weapon};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog has no {0}")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateCatalog {
    pub heroes: Vec<HeroTemplate>,
    pub monsters: Vec<MonsterTemplate>,
    pub weapons: Vec<Weapon>,
    pub armors: Vec<Armor>,
    pub potions: Vec<Potion>,
    pub spells: Vec<Spell>,
}

impl TemplateCatalog {
    /// The roster shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(data: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(data)?;
        catalog.validate()?;
        debug!(
            heroes = catalog.heroes.len(),
            monsters = catalog.monsters.len(),
            items = catalog.item_count(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    /// A playable catalog needs heroes to pick and monsters to fight.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.heroes.is_empty() {
            return Err(CatalogError::Empty("heroes"));
        }
        if self.monsters.is_empty() {
            return Err(CatalogError::Empty("monsters"));
        }
        Ok(())
    }

    pub fn pool(&self, species: MonsterSpecies) -> impl Iterator<Item = &MonsterTemplate> {
        self.monsters.iter().filter(move |m| m.species == species)
    }

    /// Every monster template, Dragon pool first, then Exoskeleton, then Spirit.
    pub fn monster_pools(&self) -> impl Iterator<Item = &MonsterTemplate> {
        MonsterSpecies::all()
            .into_iter()
            .flat_map(move |species| self.pool(species))
    }

    pub fn item_count(&self) -> usize {
        self.weapons.len() + self.armors.len() + self.potions.len() + self.spells.len()
    }

    /// Market stock: weapons, armor, potions, then spells.
    pub fn all_items(&self) -> Vec<Item> {
        let mut items = Vec::with_capacity(self.item_count());
        items.extend(self.weapons.iter().cloned().map(Item::Weapon));
        items.extend(self.armors.iter().cloned().map(Item::Armor));
        items.extend(self.potions.iter().cloned().map(Item::Potion));
        items.extend(self.spells.iter().cloned().map(Item::Spell));
        items
    }

    /// Builds a party from zero-based hero indices. Each pick is a fresh copy.
    pub fn select_party(&self, indices: &[usize], max_size: usize) -> Result<Vec<Hero>, GameError> {
        if indices.is_empty() || indices.len() > max_size {
            return Err(GameError::InvalidSelection {
                choice: indices.len() as i64,
                max: max_size,
            });
        }

        let mut seen = HashSet::new();
        let mut party = Vec::with_capacity(indices.len());
        for &idx in indices {
            let template = self.heroes.get(idx).filter(|_| seen.insert(idx)).ok_or(
                GameError::InvalidSelection {
                    choice: idx as i64 + 1,
                    max: self.heroes.len(),
                },
            )?;
            party.push(Hero::from_template(template));
        }
        Ok(party)
    }
}
