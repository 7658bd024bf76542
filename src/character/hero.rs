//! Heroes: the player-controlled side of every battle.

use super::attributes::{AttributeType, Attributes};
use crate::combat::math;
use crate::core::constants::{
    HP_PER_LEVEL, LEVEL_UP_MANA_MULTIPLIER, REVIVE_HP_PER_LEVEL, ROUND_REGEN_MULTIPLIER,
    XP_PER_LEVEL,
};
use crate::items::{Equipment, Item, Potion, PotionAttribute, Spell};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroClass {
    Warrior,
    Sorcerer,
    Paladin,
}

impl HeroClass {
    pub fn all() -> [HeroClass; 3] {
        [HeroClass::Warrior, HeroClass::Sorcerer, HeroClass::Paladin]
    }

    pub fn name(&self) -> &'static str {
        match self {
            HeroClass::Warrior => "Warrior",
            HeroClass::Sorcerer => "Sorcerer",
            HeroClass::Paladin => "Paladin",
        }
    }

    /// The two stats that receive an extra growth step on level-up.
    pub fn favored_stats(&self) -> [AttributeType; 2] {
        match self {
            HeroClass::Warrior => [AttributeType::Strength, AttributeType::Agility],
            HeroClass::Sorcerer => [AttributeType::Dexterity, AttributeType::Agility],
            HeroClass::Paladin => [AttributeType::Strength, AttributeType::Dexterity],
        }
    }
}

/// Flat record a hero is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroTemplate {
    pub name: String,
    pub class: HeroClass,
    #[serde(default = "default_level")]
    pub level: u32,
    pub mana: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub agility: u32,
    pub gold: u32,
    pub experience: u32,
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub name: String,
    pub class: HeroClass,
    pub level: u32,
    pub hp: u32,
    pub mana: u32,
    pub attributes: Attributes,
    pub gold: u32,
    pub experience: u32,
    pub fainted: bool,
    pub equipment: Equipment,
    pub inventory: Vec<Item>,
}

impl Hero {
    /// A fresh hero at `level` with `level * 100` hp and empty purse.
    pub fn new(name: impl Into<String>, class: HeroClass, level: u32, attributes: Attributes) -> Self {
        let level = level.max(1);
        Self {
            name: name.into(),
            class,
            level,
            hp: level * HP_PER_LEVEL,
            mana: 0,
            attributes,
            gold: 0,
            experience: 0,
            fainted: false,
            equipment: Equipment::new(),
            inventory: Vec::new(),
        }
    }

    pub fn from_template(template: &HeroTemplate) -> Self {
        let mut hero = Self::new(
            template.name.clone(),
            template.class,
            template.level,
            Attributes::new(template.strength, template.dexterity, template.agility),
        );
        hero.mana = template.mana;
        hero.gold = template.gold;
        hero.experience = template.experience;
        hero
    }

    pub fn with_mana(mut self, mana: u32) -> Self {
        self.mana = mana;
        self
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    /// Hp granted by level alone; the reference for damage caps and revives.
    pub fn level_hp(&self) -> u32 {
        self.level * HP_PER_LEVEL
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Neither fainted nor dead: takes turns and earns rewards.
    pub fn is_active(&self) -> bool {
        !self.fainted && !self.is_dead()
    }

    /// Applies damage; returns true if this blow knocked the hero out.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 && !self.fainted {
            self.fainted = true;
            return true;
        }
        false
    }

    pub fn dodge_chance(&self) -> f64 {
        math::hero_dodge_chance(self.attributes.agility())
    }

    /// Physical weapon contribution, never below 1.
    pub fn weapon_damage(&self) -> u32 {
        math::weapon_damage(self.attributes.strength(), self.equipment.weapon_damage())
    }

    pub fn spell_damage(&self, spell: &Spell) -> u32 {
        math::spell_damage(self.attributes.dexterity(), spell.damage)
    }

    /// Adds rewards and levels up as many times as the experience allows.
    /// Returns each level reached, in order.
    pub fn gain_exp_and_gold(&mut self, exp: u32, gold: u32) -> Vec<u32> {
        self.experience = self.experience.saturating_add(exp);
        self.gold = self.gold.saturating_add(gold);

        let mut reached = Vec::new();
        while self.experience >= self.level * XP_PER_LEVEL {
            self.level_up();
            reached.push(self.level);
        }
        reached
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.hp = self.level * HP_PER_LEVEL;
        self.mana = (self.mana as f64 * LEVEL_UP_MANA_MULTIPLIER) as u32;
        self.attributes.grow_all();
        // Favored stats grow a second time on top of the generic step.
        for attr in self.class.favored_stats() {
            self.attributes.grow(attr);
        }
        info!(hero = %self.name, level = self.level, "hero leveled up");
    }

    /// End-of-round recovery for heroes still standing.
    pub fn regenerate(&mut self) {
        if self.fainted {
            return;
        }
        self.hp = (self.hp as f64 * ROUND_REGEN_MULTIPLIER) as u32;
        self.mana = (self.mana as f64 * ROUND_REGEN_MULTIPLIER) as u32;
    }

    /// Post-battle revive of a fainted hero.
    pub fn revive(&mut self) {
        self.hp = self.level * REVIVE_HP_PER_LEVEL;
        self.mana /= 2;
        self.fainted = false;
    }

    /// Applies the potion's health and mana amounts. Other attributes are inert.
    pub fn apply_potion(&mut self, potion: &Potion) {
        for attr in &potion.attributes {
            match attr {
                PotionAttribute::Health => self.hp = self.hp.saturating_add(potion.amount),
                PotionAttribute::Mana => self.mana = self.mana.saturating_add(potion.amount),
                PotionAttribute::Strength
                | PotionAttribute::Dexterity
                | PotionAttribute::Agility
                | PotionAttribute::Defense => {}
            }
        }
    }

    pub fn short_stats(&self) -> String {
        format!(
            "{} the {} (L{}, HP:{}, MP:{}, Str:{}, Dex:{}, Agi:{}, Gold:{})",
            self.name,
            self.class.name(),
            self.level,
            self.hp,
            self.mana,
            self.attributes.strength(),
            self.attributes.dexterity(),
            self.attributes.agility(),
            self.gold
        )
    }

    pub fn summary(&self) -> String {
        let weapon = self
            .equipment
            .weapon
            .as_ref()
            .map_or("None".to_string(), |w| {
                if self.equipment.using_two_hands {
                    format!("{} (two hands)", w.name)
                } else {
                    w.name.clone()
                }
            });
        let armor = self
            .equipment
            .armor
            .as_ref()
            .map_or("None", |a| a.name.as_str());
        format!(
            "{} Exp:{} Weapon:{} Armor:{} Items:{}",
            self.short_stats(),
            self.experience,
            weapon,
            armor,
            self.inventory.len()
        )
    }
}
