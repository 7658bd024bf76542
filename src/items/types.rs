use crate::core::constants::TWO_HANDED_GRIP_MULTIPLIER;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Weapon,
    Armor,
    Potion,
    Spell,
}

impl ItemKind {
    pub fn name(&self) -> &'static str {
        match self {
            ItemKind::Weapon => "Weapon",
            ItemKind::Armor => "Armor",
            ItemKind::Potion => "Potion",
            ItemKind::Spell => "Spell",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub cost: u32,
    pub required_level: u32,
    pub damage: u32,
    /// Hands the weapon requires (1 or 2).
    pub hands: u8,
}

impl Weapon {
    pub fn is_one_handed(&self) -> bool {
        self.hands == 1
    }

    /// Base damage, boosted when a one-handed weapon is gripped with both hands.
    pub fn effective_damage(&self, using_two_hands: bool) -> u32 {
        if self.is_one_handed() && using_two_hands {
            (self.damage as f64 * TWO_HANDED_GRIP_MULTIPLIER).round() as u32
        } else {
            self.damage
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub cost: u32,
    pub required_level: u32,
    pub damage_reduction: u32,
}

/// Attribute a potion declares it affects.
///
/// Only `Health` and `Mana` change anything; the rest are carried for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotionAttribute {
    Health,
    Mana,
    Strength,
    Dexterity,
    Agility,
    Defense,
}

impl PotionAttribute {
    pub fn is_applied(&self) -> bool {
        matches!(self, PotionAttribute::Health | PotionAttribute::Mana)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potion {
    pub name: String,
    pub cost: u32,
    pub required_level: u32,
    pub amount: u32,
    pub attributes: Vec<PotionAttribute>,
}

impl Potion {
    pub fn restores_health(&self) -> bool {
        self.attributes.contains(&PotionAttribute::Health)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellType {
    Fire,
    Ice,
    Lightning,
}

impl SpellType {
    pub fn name(&self) -> &'static str {
        match self {
            SpellType::Fire => "Fire",
            SpellType::Ice => "Ice",
            SpellType::Lightning => "Lightning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub cost: u32,
    pub required_level: u32,
    pub damage: u32,
    pub mana_cost: u32,
    pub spell_type: SpellType,
}

/// One catalog entry as held in a hero's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Item {
    Weapon(Weapon),
    Armor(Armor),
    Potion(Potion),
    Spell(Spell),
}

impl Item {
    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Weapon(_) => ItemKind::Weapon,
            Item::Armor(_) => ItemKind::Armor,
            Item::Potion(_) => ItemKind::Potion,
            Item::Spell(_) => ItemKind::Spell,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Weapon(w) => &w.name,
            Item::Armor(a) => &a.name,
            Item::Potion(p) => &p.name,
            Item::Spell(s) => &s.name,
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            Item::Weapon(w) => w.cost,
            Item::Armor(a) => a.cost,
            Item::Potion(p) => p.cost,
            Item::Spell(s) => s.cost,
        }
    }

    pub fn required_level(&self) -> u32 {
        match self {
            Item::Weapon(w) => w.required_level,
            Item::Armor(a) => a.required_level,
            Item::Potion(p) => p.required_level,
            Item::Spell(s) => s.required_level,
        }
    }

    /// One-line summary used by menus.
    pub fn describe(&self) -> String {
        match self {
            Item::Weapon(w) => format!(
                "{} (L{}, cost:{}, dmg:{}, hands:{})",
                w.name, w.required_level, w.cost, w.damage, w.hands
            ),
            Item::Armor(a) => format!(
                "{} (L{}, cost:{}, reduction:{})",
                a.name, a.required_level, a.cost, a.damage_reduction
            ),
            Item::Potion(p) => {
                let attrs: Vec<String> = p.attributes.iter().map(|a| format!("{:?}", a)).collect();
                format!(
                    "{} (L{}, cost:{}, +{} to {})",
                    p.name,
                    p.required_level,
                    p.cost,
                    p.amount,
                    attrs.join("/")
                )
            }
            Item::Spell(s) => format!(
                "{} ({}, L{}, cost:{}, dmg:{}, MP:{})",
                s.name,
                s.spell_type.name(),
                s.required_level,
                s.cost,
                s.damage,
                s.mana_cost
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dagger() -> Weapon {
        Weapon {
            name: "Dagger".to_string(),
            cost: 200,
            required_level: 1,
            damage: 250,
            hands: 1,
        }
    }

    #[test]
    fn test_two_handed_grip_boosts_one_handed_weapon() {
        let w = dagger();
        assert_eq!(w.effective_damage(false), 250);
        assert_eq!(w.effective_damage(true), 375);
    }

    #[test]
    fn test_two_handed_grip_ignored_for_two_handed_weapon() {
        let bow = Weapon {
            hands: 2,
            damage: 500,
            ..dagger()
        };
        assert_eq!(bow.effective_damage(true), 500);
    }

    #[test]
    fn test_item_accessors() {
        let item = Item::Spell(Spell {
            name: "Heat_Wave".to_string(),
            cost: 450,
            required_level: 2,
            damage: 600,
            mana_cost: 150,
            spell_type: SpellType::Fire,
        });
        assert_eq!(item.kind(), ItemKind::Spell);
        assert_eq!(item.name(), "Heat_Wave");
        assert_eq!(item.cost(), 450);
        assert_eq!(item.required_level(), 2);
        assert!(item.describe().contains("Fire"));
    }

    #[test]
    fn test_potion_attribute_application() {
        assert!(PotionAttribute::Health.is_applied());
        assert!(PotionAttribute::Mana.is_applied());
        assert!(!PotionAttribute::Strength.is_applied());
        assert!(!PotionAttribute::Defense.is_applied());
    }

    #[test]
    fn test_item_serde_tagging() {
        let item = Item::Weapon(dagger());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"kind\":\"Weapon\""));
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
