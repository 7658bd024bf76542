use super::types::{Armor, Item, ItemKind, Potion, Spell, Weapon};
use crate::core::error::{GameError, TargetKind};
use serde::{Deserialize, Serialize};

/// Gear a hero currently wields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<Weapon>,
    pub armor: Option<Armor>,
    /// Only meaningful for a one-handed weapon.
    pub using_two_hands: bool,
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switching weapons always drops back to a one-handed grip.
    pub fn equip_weapon(&mut self, weapon: Weapon) {
        self.weapon = Some(weapon);
        self.using_two_hands = false;
    }

    pub fn equip_armor(&mut self, armor: Armor) {
        self.armor = Some(armor);
    }

    /// Sets the grip on the equipped weapon. Requires a one-handed weapon.
    pub fn set_two_handed_grip(&mut self, two_hands: bool) -> Result<(), GameError> {
        match &self.weapon {
            Some(w) if w.is_one_handed() => {
                self.using_two_hands = two_hands;
                Ok(())
            }
            _ => Err(GameError::NoValidTarget(TargetKind::Weapon)),
        }
    }

    /// Weapon damage after grip bonus, 0 when unarmed.
    pub fn weapon_damage(&self) -> u32 {
        self.weapon
            .as_ref()
            .map_or(0, |w| w.effective_damage(self.using_two_hands))
    }

    pub fn damage_reduction(&self) -> u32 {
        self.armor.as_ref().map_or(0, |a| a.damage_reduction)
    }
}

/// Inventory positions holding items of `kind`, in inventory order.
pub fn indices_of(inventory: &[Item], kind: ItemKind) -> Vec<usize> {
    inventory
        .iter()
        .enumerate()
        .filter(|(_, item)| item.kind() == kind)
        .map(|(i, _)| i)
        .collect()
}

pub fn weapons(inventory: &[Item]) -> Vec<(usize, &Weapon)> {
    inventory
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Weapon(w) => Some((i, w)),
            _ => None,
        })
        .collect()
}

pub fn armors(inventory: &[Item]) -> Vec<(usize, &Armor)> {
    inventory
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Armor(a) => Some((i, a)),
            _ => None,
        })
        .collect()
}

pub fn potions(inventory: &[Item]) -> Vec<(usize, &Potion)> {
    inventory
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Potion(p) => Some((i, p)),
            _ => None,
        })
        .collect()
}

pub fn spells(inventory: &[Item]) -> Vec<(usize, &Spell)> {
    inventory
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Item::Spell(s) => Some((i, s)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::types::{PotionAttribute, SpellType};
    use super::*;

    fn sword() -> Weapon {
        Weapon {
            name: "Sword".to_string(),
            cost: 500,
            required_level: 1,
            damage: 800,
            hands: 1,
        }
    }

    fn scythe() -> Weapon {
        Weapon {
            name: "Scythe".to_string(),
            cost: 1000,
            required_level: 6,
            damage: 1100,
            hands: 2,
        }
    }

    fn mixed_inventory() -> Vec<Item> {
        vec![
            Item::Potion(Potion {
                name: "Healing_Potion".to_string(),
                cost: 250,
                required_level: 1,
                amount: 100,
                attributes: vec![PotionAttribute::Health],
            }),
            Item::Weapon(sword()),
            Item::Spell(Spell {
                name: "Ice_Blade".to_string(),
                cost: 250,
                required_level: 1,
                damage: 450,
                mana_cost: 100,
                spell_type: SpellType::Ice,
            }),
            Item::Weapon(scythe()),
        ]
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert!(eq.weapon.is_none());
        assert!(eq.armor.is_none());
        assert!(!eq.using_two_hands);
        assert_eq!(eq.weapon_damage(), 0);
        assert_eq!(eq.damage_reduction(), 0);
    }

    #[test]
    fn test_equip_weapon_resets_grip() {
        let mut eq = Equipment::new();
        eq.equip_weapon(sword());
        eq.set_two_handed_grip(true).unwrap();
        assert_eq!(eq.weapon_damage(), 1200);

        eq.equip_weapon(sword());
        assert!(!eq.using_two_hands);
        assert_eq!(eq.weapon_damage(), 800);
    }

    #[test]
    fn test_equipping_same_weapon_twice_is_idempotent() {
        let mut eq = Equipment::new();
        eq.equip_weapon(sword());
        let first = (eq.using_two_hands, eq.weapon_damage());
        eq.equip_weapon(sword());
        assert_eq!((eq.using_two_hands, eq.weapon_damage()), first);
    }

    #[test]
    fn test_two_handed_grip_rejected_without_one_handed_weapon() {
        let mut eq = Equipment::new();
        assert_eq!(
            eq.set_two_handed_grip(true),
            Err(GameError::NoValidTarget(TargetKind::Weapon))
        );
        eq.equip_weapon(scythe());
        assert!(eq.set_two_handed_grip(true).is_err());
        assert!(!eq.using_two_hands);
    }

    #[test]
    fn test_inventory_queries_preserve_order() {
        let inv = mixed_inventory();
        assert_eq!(indices_of(&inv, ItemKind::Weapon), vec![1, 3]);
        assert_eq!(indices_of(&inv, ItemKind::Armor), Vec::<usize>::new());

        let ws = weapons(&inv);
        assert_eq!(ws.len(), 2);
        assert_eq!(ws[0].1.name, "Sword");
        assert_eq!(ws[1].1.name, "Scythe");

        assert_eq!(spells(&inv)[0].0, 2);
        assert_eq!(potions(&inv)[0].1.amount, 100);
        assert!(armors(&inv).is_empty());
    }
}
