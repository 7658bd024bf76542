//! Market trades. Buying checks level before gold; selling pays half cost.

use super::types::Item;
use crate::character::Hero;
use crate::core::constants::SELL_PRICE_DIVISOR;
use crate::core::error::{GameError, Resource};
use tracing::debug;

pub fn sell_price(item: &Item) -> u32 {
    item.cost() / SELL_PRICE_DIVISOR
}

/// Buys a copy of `item` for `hero`. Returns the gold left.
pub fn buy(hero: &mut Hero, item: &Item) -> Result<u32, GameError> {
    if hero.level < item.required_level() {
        return Err(GameError::InsufficientResource {
            resource: Resource::Level,
            needed: item.required_level(),
            available: hero.level,
        });
    }
    if hero.gold < item.cost() {
        return Err(GameError::InsufficientResource {
            resource: Resource::Gold,
            needed: item.cost(),
            available: hero.gold,
        });
    }

    hero.gold -= item.cost();
    hero.inventory.push(item.clone());
    debug!(hero = %hero.name, item = item.name(), gold_left = hero.gold, "item bought");
    Ok(hero.gold)
}

/// Sells the inventory item at zero-based `index`. Returns it with its price.
pub fn sell(hero: &mut Hero, index: usize) -> Result<(Item, u32), GameError> {
    if index >= hero.inventory.len() {
        return Err(GameError::InvalidSelection {
            choice: index as i64 + 1,
            max: hero.inventory.len(),
        });
    }

    let item = hero.inventory.remove(index);
    let price = sell_price(&item);
    hero.gold = hero.gold.saturating_add(price);
    debug!(hero = %hero.name, item = item.name(), price, "item sold");
    Ok((item, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, HeroClass};
    use crate::items::{Armor, Weapon};

    fn sword() -> Item {
        Item::Weapon(Weapon {
            name: "Sword".to_string(),
            cost: 500,
            required_level: 1,
            damage: 800,
            hands: 1,
        })
    }

    fn shield() -> Item {
        Item::Armor(Armor {
            name: "Wizard_Shield".to_string(),
            cost: 1200,
            required_level: 10,
            damage_reduction: 1500,
        })
    }

    fn buyer(gold: u32) -> Hero {
        Hero::new("Buyer", HeroClass::Warrior, 1, Attributes::default()).with_gold(gold)
    }

    #[test]
    fn test_buy_deducts_gold() {
        let mut hero = buyer(1354);
        assert_eq!(buy(&mut hero, &sword()), Ok(854));
        assert_eq!(hero.inventory, vec![sword()]);
    }

    #[test]
    fn test_buy_checks_level_before_gold() {
        let mut hero = buyer(0);
        assert_eq!(
            buy(&mut hero, &shield()),
            Err(GameError::InsufficientResource {
                resource: Resource::Level,
                needed: 10,
                available: 1,
            })
        );
    }

    #[test]
    fn test_buy_insufficient_gold() {
        let mut hero = buyer(499);
        assert_eq!(
            buy(&mut hero, &sword()),
            Err(GameError::InsufficientResource {
                resource: Resource::Gold,
                needed: 500,
                available: 499,
            })
        );
        assert!(hero.inventory.is_empty());
        assert_eq!(hero.gold, 499);
    }

    #[test]
    fn test_sell_pays_half() {
        let mut hero = buyer(0).with_item(sword());
        let (item, price) = sell(&mut hero, 0).unwrap();
        assert_eq!(item, sword());
        assert_eq!(price, 250);
        assert_eq!(hero.gold, 250);
        assert!(hero.inventory.is_empty());
    }

    #[test]
    fn test_sell_bad_index() {
        let mut hero = buyer(0);
        assert_eq!(
            sell(&mut hero, 0),
            Err(GameError::InvalidSelection { choice: 1, max: 0 })
        );
    }
}
