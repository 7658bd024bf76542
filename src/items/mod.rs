//! Item system: types, equipment and the market.

pub mod equipment;
pub mod market;
pub mod types;

pub use equipment::Equipment;
pub use market::{buy, sell, sell_price};
pub use types::{Armor, Item, ItemKind, Potion, PotionAttribute, Spell, SpellType, Weapon};
