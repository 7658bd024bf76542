// Living entities
pub const HP_PER_LEVEL: u32 = 100;
pub const REVIVE_HP_PER_LEVEL: u32 = 50;

// Leveling
pub const XP_PER_LEVEL: u32 = 10;
pub const LEVEL_UP_MANA_MULTIPLIER: f64 = 1.1;
pub const LEVEL_UP_STAT_MULTIPLIER: f64 = 1.05;

// Dodge
pub const MAX_DODGE_CHANCE: f64 = 0.30;
pub const HERO_DODGE_PER_AGILITY: f64 = 0.002;
pub const MONSTER_DODGE_PERCENT_MAX: u32 = 100;

// Hero physical attacks
pub const WEAPON_DAMAGE_SCALE: f64 = 0.05;
pub const TWO_HANDED_GRIP_MULTIPLIER: f64 = 1.5;
pub const ATTACK_DAMAGE_PER_LEVEL: u32 = 5;
pub const ATTACK_FALLBACK_BASE: u32 = 15;
pub const MIN_ATTACK_DAMAGE: u32 = 5;
pub const DEFENSE_SCALE: f64 = 100.0;

// Spells
pub const SPELL_DEXTERITY_DIVISOR: f64 = 10_000.0;
pub const SPELL_FALLBACK_BASE: u32 = 10;
pub const SPELL_FALLBACK_PER_LEVEL: u32 = 3;
pub const MIN_SPELL_DAMAGE: u32 = 1;
pub const FIRE_DEFENSE_MULTIPLIER: f64 = 0.9;
pub const ICE_DAMAGE_MULTIPLIER: f64 = 0.9;
pub const LIGHTNING_DODGE_REDUCTION: f64 = 0.10;

// Monster attacks
pub const MONSTER_DAMAGE_FACTOR_MIN: f64 = 0.10;
pub const MONSTER_DAMAGE_FACTOR_SPAN: f64 = 0.10;
pub const MONSTER_DAMAGE_CAP_DIVISOR: u32 = 5;
pub const MIN_MONSTER_DAMAGE: u32 = 2;

// End of round
pub const ROUND_REGEN_MULTIPLIER: f64 = 1.1;

// Rewards
pub const XP_PER_MONSTER: u32 = 2;
pub const GOLD_PER_MONSTER_LEVEL: u32 = 100;

// Map generation: 15% inaccessible, 10% market, 75% common
pub const INACCESSIBLE_TILE_CHANCE: f64 = 0.15;
pub const MARKET_TILE_CHANCE: f64 = 0.10;
pub const MIN_MAP_SIZE: usize = 5;
pub const MAX_MAP_SIZE: usize = 15;
pub const MAP_DIMENSION_LIMIT: usize = 64;
pub const DEFAULT_MAP_SIZE: usize = 8;
pub const DEFAULT_MAP_MAX_ATTEMPTS: u32 = 1000;

// Exploration
pub const ENCOUNTER_CHANCE: f64 = 0.30;
pub const MAX_PARTY_SIZE: usize = 3;

// Market
pub const SELL_PRICE_DIVISOR: u32 = 2;
