//! Pure combat formulas shared by the battle resolver and the simulator.
//!
//! Nothing here touches battle state; random draws are passed in so callers
//! control the stream.

use crate::core::constants::*;
use crate::items::SpellType;
use rand::Rng;

/// Hero dodge probability: `agility * 0.002`, capped at 30%.
pub fn hero_dodge_chance(agility: u32) -> f64 {
    (agility as f64 * HERO_DODGE_PER_AGILITY).min(MAX_DODGE_CHANCE)
}

/// Monster dodge probability from its stored percent, capped at 30%.
pub fn monster_dodge_chance(dodge_percent: u32) -> f64 {
    (dodge_percent as f64 / 100.0).clamp(0.0, MAX_DODGE_CHANCE)
}

/// Rolls a uniform [0, 1) draw against `chance`.
pub fn roll_dodge(chance: f64, rng: &mut impl Rng) -> bool {
    rng.gen::<f64>() < chance
}

/// `round((strength + weapon) * 0.05)`, at least 1.
pub fn weapon_damage(strength: u32, effective_weapon_damage: u32) -> u32 {
    let raw = (strength as f64 + effective_weapon_damage as f64) * WEAPON_DAMAGE_SCALE;
    (raw.round() as u32).max(1)
}

/// Base physical damage before the target's defense is considered.
pub fn attack_base(weapon_damage: u32, level: u32) -> u32 {
    let base = weapon_damage + ATTACK_DAMAGE_PER_LEVEL * level;
    if base == 0 {
        ATTACK_FALLBACK_BASE + ATTACK_DAMAGE_PER_LEVEL * level
    } else {
        base
    }
}

/// Proportional defense: `round(base * 100 / (100 + defense))`, at least 5.
pub fn physical_damage(base: u32, defense: u32) -> u32 {
    let factor = DEFENSE_SCALE / (DEFENSE_SCALE + defense as f64);
    let effective = (base as f64 * factor).round() as u32;
    effective.max(MIN_ATTACK_DAMAGE)
}

/// `damage + round(dexterity / 10000 * damage)`.
pub fn spell_damage(dexterity: u32, spell_damage: u32) -> u32 {
    let bonus = (dexterity as f64 / SPELL_DEXTERITY_DIVISOR * spell_damage as f64).round() as u32;
    spell_damage + bonus
}

pub fn spell_base(spell_damage: u32, level: u32) -> u32 {
    if spell_damage == 0 {
        SPELL_FALLBACK_BASE + SPELL_FALLBACK_PER_LEVEL * level
    } else {
        spell_damage
    }
}

/// Additive defense for spells: `max(1, base - defense)`.
pub fn magical_damage(base: u32, defense: u32) -> u32 {
    base.saturating_sub(defense).max(MIN_SPELL_DAMAGE)
}

/// Monster hit against armor; zero means the blow is fully absorbed.
pub fn armor_absorbed(base_damage: u32, damage_reduction: u32) -> u32 {
    base_damage.saturating_sub(damage_reduction)
}

/// Scales a connecting monster blow: 10-20% of `effective`, capped at a fifth
/// of the hero's level hp, never below 2.
pub fn scale_monster_damage(effective: u32, hero_level: u32, factor: f64) -> u32 {
    let scaled = (effective as f64 * factor).round() as u32;
    let cap = (hero_level * HP_PER_LEVEL / MONSTER_DAMAGE_CAP_DIVISOR).max(1);
    scaled.min(cap).max(MIN_MONSTER_DAMAGE)
}

/// Draws the monster damage factor from [0.10, 0.20).
pub fn roll_monster_damage_factor(rng: &mut impl Rng) -> f64 {
    MONSTER_DAMAGE_FACTOR_MIN + rng.gen::<f64>() * MONSTER_DAMAGE_FACTOR_SPAN
}

/// Stat changes a landed spell leaves on its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Debuff {
    Defense { from: u32, to: u32 },
    Damage { from: u32, to: u32 },
    Dodge { from: u32, to: u32 },
}

impl Debuff {
    pub fn spell_type(&self) -> SpellType {
        match self {
            Debuff::Defense { .. } => SpellType::Fire,
            Debuff::Damage { .. } => SpellType::Ice,
            Debuff::Dodge { .. } => SpellType::Lightning,
        }
    }
}

/// `value * 0.9`, truncated.
pub fn weaken(value: u32, multiplier: f64) -> u32 {
    (value as f64 * multiplier) as u32
}

/// Lightning: lose 10% of the current dodge percent, rounded, kept in [0, 100].
pub fn reduce_dodge_percent(dodge_percent: u32) -> u32 {
    let reduced = (dodge_percent as f64 * (1.0 - LIGHTNING_DODGE_REDUCTION)).round() as u32;
    reduced.min(MONSTER_DODGE_PERCENT_MAX)
}

/// Gold pool for a won battle: `max_level * 100 * monster_count`.
pub fn victory_gold(max_monster_level: u32, monster_count: u32) -> u32 {
    max_monster_level * GOLD_PER_MONSTER_LEVEL * monster_count
}

pub fn victory_exp(monster_count: u32) -> u32 {
    monster_count * XP_PER_MONSTER
}
