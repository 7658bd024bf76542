//! Post-battle rewards and revives.

use super::math;
use super::types::Monster;
use crate::character::Hero;
use crate::core::events::{EventSink, GameEvent};
use serde::Serialize;
use tracing::info;

/// What a won battle paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VictoryRewards {
    pub exp_per_hero: u32,
    pub total_gold: u32,
    /// Integer share of `total_gold`; 0 when no hero was active.
    pub gold_per_hero: u32,
    pub active_heroes: usize,
}

/// Computes rewards for a won battle without touching the party.
pub fn compute_rewards(heroes: &[Hero], monsters: &[Monster]) -> VictoryRewards {
    let count = monsters.len() as u32;
    let max_level = monsters.iter().map(|m| m.level).max().unwrap_or(1);
    let total_gold = math::victory_gold(max_level, count);
    let active_heroes = heroes.iter().filter(|h| h.is_active()).count();
    let gold_per_hero = if active_heroes == 0 {
        0
    } else {
        total_gold / active_heroes as u32
    };

    VictoryRewards {
        exp_per_hero: math::victory_exp(count),
        total_gold,
        gold_per_hero,
        active_heroes,
    }
}

/// Revives fainted heroes with nothing, pays everyone else.
pub fn apply_victory(
    heroes: &mut [Hero],
    monsters: &[Monster],
    sink: &mut dyn EventSink,
) -> VictoryRewards {
    let rewards = compute_rewards(heroes, monsters);

    for hero in heroes.iter_mut() {
        if hero.fainted {
            hero.revive();
            sink.emit(GameEvent::HeroRevived {
                hero: hero.name.clone(),
                hp: hero.hp,
            });
            continue;
        }
        if !hero.is_active() {
            continue;
        }

        let levels = hero.gain_exp_and_gold(rewards.exp_per_hero, rewards.gold_per_hero);
        sink.emit(GameEvent::RewardGranted {
            hero: hero.name.clone(),
            exp: rewards.exp_per_hero,
            gold: rewards.gold_per_hero,
        });
        for level in levels {
            sink.emit(GameEvent::LevelUp {
                hero: hero.name.clone(),
                level,
            });
        }
    }

    info!(
        exp = rewards.exp_per_hero,
        gold = rewards.total_gold,
        active = rewards.active_heroes,
        "victory rewards paid"
    );
    rewards
}
