//! Battle resolution: formulas, monsters, the turn loop and rewards.

pub mod logic;
pub mod math;
pub mod rewards;
pub mod types;

pub use logic::{apply_debuff, resolve_battle, Battle, BattleOutcome, BattlePhase, BattleReport};
pub use math::Debuff;
pub use rewards::{apply_victory, compute_rewards, VictoryRewards};
pub use types::{Monster, MonsterSpecies, MonsterTemplate};
