//! Scripted decision maker for simulated battles.

use crate::core::decisions::{ChoiceKind, ChoiceRequest, DecisionSource};
use crate::core::events::HeroStatus;

const ATTACK: i64 = 1;
const USE_POTION: i64 = 3;
const FIRST_OPTION: i64 = 1;
const CANCEL: i64 = 0;

/// Attacks the first target; drinks the first potion when a hero drops
/// below 30% of its level hp.
#[derive(Debug, Clone, Default)]
pub struct AutoPilot {
    /// Set after asking for a potion; a repeated action menu means none was
    /// available.
    potion_requested: bool,
}

impl AutoPilot {
    pub fn new() -> Self {
        Self::default()
    }

    fn needs_healing(actor: &HeroStatus) -> bool {
        (actor.hp as u64) * 10 < (actor.level_hp as u64) * 3
    }
}

impl DecisionSource for AutoPilot {
    fn ask_choice(&mut self, request: &ChoiceRequest) -> i64 {
        match request.kind {
            ChoiceKind::Action => {
                let low = request.actor.as_ref().is_some_and(Self::needs_healing);
                if low && !self.potion_requested {
                    self.potion_requested = true;
                    USE_POTION
                } else {
                    self.potion_requested = false;
                    ATTACK
                }
            }
            ChoiceKind::Potion => {
                self.potion_requested = false;
                FIRST_OPTION
            }
            ChoiceKind::Target => FIRST_OPTION,
            ChoiceKind::Spell | ChoiceKind::GearMenu | ChoiceKind::Weapon | ChoiceKind::Armor => {
                CANCEL
            }
        }
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        false
    }
}
