//! Structured events the core emits for presentation.

use super::error::GameError;
use crate::character::Hero;
use crate::combat::math::Debuff;
use crate::map::{Position, TileType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroStatus {
    pub name: String,
    pub hp: u32,
    /// Hp granted by level alone, for "below 30%" style checks.
    pub level_hp: u32,
    pub mana: u32,
    pub fainted: bool,
}

impl HeroStatus {
    pub fn of(hero: &Hero) -> Self {
        Self {
            name: hero.name.clone(),
            hp: hero.hp,
            level_hp: hero.level_hp(),
            mana: hero.mana,
            fainted: hero.fainted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterStatus {
    pub name: String,
    pub hp: u32,
    pub base_damage: u32,
    pub defense: u32,
}

/// What kind of blow was dodged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeKind {
    Attack,
    Spell,
    MonsterAttack,
}

/// Hero actions that can be cancelled back to the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Attack,
    CastSpell,
    UsePotion,
    EquipGear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    OffMap,
    Inaccessible,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    // Battle flow
    BattleStarted {
        heroes: Vec<String>,
        monsters: Vec<String>,
    },
    RoundStarted {
        round: u32,
        heroes: Vec<HeroStatus>,
        monsters: Vec<MonsterStatus>,
    },
    TurnStarted {
        hero: String,
    },
    TurnSkipped {
        hero: String,
    },
    AutoTargeted {
        monster: String,
    },
    ActionCancelled {
        hero: String,
        action: ActionKind,
    },
    /// A recoverable error; the loop that raised it carries on.
    ActionRejected {
        error: GameError,
    },

    // Resolution
    AttackLanded {
        hero: String,
        monster: String,
        damage: u32,
    },
    SpellLanded {
        hero: String,
        spell: String,
        monster: String,
        damage: u32,
        debuff: Debuff,
    },
    Dodged {
        attacker: String,
        defender: String,
        kind: StrikeKind,
    },
    MonsterAttacked {
        monster: String,
        hero: String,
        damage: u32,
    },
    AttackAbsorbed {
        monster: String,
        hero: String,
    },
    MonsterSlain {
        monster: String,
    },
    HeroFainted {
        hero: String,
    },
    PotionUsed {
        hero: String,
        potion: String,
    },
    Equipped {
        hero: String,
        item: String,
    },
    GripChanged {
        hero: String,
        two_hands: bool,
    },
    RoundEnded {
        round: u32,
    },

    // Outcome
    Victory {
        rounds: u32,
    },
    Defeat {
        rounds: u32,
    },
    /// The decision source ran dry; the party gives up the fight.
    PartyYielded {
        round: u32,
    },
    RewardGranted {
        hero: String,
        exp: u32,
        gold: u32,
    },
    LevelUp {
        hero: String,
        level: u32,
    },
    HeroRevived {
        hero: String,
        hp: u32,
    },

    // Exploration
    MoveBlocked {
        reason: BlockReason,
    },
    TileEntered {
        position: Position,
        tile: TileType,
    },
    MarketReached,
    EncounterTriggered {
        monsters: Vec<String>,
    },
    ItemBought {
        hero: String,
        item: String,
        gold_left: u32,
    },
    ItemSold {
        hero: String,
        item: String,
        price: u32,
    },
}

impl GameEvent {
    /// Good news for the party; front ends may color these differently.
    pub fn is_favorable(&self) -> bool {
        matches!(
            self,
            GameEvent::AttackLanded { .. }
                | GameEvent::SpellLanded { .. }
                | GameEvent::MonsterSlain { .. }
                | GameEvent::Victory { .. }
                | GameEvent::RewardGranted { .. }
                | GameEvent::LevelUp { .. }
                | GameEvent::PotionUsed { .. }
                | GameEvent::Equipped { .. }
                | GameEvent::AttackAbsorbed { .. }
                | GameEvent::ItemBought { .. }
                | GameEvent::ItemSold { .. }
        ) || matches!(
            self,
            GameEvent::Dodged {
                kind: StrikeKind::MonsterAttack,
                ..
            }
        )
    }

    pub fn is_unfavorable(&self) -> bool {
        matches!(
            self,
            GameEvent::MonsterAttacked { .. }
                | GameEvent::HeroFainted { .. }
                | GameEvent::Defeat { .. }
                | GameEvent::PartyYielded { .. }
                | GameEvent::ActionRejected { .. }
                | GameEvent::ActionCancelled { .. }
                | GameEvent::HeroRevived { .. }
                | GameEvent::MoveBlocked { .. }
        ) || matches!(
            self,
            GameEvent::Dodged {
                kind: StrikeKind::Attack | StrikeKind::Spell,
                ..
            }
        )
    }
}

/// Presentation sink. The core never knows how events are displayed.
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_collects_events() {
        let mut sink: Vec<GameEvent> = Vec::new();
        sink.emit(GameEvent::MarketReached);
        sink.emit(GameEvent::Victory { rounds: 2 });
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[1], GameEvent::Victory { rounds: 2 });
    }

    #[test]
    fn test_dodge_favorability_depends_on_side() {
        let hero_dodged = GameEvent::Dodged {
            attacker: "Wolf".into(),
            defender: "Gaerdal".into(),
            kind: StrikeKind::MonsterAttack,
        };
        let monster_dodged = GameEvent::Dodged {
            attacker: "Gaerdal".into(),
            defender: "Wolf".into(),
            kind: StrikeKind::Attack,
        };
        assert!(hero_dodged.is_favorable());
        assert!(!hero_dodged.is_unfavorable());
        assert!(monster_dodged.is_unfavorable());
        assert!(!monster_dodged.is_favorable());
    }
}
