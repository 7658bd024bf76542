//! Turn-based battle resolution.
//!
//! A battle is a small state machine:
//! `RoundStart -> HeroPhase -> CheckVictory -> MonsterPhase -> CheckDefeat ->
//! EndOfRoundRegen -> RoundStart`, ending in `HeroesWon` or `HeroesDefeated`.
//! Every input-dependent point asks the injected [`DecisionSource`]; every
//! observable effect goes to the [`EventSink`].

use super::math::{self, Debuff};
use super::rewards::{apply_victory, VictoryRewards};
use super::types::Monster;
use crate::character::Hero;
use crate::core::constants::{FIRE_DEFENSE_MULTIPLIER, ICE_DAMAGE_MULTIPLIER};
use crate::core::decisions::{ChoiceKind, ChoiceRequest, DecisionSource, Selection};
use crate::core::error::{GameError, Resource, TargetKind};
use crate::core::events::{
    ActionKind, EventSink, GameEvent, HeroStatus, MonsterStatus, StrikeKind,
};
use crate::items::{equipment, SpellType};
use rand::Rng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    RoundStart,
    HeroPhase,
    CheckVictory,
    MonsterPhase,
    CheckDefeat,
    EndOfRoundRegen,
    HeroesWon,
    HeroesDefeated,
}

impl BattlePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattlePhase::HeroesWon | BattlePhase::HeroesDefeated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    HeroesWon,
    HeroesDefeated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub rounds: u32,
    /// Present only when the heroes won.
    pub rewards: Option<VictoryRewards>,
}

/// Entries of the hero action menu; 0 is Skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeroAction {
    Attack,
    CastSpell,
    UsePotion,
    EquipGear,
}

const HERO_ACTIONS: [HeroAction; 4] = [
    HeroAction::Attack,
    HeroAction::CastSpell,
    HeroAction::UsePotion,
    HeroAction::EquipGear,
];

impl HeroAction {
    fn label(&self) -> &'static str {
        match self {
            HeroAction::Attack => "Attack",
            HeroAction::CastSpell => "Cast Spell",
            HeroAction::UsePotion => "Use Potion",
            HeroAction::EquipGear => "Equip Gear",
        }
    }
}

/// Runs one battle. The party and roster are borrowed for its duration.
pub struct Battle<'a, R: Rng> {
    heroes: &'a mut [Hero],
    monsters: &'a mut [Monster],
    rng: &'a mut R,
    decisions: &'a mut dyn DecisionSource,
    sink: &'a mut dyn EventSink,
    phase: BattlePhase,
    round: u32,
    rewards: Option<VictoryRewards>,
}

impl<'a, R: Rng> Battle<'a, R> {
    pub fn new(
        heroes: &'a mut [Hero],
        monsters: &'a mut [Monster],
        rng: &'a mut R,
        decisions: &'a mut dyn DecisionSource,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        Self {
            heroes,
            monsters,
            rng,
            decisions,
            sink,
            phase: BattlePhase::RoundStart,
            round: 0,
            rewards: None,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Fights to the end and reports the outcome.
    pub fn run(mut self) -> BattleReport {
        self.sink.emit(GameEvent::BattleStarted {
            heroes: self.heroes.iter().map(|h| h.name.clone()).collect(),
            monsters: self.monsters.iter().map(|m| m.name.clone()).collect(),
        });
        info!(
            heroes = self.heroes.len(),
            monsters = self.monsters.len(),
            "battle started"
        );

        while !self.phase.is_terminal() {
            self.step();
        }

        let outcome = match self.phase {
            BattlePhase::HeroesWon => BattleOutcome::HeroesWon,
            _ => BattleOutcome::HeroesDefeated,
        };
        info!(?outcome, rounds = self.round, "battle finished");

        BattleReport {
            outcome,
            rounds: self.round,
            rewards: self.rewards.take(),
        }
    }

    /// Performs one state transition and returns the new phase.
    pub fn step(&mut self) -> BattlePhase {
        self.phase = match self.phase {
            BattlePhase::RoundStart => {
                if self.all_heroes_fainted() {
                    self.finish_defeat()
                } else if self.all_monsters_dead() {
                    self.finish_victory()
                } else if self.decisions.is_exhausted() {
                    self.yield_fight()
                } else {
                    self.round += 1;
                    debug!(round = self.round, "round started");
                    self.emit_round_status();
                    BattlePhase::HeroPhase
                }
            }
            BattlePhase::HeroPhase => {
                self.hero_phase();
                BattlePhase::CheckVictory
            }
            BattlePhase::CheckVictory => {
                if self.all_monsters_dead() {
                    self.finish_victory()
                } else {
                    BattlePhase::MonsterPhase
                }
            }
            BattlePhase::MonsterPhase => {
                self.monster_phase();
                BattlePhase::CheckDefeat
            }
            BattlePhase::CheckDefeat => {
                if self.all_heroes_fainted() {
                    self.finish_defeat()
                } else {
                    BattlePhase::EndOfRoundRegen
                }
            }
            BattlePhase::EndOfRoundRegen => {
                for hero in self.heroes.iter_mut() {
                    hero.regenerate();
                }
                self.sink.emit(GameEvent::RoundEnded { round: self.round });
                BattlePhase::RoundStart
            }
            terminal => terminal,
        };
        self.phase
    }

    fn all_heroes_fainted(&self) -> bool {
        self.heroes.iter().all(|h| h.fainted)
    }

    fn all_monsters_dead(&self) -> bool {
        self.monsters.iter().all(|m| m.is_dead())
    }

    fn finish_victory(&mut self) -> BattlePhase {
        self.sink.emit(GameEvent::Victory { rounds: self.round });
        self.rewards = Some(apply_victory(self.heroes, self.monsters, self.sink));
        BattlePhase::HeroesWon
    }

    fn finish_defeat(&mut self) -> BattlePhase {
        self.sink.emit(GameEvent::Defeat { rounds: self.round });
        BattlePhase::HeroesDefeated
    }

    /// No more orders will come: every standing hero drops and the battle is lost.
    fn yield_fight(&mut self) -> BattlePhase {
        warn!(round = self.round, "decision source exhausted, party yields");
        self.sink.emit(GameEvent::PartyYielded { round: self.round });
        for hero in self.heroes.iter_mut() {
            let hp = hero.hp;
            if hero.take_damage(hp) {
                self.sink.emit(GameEvent::HeroFainted {
                    hero: hero.name.clone(),
                });
            }
        }
        self.finish_defeat()
    }

    fn emit_round_status(&mut self) {
        let heroes = self.heroes.iter().map(HeroStatus::of).collect();
        let monsters = self
            .monsters
            .iter()
            .map(|m| MonsterStatus {
                name: m.name.clone(),
                hp: m.hp,
                base_damage: m.base_damage,
                defense: m.defense,
            })
            .collect();
        self.sink.emit(GameEvent::RoundStarted {
            round: self.round,
            heroes,
            monsters,
        });
    }

    fn reject(&mut self, error: GameError) {
        debug!(%error, "action rejected");
        self.sink.emit(GameEvent::ActionRejected { error });
    }

    fn cancelled(&mut self, hero: usize, action: ActionKind) {
        self.sink.emit(GameEvent::ActionCancelled {
            hero: self.heroes[hero].name.clone(),
            action,
        });
    }

    // ---------------------------------------------------------------------
    // Hero phase
    // ---------------------------------------------------------------------

    fn hero_phase(&mut self) {
        for i in 0..self.heroes.len() {
            if self.all_monsters_dead() {
                break;
            }
            let hero = &self.heroes[i];
            if hero.fainted || hero.is_dead() {
                continue;
            }
            self.hero_turn(i);
        }
    }

    /// Offers the action menu until a turn-consuming action succeeds.
    fn hero_turn(&mut self, hero: usize) {
        let name = self.heroes[hero].name.clone();
        self.sink.emit(GameEvent::TurnStarted { hero: name.clone() });

        let request = ChoiceRequest::new(
            ChoiceKind::Action,
            format!("Action for {}", name),
            HERO_ACTIONS.iter().map(|a| a.label().to_string()).collect(),
        )
        .for_actor(HeroStatus::of(&self.heroes[hero]));

        loop {
            let answer = self.decisions.ask_choice(&request);
            let action = match request.validate(answer) {
                Ok(Selection::Cancel) => {
                    self.sink.emit(GameEvent::TurnSkipped { hero: name });
                    return;
                }
                Ok(Selection::Pick(idx)) => HERO_ACTIONS[idx],
                Err(error) => {
                    self.reject(error);
                    continue;
                }
            };

            let consumed = match action {
                HeroAction::Attack => self.hero_attack(hero),
                HeroAction::CastSpell => self.hero_cast_spell(hero),
                HeroAction::UsePotion => self.hero_use_potion(hero),
                HeroAction::EquipGear => {
                    self.hero_equip_gear(hero);
                    false
                }
            };
            if consumed {
                return;
            }
        }
    }

    /// Picks a living monster. Auto-selects a lone survivor; `None` on cancel.
    fn choose_target(&mut self) -> Option<usize> {
        loop {
            let alive: Vec<usize> = self
                .monsters
                .iter()
                .enumerate()
                .filter(|(_, m)| m.is_alive())
                .map(|(i, _)| i)
                .collect();

            match alive.as_slice() {
                [] => {
                    self.reject(GameError::NoValidTarget(TargetKind::Monster));
                    return None;
                }
                [only] => {
                    self.sink.emit(GameEvent::AutoTargeted {
                        monster: self.monsters[*only].name.clone(),
                    });
                    return Some(*only);
                }
                _ => {}
            }

            let request = ChoiceRequest::new(
                ChoiceKind::Target,
                "Choose target",
                alive
                    .iter()
                    .map(|&i| format!("{} (HP:{})", self.monsters[i].name, self.monsters[i].hp))
                    .collect(),
            );
            match request.validate(self.decisions.ask_choice(&request)) {
                Ok(Selection::Cancel) => return None,
                Ok(Selection::Pick(k)) => return Some(alive[k]),
                Err(error) => self.reject(error),
            }
        }
    }

    fn hero_attack(&mut self, hero: usize) -> bool {
        let Some(target) = self.choose_target() else {
            self.cancelled(hero, ActionKind::Attack);
            return false;
        };

        let h = &self.heroes[hero];
        let monster = &mut self.monsters[target];

        if math::roll_dodge(monster.dodge_chance(), self.rng) {
            self.sink.emit(GameEvent::Dodged {
                attacker: h.name.clone(),
                defender: monster.name.clone(),
                kind: StrikeKind::Attack,
            });
            return true;
        }

        let base = math::attack_base(h.weapon_damage(), h.level);
        let damage = math::physical_damage(base, monster.defense);
        monster.take_damage(damage);

        self.sink.emit(GameEvent::AttackLanded {
            hero: h.name.clone(),
            monster: monster.name.clone(),
            damage,
        });
        if monster.is_dead() {
            self.sink.emit(GameEvent::MonsterSlain {
                monster: monster.name.clone(),
            });
        }
        true
    }

    fn hero_cast_spell(&mut self, hero: usize) -> bool {
        loop {
            let spells: Vec<_> = equipment::spells(&self.heroes[hero].inventory)
                .into_iter()
                .map(|(i, s)| (i, s.clone()))
                .collect();
            if spells.is_empty() {
                self.reject(GameError::NoValidTarget(TargetKind::Spell));
                return false;
            }

            let request = ChoiceRequest::new(
                ChoiceKind::Spell,
                "Choose spell",
                spells
                    .iter()
                    .map(|(i, _)| self.heroes[hero].inventory[*i].describe())
                    .collect(),
            );
            let (slot, spell) = match request.validate(self.decisions.ask_choice(&request)) {
                Ok(Selection::Cancel) => {
                    self.cancelled(hero, ActionKind::CastSpell);
                    return false;
                }
                Ok(Selection::Pick(k)) => spells[k].clone(),
                Err(error) => {
                    self.reject(error);
                    continue;
                }
            };

            let mana = self.heroes[hero].mana;
            if mana < spell.mana_cost {
                self.reject(GameError::InsufficientResource {
                    resource: Resource::Mana,
                    needed: spell.mana_cost,
                    available: mana,
                });
                continue;
            }

            // Mana is only spent once a target is confirmed.
            let Some(target) = self.choose_target() else {
                self.cancelled(hero, ActionKind::CastSpell);
                return false;
            };

            let h = &mut self.heroes[hero];
            h.mana -= spell.mana_cost;
            h.inventory.remove(slot);

            let monster = &mut self.monsters[target];
            if math::roll_dodge(monster.dodge_chance(), self.rng) {
                self.sink.emit(GameEvent::Dodged {
                    attacker: h.name.clone(),
                    defender: monster.name.clone(),
                    kind: StrikeKind::Spell,
                });
                return true;
            }

            let base = math::spell_base(h.spell_damage(&spell), h.level);
            let damage = math::magical_damage(base, monster.defense);
            monster.take_damage(damage);
            let debuff = apply_debuff(monster, spell.spell_type);

            self.sink.emit(GameEvent::SpellLanded {
                hero: h.name.clone(),
                spell: spell.name.clone(),
                monster: monster.name.clone(),
                damage,
                debuff,
            });
            if monster.is_dead() {
                self.sink.emit(GameEvent::MonsterSlain {
                    monster: monster.name.clone(),
                });
            }
            return true;
        }
    }

    fn hero_use_potion(&mut self, hero: usize) -> bool {
        loop {
            let potions: Vec<_> = equipment::potions(&self.heroes[hero].inventory)
                .into_iter()
                .map(|(i, p)| (i, p.clone()))
                .collect();
            if potions.is_empty() {
                self.reject(GameError::NoValidTarget(TargetKind::Potion));
                return false;
            }

            let request = ChoiceRequest::new(
                ChoiceKind::Potion,
                "Choose potion",
                potions
                    .iter()
                    .map(|(i, _)| self.heroes[hero].inventory[*i].describe())
                    .collect(),
            );
            match request.validate(self.decisions.ask_choice(&request)) {
                Ok(Selection::Cancel) => {
                    self.cancelled(hero, ActionKind::UsePotion);
                    return false;
                }
                Ok(Selection::Pick(k)) => {
                    let (slot, potion) = &potions[k];
                    let h = &mut self.heroes[hero];
                    h.apply_potion(potion);
                    h.inventory.remove(*slot);
                    self.sink.emit(GameEvent::PotionUsed {
                        hero: h.name.clone(),
                        potion: potion.name.clone(),
                    });
                    return true;
                }
                Err(error) => self.reject(error),
            }
        }
    }

    /// Gear menu. Never consumes the turn.
    fn hero_equip_gear(&mut self, hero: usize) {
        let request = ChoiceRequest::new(
            ChoiceKind::GearMenu,
            format!("Equip gear for {}", self.heroes[hero].name),
            vec![
                "Equip Weapon".to_string(),
                "Equip Armor".to_string(),
                "Toggle Grip".to_string(),
            ],
        );
        loop {
            match request.validate(self.decisions.ask_choice(&request)) {
                Ok(Selection::Cancel) => return,
                Ok(Selection::Pick(0)) => self.equip_weapon(hero),
                Ok(Selection::Pick(1)) => self.equip_armor(hero),
                Ok(Selection::Pick(_)) => self.toggle_grip(hero),
                Err(error) => self.reject(error),
            }
        }
    }

    fn equip_weapon(&mut self, hero: usize) {
        let weapons: Vec<_> = equipment::weapons(&self.heroes[hero].inventory)
            .into_iter()
            .map(|(i, w)| (i, w.clone()))
            .collect();
        if weapons.is_empty() {
            self.reject(GameError::NoValidTarget(TargetKind::Weapon));
            return;
        }
        let request = ChoiceRequest::new(
            ChoiceKind::Weapon,
            "Choose weapon",
            weapons
                .iter()
                .map(|(i, _)| self.heroes[hero].inventory[*i].describe())
                .collect(),
        );
        match request.validate(self.decisions.ask_choice(&request)) {
            Ok(Selection::Cancel) => {}
            Ok(Selection::Pick(k)) => {
                let weapon = weapons[k].1.clone();
                let h = &mut self.heroes[hero];
                self.sink.emit(GameEvent::Equipped {
                    hero: h.name.clone(),
                    item: weapon.name.clone(),
                });
                h.equipment.equip_weapon(weapon);
            }
            Err(error) => self.reject(error),
        }
    }

    fn equip_armor(&mut self, hero: usize) {
        let armors: Vec<_> = equipment::armors(&self.heroes[hero].inventory)
            .into_iter()
            .map(|(i, a)| (i, a.clone()))
            .collect();
        if armors.is_empty() {
            self.reject(GameError::NoValidTarget(TargetKind::Armor));
            return;
        }
        let request = ChoiceRequest::new(
            ChoiceKind::Armor,
            "Choose armor",
            armors
                .iter()
                .map(|(i, _)| self.heroes[hero].inventory[*i].describe())
                .collect(),
        );
        match request.validate(self.decisions.ask_choice(&request)) {
            Ok(Selection::Cancel) => {}
            Ok(Selection::Pick(k)) => {
                let armor = armors[k].1.clone();
                let h = &mut self.heroes[hero];
                self.sink.emit(GameEvent::Equipped {
                    hero: h.name.clone(),
                    item: armor.name.clone(),
                });
                h.equipment.equip_armor(armor);
            }
            Err(error) => self.reject(error),
        }
    }

    fn toggle_grip(&mut self, hero: usize) {
        let prompt = self.heroes[hero]
            .equipment
            .weapon
            .as_ref()
            .filter(|w| w.is_one_handed())
            .map(|w| format!("Wield {} with both hands?", w.name));
        let Some(prompt) = prompt else {
            self.reject(GameError::NoValidTarget(TargetKind::Weapon));
            return;
        };
        let two_hands = self.decisions.confirm(&prompt);
        let h = &mut self.heroes[hero];
        if h.equipment.set_two_handed_grip(two_hands).is_ok() {
            self.sink.emit(GameEvent::GripChanged {
                hero: h.name.clone(),
                two_hands,
            });
        }
    }

    // ---------------------------------------------------------------------
    // Monster phase
    // ---------------------------------------------------------------------

    fn monster_phase(&mut self) {
        for m in 0..self.monsters.len() {
            if self.monsters[m].is_dead() {
                continue;
            }

            let standing: Vec<usize> = self
                .heroes
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.fainted && !h.is_dead())
                .map(|(i, _)| i)
                .collect();
            if standing.is_empty() {
                return;
            }

            let target = standing[self.rng.gen_range(0..standing.len())];
            let monster = &self.monsters[m];
            let hero = &mut self.heroes[target];

            if math::roll_dodge(hero.dodge_chance(), self.rng) {
                self.sink.emit(GameEvent::Dodged {
                    attacker: monster.name.clone(),
                    defender: hero.name.clone(),
                    kind: StrikeKind::MonsterAttack,
                });
                continue;
            }

            let effective =
                math::armor_absorbed(monster.base_damage, hero.equipment.damage_reduction());
            if effective == 0 {
                self.sink.emit(GameEvent::AttackAbsorbed {
                    monster: monster.name.clone(),
                    hero: hero.name.clone(),
                });
                continue;
            }

            let factor = math::roll_monster_damage_factor(self.rng);
            let damage = math::scale_monster_damage(effective, hero.level, factor);
            let knocked_out = hero.take_damage(damage);

            self.sink.emit(GameEvent::MonsterAttacked {
                monster: monster.name.clone(),
                hero: hero.name.clone(),
                damage,
            });
            if knocked_out {
                self.sink.emit(GameEvent::HeroFainted {
                    hero: hero.name.clone(),
                });
            }
        }
    }
}

/// Applies the spell's lingering effect to its target.
pub fn apply_debuff(monster: &mut Monster, spell_type: SpellType) -> Debuff {
    match spell_type {
        SpellType::Fire => {
            let from = monster.defense;
            monster.defense = math::weaken(from, FIRE_DEFENSE_MULTIPLIER);
            Debuff::Defense {
                from,
                to: monster.defense,
            }
        }
        SpellType::Ice => {
            let from = monster.base_damage;
            monster.base_damage = math::weaken(from, ICE_DAMAGE_MULTIPLIER);
            Debuff::Damage {
                from,
                to: monster.base_damage,
            }
        }
        SpellType::Lightning => {
            let from = monster.dodge_percent();
            monster.set_dodge_percent(math::reduce_dodge_percent(from));
            Debuff::Dodge {
                from,
                to: monster.dodge_percent(),
            }
        }
    }
}

/// Convenience wrapper: builds a [`Battle`] and runs it to completion.
pub fn resolve_battle<R: Rng>(
    heroes: &mut [Hero],
    monsters: &mut [Monster],
    rng: &mut R,
    decisions: &mut dyn DecisionSource,
    sink: &mut dyn EventSink,
) -> BattleReport {
    Battle::new(heroes, monsters, rng, decisions, sink).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Attributes, HeroClass};
    use crate::combat::types::MonsterSpecies;
    use crate::core::decisions::ScriptedDecisions;
    use crate::items::{Armor, Item, Potion, PotionAttribute, Spell, Weapon};
    use rand::rngs::mock::StepRng;

    /// Every float draw is 0.0 and every index draw is 0: nothing with a
    /// zero dodge chance ever dodges, monsters hit the first standing hero
    /// with the minimum damage factor.
    fn zero_rng() -> StepRng {
        StepRng::new(0, 0)
    }

    fn hero(name: &str) -> Hero {
        Hero::new(name, HeroClass::Warrior, 1, Attributes::new(0, 0, 0)).with_mana(500)
    }

    fn monster(name: &str, defense: u32) -> Monster {
        Monster::new(name, MonsterSpecies::Dragon, 1, 100, defense, 0)
    }

    fn fireball() -> Spell {
        Spell {
            name: "Breath_of_Fire".to_string(),
            cost: 350,
            required_level: 1,
            damage: 450,
            mana_cost: 100,
            spell_type: SpellType::Fire,
        }
    }

    fn battle<'a>(
        heroes: &'a mut [Hero],
        monsters: &'a mut [Monster],
        rng: &'a mut StepRng,
        decisions: &'a mut ScriptedDecisions,
        sink: &'a mut Vec<GameEvent>,
    ) -> Battle<'a, StepRng> {
        Battle::new(heroes, monsters, rng, decisions, sink)
    }

    #[test]
    fn test_unarmed_level_one_attack_deals_six() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("Natsunomeryu", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([1]);
        let mut events = Vec::new();

        let mut b = battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);
        b.hero_turn(0);
        drop(b);

        assert_eq!(monsters[0].hp, 94);
        assert!(events.contains(&GameEvent::AutoTargeted {
            monster: "Natsunomeryu".into()
        }));
        assert!(events.contains(&GameEvent::AttackLanded {
            hero: "Gaerdal".into(),
            monster: "Natsunomeryu".into(),
            damage: 6,
        }));
    }

    #[test]
    fn test_attack_floor_against_heavy_defense() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("Wall", 10_000)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([1]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);
        assert_eq!(monsters[0].hp, 95);
    }

    #[test]
    fn test_dodged_attack_consumes_turn() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![Monster::new("Wisp", MonsterSpecies::Spirit, 1, 100, 0, 20)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([1, 1]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert_eq!(monsters[0].hp, 100);
        assert_eq!(script.remaining(), 1);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Dodged {
                kind: StrikeKind::Attack,
                ..
            }
        )));
    }

    #[test]
    fn test_cancelled_target_does_not_consume_turn() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("A", 0), monster("B", 0)];
        let mut rng = zero_rng();
        // Attack, cancel target, then attack B
        let mut script = ScriptedDecisions::new([1, 0, 1, 2]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert_eq!(monsters[0].hp, 100);
        assert_eq!(monsters[1].hp, 94);
        assert!(events.contains(&GameEvent::ActionCancelled {
            hero: "Gaerdal".into(),
            action: ActionKind::Attack,
        }));
    }

    #[test]
    fn test_invalid_action_reprompts() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([9, -3, 0]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        let rejected = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ActionRejected { .. }))
            .count();
        assert_eq!(rejected, 2);
        assert!(events.contains(&GameEvent::TurnSkipped {
            hero: "Gaerdal".into()
        }));
    }

    #[test]
    fn test_spell_cancel_after_mana_check_keeps_mana() {
        let mut heroes = vec![hero("Rillifane").with_item(Item::Spell(fireball()))];
        let mut monsters = vec![monster("A", 0), monster("B", 0)];
        let mut rng = zero_rng();
        // Cast, pick spell, cancel target, skip
        let mut script = ScriptedDecisions::new([2, 1, 0, 0]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert_eq!(heroes[0].mana, 500);
        assert_eq!(heroes[0].inventory.len(), 1);
        assert!(monsters.iter().all(|m| m.hp == 100));
    }

    #[test]
    fn test_spell_insufficient_mana_rejected() {
        let mut heroes = vec![hero("Rillifane")
            .with_mana(50)
            .with_item(Item::Spell(fireball()))];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        // Cast, pick spell (too expensive), cancel spell menu, skip
        let mut script = ScriptedDecisions::new([2, 1, 0, 0]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert!(events.contains(&GameEvent::ActionRejected {
            error: GameError::InsufficientResource {
                resource: Resource::Mana,
                needed: 100,
                available: 50,
            }
        }));
        assert_eq!(heroes[0].mana, 50);
        assert_eq!(heroes[0].inventory.len(), 1);
    }

    #[test]
    fn test_fire_spell_hits_and_weakens_defense() {
        let mut heroes = vec![hero("Rillifane").with_item(Item::Spell(fireball()))];
        let mut monsters = vec![Monster::new("Drake", MonsterSpecies::Dragon, 5, 100, 400, 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([2, 1]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        // 450 - 400 = 50 damage, defense 400 -> 360
        assert_eq!(monsters[0].hp, 450);
        assert_eq!(monsters[0].defense, 360);
        assert_eq!(heroes[0].mana, 400);
        assert!(heroes[0].inventory.is_empty());
    }

    #[test]
    fn test_dodged_spell_still_consumed() {
        let mut heroes = vec![hero("Rillifane").with_item(Item::Spell(fireball()))];
        let mut monsters = vec![Monster::new("Wisp", MonsterSpecies::Spirit, 1, 100, 0, 25)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([2, 1]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert_eq!(monsters[0].hp, 100);
        assert_eq!(heroes[0].mana, 400);
        assert!(heroes[0].inventory.is_empty());
    }

    #[test]
    fn test_ice_and_lightning_debuffs() {
        let mut m = Monster::new("Target", MonsterSpecies::Exoskeleton, 1, 15, 10, 35);
        assert_eq!(
            apply_debuff(&mut m, SpellType::Ice),
            Debuff::Damage { from: 15, to: 13 }
        );
        assert_eq!(
            apply_debuff(&mut m, SpellType::Lightning),
            Debuff::Dodge { from: 35, to: 32 }
        );
        assert_eq!(m.base_damage, 13);
        assert_eq!(m.dodge_percent(), 32);
    }

    #[test]
    fn test_no_spells_does_not_consume_turn() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([2, 3, 0]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert!(events.contains(&GameEvent::ActionRejected {
            error: GameError::NoValidTarget(TargetKind::Spell)
        }));
        assert!(events.contains(&GameEvent::ActionRejected {
            error: GameError::NoValidTarget(TargetKind::Potion)
        }));
        assert!(events.contains(&GameEvent::TurnSkipped {
            hero: "Gaerdal".into()
        }));
    }

    #[test]
    fn test_potion_consumes_turn_and_item() {
        let potion = Potion {
            name: "Healing_Potion".to_string(),
            cost: 250,
            required_level: 1,
            amount: 100,
            attributes: vec![PotionAttribute::Health],
        };
        let mut heroes = vec![hero("Gaerdal").with_item(Item::Potion(potion))];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([3, 1, 1]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        assert_eq!(heroes[0].hp, 200);
        assert!(heroes[0].inventory.is_empty());
        assert_eq!(script.remaining(), 1);
    }

    #[test]
    fn test_equip_gear_never_consumes_turn() {
        let sword = Weapon {
            name: "Sword".to_string(),
            cost: 500,
            required_level: 1,
            damage: 800,
            hands: 1,
        };
        let plate = Armor {
            name: "Breastplate".to_string(),
            cost: 350,
            required_level: 1,
            damage_reduction: 600,
        };
        let mut heroes = vec![hero("Gaerdal")
            .with_item(Item::Weapon(sword))
            .with_item(Item::Armor(plate))];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        // Gear menu: weapon #1, armor #1, toggle grip (yes), back; then attack
        let mut script = ScriptedDecisions::new([4, 1, 1, 2, 1, 3, 0, 1]).with_confirms([true]);
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).hero_turn(0);

        let h = &heroes[0];
        assert_eq!(h.equipment.weapon.as_ref().map(|w| w.name.as_str()), Some("Sword"));
        assert_eq!(h.equipment.damage_reduction(), 600);
        assert!(h.equipment.using_two_hands);
        assert_eq!(h.inventory.len(), 2);
        // round(1200 * 0.05) + 5 = 65
        assert_eq!(monsters[0].hp, 35);
    }

    #[test]
    fn test_monster_phase_scaled_damage() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![Monster::new("Brute", MonsterSpecies::Dragon, 1, 300, 0, 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::default();
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).monster_phase();

        // round(300 * 0.10) = 30, capped at 20
        assert_eq!(heroes[0].hp, 80);
    }

    #[test]
    fn test_monster_phase_armor_absorbs() {
        let mut heroes = vec![hero("Gaerdal")];
        heroes[0].equipment.equip_armor(Armor {
            name: "Wizard_Shield".to_string(),
            cost: 1200,
            required_level: 10,
            damage_reduction: 1500,
        });
        let mut monsters = vec![Monster::new("Brute", MonsterSpecies::Dragon, 1, 300, 0, 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::default();
        let mut events = Vec::new();

        battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events).monster_phase();

        assert_eq!(heroes[0].hp, 100);
        assert!(events.contains(&GameEvent::AttackAbsorbed {
            monster: "Brute".into(),
            hero: "Gaerdal".into(),
        }));
    }

    #[test]
    fn test_fainted_hero_skipped_and_not_targeted() {
        let mut heroes = vec![hero("Down"), hero("Up")];
        heroes[0].take_damage(1000);
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([1]);
        let mut events = Vec::new();

        let mut b = battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);
        b.hero_phase();
        b.monster_phase();
        drop(b);

        assert_eq!(heroes[0].hp, 0);
        assert_eq!(monsters[0].hp, 94);
        // round(100 * 0.10) = 10
        assert_eq!(heroes[1].hp, 90);
        assert!(!events.contains(&GameEvent::TurnStarted { hero: "Down".into() }));
    }

    #[test]
    fn test_state_machine_transitions() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([0]);
        let mut events = Vec::new();

        let mut b = battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);
        assert_eq!(b.phase(), BattlePhase::RoundStart);
        assert_eq!(b.step(), BattlePhase::HeroPhase);
        assert_eq!(b.round(), 1);
        assert_eq!(b.step(), BattlePhase::CheckVictory);
        assert_eq!(b.step(), BattlePhase::MonsterPhase);
        assert_eq!(b.step(), BattlePhase::CheckDefeat);
        assert_eq!(b.step(), BattlePhase::EndOfRoundRegen);
        assert_eq!(b.step(), BattlePhase::RoundStart);
    }

    #[test]
    fn test_full_battle_victory() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        // 17 attacks of 6 damage fell a 100 hp monster
        let mut script = ScriptedDecisions::new(std::iter::repeat(1).take(17));
        let mut events = Vec::new();

        let report = resolve_battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);

        assert_eq!(report.outcome, BattleOutcome::HeroesWon);
        assert_eq!(report.rounds, 17);
        let rewards = report.rewards.unwrap();
        assert_eq!(rewards.exp_per_hero, 2);
        assert_eq!(rewards.gold_per_hero, 100);
        assert_eq!(heroes[0].gold, 100);
    }

    #[test]
    fn test_full_battle_defeat_without_rewards() {
        let mut heroes = vec![hero("Gaerdal")];
        let mut monsters = vec![Monster::new("Brute", MonsterSpecies::Dragon, 1, 300, 0, 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::default();
        let mut events = Vec::new();

        let report = resolve_battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);

        assert_eq!(report.outcome, BattleOutcome::HeroesDefeated);
        assert!(report.rewards.is_none());
        assert!(heroes[0].fainted);
        assert_eq!(heroes[0].gold, 0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Defeat { .. })));
    }

    #[test]
    fn test_round_start_yields_once_decisions_run_dry() {
        let mut heroes = vec![hero("Gaerdal"), hero("Kalabar")];
        let mut monsters = vec![monster("A", 0)];
        let mut rng = zero_rng();
        let mut script = ScriptedDecisions::new([0]);
        let mut events = Vec::new();

        let mut b = battle(&mut heroes, &mut monsters, &mut rng, &mut script, &mut events);
        // First hero skips from the script, the second finds it empty
        assert_eq!(b.step(), BattlePhase::HeroPhase);
        assert_eq!(b.step(), BattlePhase::CheckVictory);
        assert_eq!(b.step(), BattlePhase::MonsterPhase);
        assert_eq!(b.step(), BattlePhase::CheckDefeat);
        assert_eq!(b.step(), BattlePhase::EndOfRoundRegen);
        assert_eq!(b.step(), BattlePhase::RoundStart);
        assert_eq!(b.step(), BattlePhase::HeroesDefeated);
        assert_eq!(b.round(), 1);
        drop(b);

        assert!(heroes.iter().all(|h| h.fainted && h.hp == 0));
        assert!(events.contains(&GameEvent::PartyYielded { round: 1 }));
    }
}
