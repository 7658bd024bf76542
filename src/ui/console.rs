//! Line-based console adapter: numbered menus on stdin, colored events on stdout.
//! Decisions and events go through separate handles so a battle can borrow both.

use crossterm::style::Stylize;
use legends::combat::Debuff;
use legends::core::events::HeroStatus;
use legends::core::{ActionKind, BlockReason, ChoiceRequest, DecisionSource, EventSink, GameEvent};
use legends::map::TileType;
use std::io::{self, BufRead, Write};

pub struct ConsoleIo<R, W> {
    input: R,
    output: W,
    /// Colors are off when output is not a terminal (tests, pipes).
    color: bool,
    /// Set once input hits end of file.
    closed: bool,
}

impl ConsoleIo<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self {
            input: io::stdin().lock(),
            output: io::stdout(),
            color: true,
            closed: false,
        }
    }
}

impl<R: BufRead, W: Write> ConsoleIo<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            color: false,
            closed: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
    }

    pub fn say_bad(&mut self, text: &str) {
        if self.color {
            let _ = writeln!(self.output, "{}", text.red());
        } else {
            self.say(text);
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input.
    pub fn prompt(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{}", prompt);
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => {
                self.closed = true;
                None
            }
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Re-prompts until a whole number is entered. End of input reads as 0.
    pub fn prompt_number(&mut self, prompt: &str) -> i64 {
        loop {
            let Some(line) = self.prompt(prompt) else {
                return 0;
            };
            match line.parse::<i64>() {
                Ok(n) => return n,
                Err(_) => self.say_bad("Please enter a number."),
            }
        }
    }

    /// Re-prompts until a number inside `range` is entered.
    pub fn prompt_in_range(&mut self, prompt: &str, range: std::ops::RangeInclusive<i64>) -> Option<i64> {
        loop {
            let line = self.prompt(prompt)?;
            match line.parse::<i64>() {
                Ok(n) if range.contains(&n) => return Some(n),
                _ => self.say_bad(&format!(
                    "Please enter a number from {} to {}.",
                    range.start(),
                    range.end()
                )),
            }
        }
    }
}

impl<R: BufRead, W: Write> DecisionSource for ConsoleIo<R, W> {
    fn ask_choice(&mut self, request: &ChoiceRequest) -> i64 {
        if let Some(actor) = &request.actor {
            self.say(&actor_line(actor));
        }
        self.say(&request.prompt);
        for (i, option) in request.options.iter().enumerate() {
            self.say(&format!("  {}. {}", i + 1, option));
        }
        if request.allow_cancel {
            self.say("  0. Back");
        }
        self.prompt_number("> ")
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        matches!(
            self.prompt(&format!("{} [y/N] ", prompt)).as_deref(),
            Some("y" | "Y" | "yes")
        )
    }

    fn is_exhausted(&self) -> bool {
        self.closed
    }
}

/// Renders events as lines of text; good news in green, bad news in red.
pub struct EventPrinter<W> {
    output: W,
    color: bool,
}

impl EventPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            output: io::stdout(),
            color: true,
        }
    }
}

impl<W: Write> EventPrinter<W> {
    pub fn plain(output: W) -> Self {
        Self {
            output,
            color: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<W: Write> EventSink for EventPrinter<W> {
    fn emit(&mut self, event: GameEvent) {
        let Some(text) = describe(&event) else {
            return;
        };
        let text = text.as_str();
        let _ = if !self.color {
            writeln!(self.output, "{}", text)
        } else if event.is_favorable() {
            writeln!(self.output, "{}", text.green())
        } else if event.is_unfavorable() {
            writeln!(self.output, "{}", text.red())
        } else {
            writeln!(self.output, "{}", text)
        };
    }
}

fn actor_line(actor: &HeroStatus) -> String {
    format!("-- {} (HP:{} MP:{}) --", actor.name, actor.hp, actor.mana)
}

fn action_name(action: ActionKind) -> &'static str {
    match action {
        ActionKind::Attack => "Attack",
        ActionKind::CastSpell => "Spell",
        ActionKind::UsePotion => "Potion",
        ActionKind::EquipGear => "Equip",
    }
}

fn debuff_text(debuff: &Debuff) -> String {
    match debuff {
        Debuff::Defense { from, to } => format!("defense {} -> {}", from, to),
        Debuff::Damage { from, to } => format!("damage {} -> {}", from, to),
        Debuff::Dodge { from, to } => format!("dodge {}% -> {}%", from, to),
    }
}

/// Text for one event. Tile steps onto plain land print nothing.
pub fn describe(event: &GameEvent) -> Option<String> {
    let text = match event {
        GameEvent::BattleStarted { heroes, monsters } => format!(
            "=== BATTLE: {} vs {} ===",
            heroes.join(", "),
            monsters.join(", ")
        ),
        GameEvent::RoundStarted {
            round,
            heroes,
            monsters,
        } => {
            let mut lines = vec![format!("--- Round {} ---", round)];
            for h in heroes {
                let state = if h.fainted { " (fainted)" } else { "" };
                lines.push(format!("  {:<22} HP:{:<5} MP:{}{}", h.name, h.hp, h.mana, state));
            }
            for m in monsters {
                lines.push(format!(
                    "  {:<22} HP:{:<5} DMG:{} DEF:{}",
                    m.name, m.hp, m.base_damage, m.defense
                ));
            }
            lines.join("\n")
        }
        GameEvent::TurnStarted { .. } => return None,
        GameEvent::TurnSkipped { hero } => format!("{} skips the turn.", hero),
        GameEvent::AutoTargeted { monster } => format!("Only {} remains; targeting it.", monster),
        GameEvent::ActionCancelled { hero, action } => {
            format!("{} cancelled {}.", hero, action_name(*action))
        }
        GameEvent::ActionRejected { error } => format!("Can't do that: {}.", error),
        GameEvent::AttackLanded {
            hero,
            monster,
            damage,
        } => format!("{} hits {} for {} damage.", hero, monster, damage),
        GameEvent::SpellLanded {
            hero,
            spell,
            monster,
            damage,
            debuff,
        } => format!(
            "{} casts {} on {} for {} damage ({}).",
            hero,
            spell,
            monster,
            damage,
            debuff_text(debuff)
        ),
        GameEvent::Dodged {
            attacker, defender, ..
        } => format!("{} dodged {}'s blow!", defender, attacker),
        GameEvent::MonsterAttacked {
            monster,
            hero,
            damage,
        } => format!("{} hits {} for {} damage.", monster, hero, damage),
        GameEvent::AttackAbsorbed { monster, hero } => {
            format!("{}'s armor absorbs {}'s attack.", hero, monster)
        }
        GameEvent::MonsterSlain { monster } => format!("{} is slain!", monster),
        GameEvent::HeroFainted { hero } => format!("{} has fainted!", hero),
        GameEvent::PotionUsed { hero, potion } => format!("{} drinks {}.", hero, potion),
        GameEvent::Equipped { hero, item } => format!("{} equips {}.", hero, item),
        GameEvent::GripChanged { hero, two_hands } => format!(
            "{} now holds the weapon with {}.",
            hero,
            if *two_hands { "both hands" } else { "one hand" }
        ),
        GameEvent::RoundEnded { .. } => return None,
        GameEvent::Victory { rounds } => format!("Victory after {} rounds!", rounds),
        GameEvent::Defeat { rounds } => format!("The party falls after {} rounds.", rounds),
        GameEvent::PartyYielded { .. } => {
            "No more orders come; the party lays down its arms.".to_string()
        }
        GameEvent::RewardGranted { hero, exp, gold } => {
            format!("{} gains {} exp and {} gold.", hero, exp, gold)
        }
        GameEvent::LevelUp { hero, level } => format!("{} reached level {}!", hero, level),
        GameEvent::HeroRevived { hero, hp } => format!("{} is revived with {} HP.", hero, hp),
        GameEvent::MoveBlocked { reason } => match reason {
            BlockReason::OffMap => "You can't leave the map.".to_string(),
            BlockReason::Inaccessible => "That way is blocked.".to_string(),
        },
        GameEvent::TileEntered { tile, .. } => match tile {
            TileType::Common => return None,
            other => format!("You step onto {:?} ground.", other),
        },
        GameEvent::MarketReached => "You reached a market. Press M to trade.".to_string(),
        GameEvent::EncounterTriggered { monsters } => {
            format!("Monsters appear: {}!", monsters.join(", "))
        }
        GameEvent::ItemBought {
            hero,
            item,
            gold_left,
        } => format!("{} bought {} ({} gold left).", hero, item, gold_left),
        GameEvent::ItemSold { hero, item, price } => {
            format!("{} sold {} for {} gold.", hero, item, price)
        }
    };
    Some(text)
}
