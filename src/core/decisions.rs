//! Decision source: the synchronous request/response seam between the core
//! and whoever picks actions (a console, a script, an autopilot).

use super::error::GameError;
use super::events::HeroStatus;
use std::collections::VecDeque;

/// What a choice request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    /// Battle action menu; 0 skips the turn.
    Action,
    Target,
    Spell,
    Potion,
    GearMenu,
    Weapon,
    Armor,
}

/// A numbered menu. Options are answered 1-based; 0 cancels when allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRequest {
    pub kind: ChoiceKind,
    pub prompt: String,
    pub options: Vec<String>,
    pub allow_cancel: bool,
    /// The hero acting, when the request belongs to one.
    pub actor: Option<HeroStatus>,
}

/// A validated answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Cancel,
    /// Zero-based index into `options`.
    Pick(usize),
}

impl ChoiceRequest {
    pub fn new(kind: ChoiceKind, prompt: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind,
            prompt: prompt.into(),
            options,
            allow_cancel: true,
            actor: None,
        }
    }

    pub fn for_actor(mut self, actor: HeroStatus) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn without_cancel(mut self) -> Self {
        self.allow_cancel = false;
        self
    }

    pub fn max(&self) -> usize {
        self.options.len()
    }

    pub fn validate(&self, choice: i64) -> Result<Selection, GameError> {
        if choice == 0 && self.allow_cancel {
            return Ok(Selection::Cancel);
        }
        if choice >= 1 && (choice as u64) <= self.options.len() as u64 {
            return Ok(Selection::Pick(choice as usize - 1));
        }
        Err(GameError::InvalidSelection {
            choice,
            max: self.max(),
        })
    }
}

pub trait DecisionSource {
    /// Returns the raw answer; the caller validates and re-prompts.
    fn ask_choice(&mut self, request: &ChoiceRequest) -> i64;

    /// Yes/cancel question.
    fn confirm(&mut self, prompt: &str) -> bool;

    /// True once no further answers will ever arrive (closed input, spent
    /// script). A battle facing an exhausted source ends instead of letting
    /// every turn be skipped forever.
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// Replays a fixed list of answers. Once the list runs out it answers 0 and
/// "no", which cancels or skips whatever is being asked, and reports itself
/// exhausted from then on.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    choices: VecDeque<i64>,
    confirms: VecDeque<bool>,
    asked: Vec<ChoiceKind>,
    ran_dry: bool,
}

impl ScriptedDecisions {
    pub fn new(choices: impl IntoIterator<Item = i64>) -> Self {
        Self {
            choices: choices.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_confirms(mut self, confirms: impl IntoIterator<Item = bool>) -> Self {
        self.confirms = confirms.into_iter().collect();
        self
    }

    /// Kinds of every request seen so far, in order.
    pub fn asked(&self) -> &[ChoiceKind] {
        &self.asked
    }

    pub fn remaining(&self) -> usize {
        self.choices.len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn ask_choice(&mut self, request: &ChoiceRequest) -> i64 {
        self.asked.push(request.kind);
        match self.choices.pop_front() {
            Some(choice) => choice,
            None => {
                self.ran_dry = true;
                0
            }
        }
    }

    fn confirm(&mut self, _prompt: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }

    fn is_exhausted(&self) -> bool {
        self.ran_dry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(n: usize) -> ChoiceRequest {
        ChoiceRequest::new(
            ChoiceKind::Target,
            "Choose target",
            (1..=n).map(|i| format!("Monster {i}")).collect(),
        )
    }

    #[test]
    fn test_validate_range() {
        let req = menu(3);
        assert_eq!(req.validate(0), Ok(Selection::Cancel));
        assert_eq!(req.validate(1), Ok(Selection::Pick(0)));
        assert_eq!(req.validate(3), Ok(Selection::Pick(2)));
        assert_eq!(
            req.validate(4),
            Err(GameError::InvalidSelection { choice: 4, max: 3 })
        );
        assert!(req.validate(-1).is_err());
    }

    #[test]
    fn test_zero_invalid_without_cancel() {
        let req = menu(2).without_cancel();
        assert!(req.validate(0).is_err());
    }

    #[test]
    fn test_scripted_decisions_exhaust_to_cancel() {
        let mut script = ScriptedDecisions::new([2, 1]).with_confirms([true]);
        let req = menu(2);
        assert_eq!(script.ask_choice(&req), 2);
        assert_eq!(script.ask_choice(&req), 1);
        assert!(!script.is_exhausted());
        assert_eq!(script.ask_choice(&req), 0);
        assert!(script.is_exhausted());
        assert!(script.confirm("?"));
        assert!(!script.confirm("?"));
        assert_eq!(script.asked().len(), 3);
        assert_eq!(script.remaining(), 0);
    }
}
