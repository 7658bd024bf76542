//! Shared rules, configuration, errors and the decision/presentation seams.

pub mod config;
pub mod constants;
pub mod decisions;
pub mod error;
pub mod events;

pub use config::GameConfig;
pub use decisions::{ChoiceKind, ChoiceRequest, DecisionSource, ScriptedDecisions, Selection};
pub use error::{GameError, Resource, TargetKind};
pub use events::{ActionKind, BlockReason, EventSink, GameEvent, StrikeKind};
