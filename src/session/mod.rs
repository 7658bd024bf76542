//! Session controller: movement, encounters and the market, glued over the
//! map and the battle resolver.

pub mod encounter;
pub mod logic;

pub use encounter::{build_roster, candidates, roster_size};
pub use logic::{MoveOutcome, Session};
