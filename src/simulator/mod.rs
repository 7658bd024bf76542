//! Headless battle simulator for Monte Carlo balance checks.
//!
//! Each run starts a real session, walks the party around the map at random
//! and lets an [`AutoPilot`] fight every encounter with the same rules the
//! console game uses.

mod autopilot;
mod config;
mod report;
mod runner;

pub use autopilot::AutoPilot;
pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::{run_simulation, simulate_single_run};
