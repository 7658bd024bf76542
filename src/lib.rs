//! Legends - party-combat battle engine on a generated grid world.
//!
//! This module exposes the game logic for the console front end, the
//! simulator and tests.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod core;
pub mod items;
pub mod map;
pub mod session;
pub mod simulator;
pub mod templates;
