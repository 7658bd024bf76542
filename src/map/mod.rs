//! World map: tile grid, connectivity and generation.

pub mod generation;
pub mod types;

pub use generation::{carve_connections, generate_map, sample_tiles};
pub use types::{Direction, GameMap, Position, TileType};
