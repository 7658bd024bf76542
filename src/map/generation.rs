//! Map generation: rejection sampling with a connectivity check.

use super::types::{GameMap, Position, TileType};
use crate::core::config::GameConfig;
use crate::core::constants::{INACCESSIBLE_TILE_CHANCE, MAP_DIMENSION_LIMIT, MARKET_TILE_CHANCE};
use crate::core::error::GameError;
use rand::Rng;
use tracing::{debug, info, warn};

/// Generates a map whose accessible tiles form one 4-connected component,
/// with (0, 0) always Common.
///
/// Samples until a connected map appears, up to `config.map_max_attempts`.
/// When attempts run out the last sample is repaired by carving paths if
/// `config.map_fallback_carve` is set; otherwise generation fails.
pub fn generate_map(
    rows: usize,
    cols: usize,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<GameMap, GameError> {
    if rows == 0 || cols == 0 || rows > MAP_DIMENSION_LIMIT || cols > MAP_DIMENSION_LIMIT {
        return Err(GameError::InvalidMapSize { rows, cols });
    }

    let attempts = config.map_max_attempts.max(1);
    let mut last = None;

    for attempt in 1..=attempts {
        let map = sample_tiles(rows, cols, rng);
        if map.is_connected() {
            debug!(rows, cols, attempt, "map accepted");
            return Ok(map);
        }
        last = Some(map);
    }

    match last {
        Some(mut map) if config.map_fallback_carve => {
            let carved = carve_connections(&mut map);
            warn!(rows, cols, attempts, carved, "map sampling exhausted, carved paths");
            if map.is_connected() {
                Ok(map)
            } else {
                Err(GameError::MapGenerationFailed { attempts })
            }
        }
        _ => {
            info!(rows, cols, attempts, "map sampling exhausted");
            Err(GameError::MapGenerationFailed { attempts })
        }
    }
}

/// One independent draw per tile: 15% Inaccessible, 10% Market, else Common.
/// The origin is forced to Common.
pub fn sample_tiles(rows: usize, cols: usize, rng: &mut impl Rng) -> GameMap {
    let mut map = GameMap::filled(rows, cols, TileType::Common);
    for r in 0..rows {
        for c in 0..cols {
            map.set_tile((r, c), roll_tile(rng.gen::<f64>()));
        }
    }
    map.set_tile((0, 0), TileType::Common);
    map
}

fn roll_tile(roll: f64) -> TileType {
    if roll < INACCESSIBLE_TILE_CHANCE {
        TileType::Inaccessible
    } else if roll < INACCESSIBLE_TILE_CHANCE + MARKET_TILE_CHANCE {
        TileType::Market
    } else {
        TileType::Common
    }
}

/// Connects every accessible tile the origin cannot reach by turning the
/// L-shaped path (along its row to column 0, then up to the origin) into
/// Common land. Deterministic. Returns the number of tiles opened.
pub fn carve_connections(map: &mut GameMap) -> usize {
    map.set_tile((0, 0), TileType::Common);
    let visited = map.reachable_from((0, 0));
    let stranded = map.unreached(&visited);

    let mut opened = 0;
    for (row, col) in stranded {
        for pos in l_path((row, col)) {
            if map.tile(pos) == Some(TileType::Inaccessible) {
                map.set_tile(pos, TileType::Common);
                opened += 1;
            }
        }
    }
    opened
}

fn l_path((row, col): Position) -> impl Iterator<Item = Position> {
    let along_row = (0..=col).rev().map(move |c| (row, c));
    let up_column = (0..row).rev().map(|r| (r, 0));
    along_row.chain(up_column)
}
