//! World map data structures.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Grid position as (row, col); (0, 0) is the top-left start tile.
pub type Position = (usize, usize);

/// Type of a map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileType {
    /// Open land where monsters roam
    Common,
    /// Buy and sell gear
    Market,
    /// Cannot be entered
    Inaccessible,
}

impl TileType {
    pub fn is_accessible(&self) -> bool {
        !matches!(self, TileType::Inaccessible)
    }

    /// Display character for this tile type
    pub fn icon(&self) -> char {
        match self {
            TileType::Common => ' ',
            TileType::Market => 'M',
            TileType::Inaccessible => 'X',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// (d_row, d_col)
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// W/A/S/D
    pub fn from_key(key: char) -> Option<Direction> {
        match key.to_ascii_uppercase() {
            'W' => Some(Direction::Up),
            'S' => Some(Direction::Down),
            'A' => Some(Direction::Left),
            'D' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Immutable tile grid. Rendering state (party position) lives elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMap {
    rows: usize,
    cols: usize,
    tiles: Vec<Vec<TileType>>,
}

impl GameMap {
    /// Builds a map from explicit rows. Rows must be non-empty and equal length.
    pub fn from_tiles(tiles: Vec<Vec<TileType>>) -> Option<Self> {
        let rows = tiles.len();
        let cols = tiles.first().map_or(0, |r| r.len());
        if rows == 0 || cols == 0 || tiles.iter().any(|r| r.len() != cols) {
            return None;
        }
        Some(Self { rows, cols, tiles })
    }

    pub(crate) fn filled(rows: usize, cols: usize, tile: TileType) -> Self {
        Self {
            rows,
            cols,
            tiles: vec![vec![tile; cols]; rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile(&self, pos: Position) -> Option<TileType> {
        self.tiles.get(pos.0).and_then(|row| row.get(pos.1)).copied()
    }

    pub(crate) fn set_tile(&mut self, pos: Position, tile: TileType) {
        if let Some(slot) = self.tiles.get_mut(pos.0).and_then(|row| row.get_mut(pos.1)) {
            *slot = tile;
        }
    }

    pub fn is_accessible(&self, pos: Position) -> bool {
        self.tile(pos).is_some_and(|t| t.is_accessible())
    }

    /// The neighbor of `pos` in `dir`, if it lies on the map.
    pub fn step(&self, pos: Position, dir: Direction) -> Option<Position> {
        let (dr, dc) = dir.offset();
        let r = pos.0.checked_add_signed(dr)?;
        let c = pos.1.checked_add_signed(dc)?;
        if r < self.rows && c < self.cols {
            Some((r, c))
        } else {
            None
        }
    }

    pub fn count(&self, tile: TileType) -> usize {
        self.tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    pub fn accessible_count(&self) -> usize {
        self.rows * self.cols - self.count(TileType::Inaccessible)
    }

    /// BFS over accessible tiles from `start`, 4-directional.
    pub fn reachable_from(&self, start: Position) -> Vec<Vec<bool>> {
        let mut visited = vec![vec![false; self.cols]; self.rows];
        if !self.is_accessible(start) {
            return visited;
        }

        let mut queue = VecDeque::new();
        visited[start.0][start.1] = true;
        queue.push_back(start);

        while let Some(pos) = queue.pop_front() {
            for dir in Direction::all() {
                if let Some(next) = self.step(pos, dir) {
                    if !visited[next.0][next.1] && self.is_accessible(next) {
                        visited[next.0][next.1] = true;
                        queue.push_back(next);
                    }
                }
            }
        }

        visited
    }

    /// Every accessible tile reachable from the origin, and the origin open.
    pub fn is_connected(&self) -> bool {
        if !self.is_accessible((0, 0)) {
            return false;
        }
        let visited = self.reachable_from((0, 0));
        self.unreached(&visited).is_empty()
    }

    /// Accessible tiles not marked in `visited`, in row-major order.
    pub(crate) fn unreached(&self, visited: &[Vec<bool>]) -> Vec<Position> {
        let mut missing = Vec::new();
        for r in 0..self.rows {
            for c in 0..self.cols {
                if self.tiles[r][c].is_accessible() && !visited[r][c] {
                    missing.push((r, c));
                }
            }
        }
        missing
    }

    /// Boxed text grid with the party drawn as `H`.
    pub fn render(&self, party: Position) -> String {
        let border = format!("{}+", "+---".repeat(self.cols));
        let mut out = String::new();
        out.push_str(&border);
        out.push('\n');
        for r in 0..self.rows {
            for c in 0..self.cols {
                let icon = if (r, c) == party {
                    'H'
                } else {
                    self.tiles[r][c].icon()
                };
                out.push_str("| ");
                out.push(icon);
                out.push(' ');
            }
            out.push_str("|\n");
            out.push_str(&border);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TileType::{Common as C, Inaccessible as X, Market as M};

    #[test]
    fn test_from_tiles_rejects_ragged() {
        assert!(GameMap::from_tiles(vec![]).is_none());
        assert!(GameMap::from_tiles(vec![vec![C, C], vec![C]]).is_none());
        assert!(GameMap::from_tiles(vec![vec![C, M], vec![X, C]]).is_some());
    }

    #[test]
    fn test_step_stays_in_bounds() {
        let map = GameMap::filled(3, 4, C);
        assert_eq!(map.step((0, 0), Direction::Up), None);
        assert_eq!(map.step((0, 0), Direction::Left), None);
        assert_eq!(map.step((0, 0), Direction::Right), Some((0, 1)));
        assert_eq!(map.step((2, 3), Direction::Down), None);
        assert_eq!(map.step((2, 3), Direction::Right), None);
        assert_eq!(map.step((1, 1), Direction::Up), Some((0, 1)));
    }

    #[test]
    fn test_connectivity_detects_island() {
        let map = GameMap::from_tiles(vec![
            vec![C, X, C],
            vec![X, X, C],
            vec![C, C, C],
        ])
        .unwrap();
        // (0,0) is cut off from everything else
        assert!(!map.is_connected());
        let visited = map.reachable_from((0, 0));
        assert_eq!(map.unreached(&visited).len(), 5);
    }

    #[test]
    fn test_connectivity_accepts_single_component() {
        let map = GameMap::from_tiles(vec![
            vec![C, C, X],
            vec![X, M, X],
            vec![C, C, C],
        ])
        .unwrap();
        assert!(map.is_connected());
        assert_eq!(map.accessible_count(), 6);
        assert_eq!(map.count(M), 1);
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        let map = GameMap::from_tiles(vec![vec![C, X], vec![X, C]]).unwrap();
        assert!(!map.is_connected());
    }

    #[test]
    fn test_direction_keys() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('A'), Some(Direction::Left));
        assert_eq!(Direction::from_key('s'), Some(Direction::Down));
        assert_eq!(Direction::from_key('d'), Some(Direction::Right));
        assert_eq!(Direction::from_key('q'), None);
    }

    #[test]
    fn test_render_marks_party() {
        let map = GameMap::from_tiles(vec![vec![C, M], vec![X, C]]).unwrap();
        let text = map.render((1, 1));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "+---+---+");
        assert_eq!(lines[1], "|   | M |");
        assert_eq!(lines[3], "| X | H |");
    }
}
