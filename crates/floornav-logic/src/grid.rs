//! Grid primitives shared by every floor: cells, compass directions, wall keys,
//! connector kinds and the grid size that bounds them.
//!
//! Wall keys follow the "cell before the boundary" convention:
//! - a horizontal wall keyed `(r, c)` separates `(r, c)` from `(r + 1, c)`
//! - a vertical wall keyed `(r, c)` separates `(r, c)` from `(r, c + 1)`
//!
//! The outer edge of the grid is never stored as a wall. Leaving the grid is
//! impossible anyway, so only interior keys are valid.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(row, col)` coordinate on one floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbour one step in `dir`, or `None` if it would leave `size`.
    pub fn step(self, dir: Direction, size: GridSize) -> Option<Cell> {
        let next = match dir {
            Direction::North => Cell::new(self.row.checked_sub(1)?, self.col),
            Direction::South => Cell::new(self.row + 1, self.col),
            Direction::West => Cell::new(self.row, self.col.checked_sub(1)?),
            Direction::East => Cell::new(self.row, self.col + 1),
        };
        size.contains(next).then_some(next)
    }

    /// In-bounds axis neighbours, paired with the direction taken.
    pub fn neighbors(self, size: GridSize) -> impl Iterator<Item = (Direction, Cell)> {
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| self.step(dir, size).map(|n| (dir, n)))
    }

    /// True if `other` shares an edge with this cell.
    pub fn is_adjacent(self, other: Cell) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }

    pub fn manhattan(self, other: Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Cell::new(row, col)
    }
}

impl From<Cell> for (usize, usize) {
    fn from(cell: Cell) -> Self {
        (cell.row, cell.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Compass direction on the grid. North is decreasing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Direction of the single step from `from` to `to`, if they are adjacent.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        if !from.is_adjacent(to) {
            return None;
        }
        Some(if to.row < from.row {
            Direction::North
        } else if to.row > from.row {
            Direction::South
        } else if to.col < from.col {
            Direction::West
        } else {
            Direction::East
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

/// Which wall collection a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallOrientation {
    /// Between `(r, c)` and `(r + 1, c)`.
    Horizontal,
    /// Between `(r, c)` and `(r, c + 1)`.
    Vertical,
}

/// A wall segment: orientation plus the cell above / left of the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WallKey {
    pub orientation: WallOrientation,
    pub cell: Cell,
}

impl WallKey {
    pub const fn horizontal(row: usize, col: usize) -> Self {
        Self {
            orientation: WallOrientation::Horizontal,
            cell: Cell::new(row, col),
        }
    }

    pub const fn vertical(row: usize, col: usize) -> Self {
        Self {
            orientation: WallOrientation::Vertical,
            cell: Cell::new(row, col),
        }
    }

    /// Key of the edge separating two adjacent cells, in either order.
    pub fn between(a: Cell, b: Cell) -> Option<WallKey> {
        match Direction::between(a, b)? {
            Direction::North => Some(WallKey::horizontal(b.row, b.col)),
            Direction::South => Some(WallKey::horizontal(a.row, a.col)),
            Direction::West => Some(WallKey::vertical(b.row, b.col)),
            Direction::East => Some(WallKey::vertical(a.row, a.col)),
        }
    }

    /// The two cells this segment separates.
    pub fn cells(self) -> (Cell, Cell) {
        let Cell { row, col } = self.cell;
        match self.orientation {
            WallOrientation::Horizontal => (self.cell, Cell::new(row + 1, col)),
            WallOrientation::Vertical => (self.cell, Cell::new(row, col + 1)),
        }
    }
}

impl fmt::Display for WallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.cells();
        write!(f, "{:?} wall {}|{}", self.orientation, a, b)
    }
}

/// Kind of cross-floor connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Links floors whose index differs by exactly one.
    Stair,
    /// Links every floor that marks the same cell.
    Elevator,
}

impl ConnectorKind {
    pub fn name(self) -> &'static str {
        match self {
            ConnectorKind::Stair => "stairs",
            ConnectorKind::Elevator => "elevator",
        }
    }
}

/// Grid dimensions shared by every floor in a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    pub const fn square(n: usize) -> Self {
        Self { rows: n, cols: n }
    }

    pub fn contains(self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Whether a wall key names an interior edge of this grid.
    pub fn is_valid_wall(self, key: WallKey) -> bool {
        let Cell { row, col } = key.cell;
        match key.orientation {
            WallOrientation::Horizontal => row + 1 < self.rows && col < self.cols,
            WallOrientation::Vertical => row < self.rows && col + 1 < self.cols,
        }
    }

    pub fn cell_count(self) -> usize {
        self.rows * self.cols
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_inside_grid() {
        let size = GridSize::square(3);
        assert_eq!(Cell::new(0, 0).step(Direction::North, size), None);
        assert_eq!(Cell::new(0, 0).step(Direction::West, size), None);
        assert_eq!(Cell::new(2, 2).step(Direction::South, size), None);
        assert_eq!(Cell::new(2, 2).step(Direction::East, size), None);
        assert_eq!(
            Cell::new(1, 1).step(Direction::East, size),
            Some(Cell::new(1, 2))
        );
    }

    #[test]
    fn corner_has_two_neighbors() {
        let size = GridSize::square(4);
        assert_eq!(Cell::new(0, 0).neighbors(size).count(), 2);
        assert_eq!(Cell::new(1, 1).neighbors(size).count(), 4);
        assert_eq!(Cell::new(3, 1).neighbors(size).count(), 3);
    }

    #[test]
    fn wall_between_is_symmetric() {
        let a = Cell::new(2, 2);
        let above = Cell::new(1, 2);
        let right = Cell::new(2, 3);
        assert_eq!(WallKey::between(a, above), Some(WallKey::horizontal(1, 2)));
        assert_eq!(WallKey::between(above, a), Some(WallKey::horizontal(1, 2)));
        assert_eq!(WallKey::between(a, right), Some(WallKey::vertical(2, 2)));
        assert_eq!(WallKey::between(right, a), Some(WallKey::vertical(2, 2)));
        assert_eq!(WallKey::between(a, Cell::new(3, 3)), None);
        assert_eq!(WallKey::between(a, a), None);
    }

    #[test]
    fn wall_cells_round_trip() {
        let key = WallKey::vertical(4, 1);
        let (a, b) = key.cells();
        assert_eq!(WallKey::between(a, b), Some(key));
    }

    #[test]
    fn only_interior_walls_are_valid() {
        let size = GridSize::square(5);
        assert!(size.is_valid_wall(WallKey::horizontal(3, 4)));
        assert!(!size.is_valid_wall(WallKey::horizontal(4, 0)));
        assert!(size.is_valid_wall(WallKey::vertical(4, 3)));
        assert!(!size.is_valid_wall(WallKey::vertical(0, 4)));
    }

    #[test]
    fn direction_between_adjacent_cells() {
        let c = Cell::new(5, 5);
        assert_eq!(
            Direction::between(c, Cell::new(4, 5)),
            Some(Direction::North)
        );
        assert_eq!(Direction::between(c, Cell::new(5, 6)), Some(Direction::East));
        assert_eq!(Direction::between(c, Cell::new(6, 6)), None);
    }

    #[test]
    fn cell_serializes_as_pair() {
        let json = serde_json::to_string(&Cell::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
        let back: Cell = serde_json::from_str("[3,7]").unwrap();
        assert_eq!(back, Cell::new(3, 7));
    }
}
