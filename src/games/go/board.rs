//! Square Go board.

use super::types::{Position, Stone};
use serde::{Deserialize, Serialize};

/// Side length used when no size is configured.
pub const DEFAULT_SIZE: usize = 9;

/// Smallest supported side length.
pub const MIN_SIZE: usize = 2;

/// Largest supported side length.
pub const MAX_SIZE: usize = 25;

/// Fixed-size grid of intersections in row-major order.
///
/// Every cell always holds exactly one [`Stone`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
}

impl Board {
    /// Creates an empty board. `size` is clamped to `MIN_SIZE..=MAX_SIZE`.
    pub fn new(size: usize) -> Self {
        let size = size.clamp(MIN_SIZE, MAX_SIZE);
        Self {
            size,
            cells: vec![Stone::Empty; size * size],
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Checks that the coordinate lies on the board.
    pub fn is_valid_position(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.is_valid_position(pos.row, pos.col)
            .then(|| pos.row * self.size + pos.col)
    }

    /// Stone at the position, or `None` off the board.
    pub fn get(&self, pos: Position) -> Option<Stone> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Stone at the position, treating off-board coordinates as empty.
    pub fn stone_at(&self, row: usize, col: usize) -> Stone {
        self.get(Position::new(row, col)).unwrap_or(Stone::Empty)
    }

    /// True when the position is on the board and holds no stone.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Some(Stone::Empty)
    }

    /// Places a stone. Leaves the board untouched when the position is off
    /// the board, already occupied, or `stone` is `Empty`.
    ///
    /// Returns whether the board changed.
    pub fn place(&mut self, pos: Position, stone: Stone) -> bool {
        if !stone.is_stone() {
            return false;
        }
        match self.index(pos) {
            Some(i) if self.cells[i] == Stone::Empty => {
                self.cells[i] = stone;
                true
            }
            _ => false,
        }
    }

    /// Clears the position. No-op when already empty or off the board.
    pub fn remove(&mut self, pos: Position) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = Stone::Empty;
        }
    }

    /// True when no empty intersection remains.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|s| s.is_stone())
    }

    /// Number of stones of the given color.
    pub fn count(&self, stone: Stone) -> usize {
        self.cells.iter().filter(|&&s| s == stone).count()
    }

    /// All positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    /// All empty positions in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions().filter(|&p| self.is_empty(p)).collect()
    }

    /// On-board orthogonal neighbors (two at corners, three on edges).
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        let mut result = Vec::with_capacity(4);
        if !self.is_valid_position(pos.row, pos.col) {
            return result;
        }
        if pos.row > 0 {
            result.push(Position::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.size {
            result.push(Position::new(pos.row + 1, pos.col));
        }
        if pos.col > 0 {
            result.push(Position::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.size {
            result.push(Position::new(pos.row, pos.col + 1));
        }
        result
    }

    /// Stones on the orthogonal neighbors of `pos`, paired with their positions.
    pub fn neighbor_stones(&self, pos: Position) -> Vec<(Position, Stone)> {
        self.neighbors(pos)
            .into_iter()
            .filter_map(|n| self.get(n).map(|s| (n, s)))
            .collect()
    }

    /// Canonical encoding of every cell, used for repetition checks.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            size: self.size,
            cells: self.cells.iter().map(|s| s.to_byte()).collect(),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for col in 0..self.size {
            write!(f, "{:<3}", col)?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{:<3}", row)?;
            for col in 0..self.size {
                write!(f, "{:<3}", self.stone_at(row, col).symbol())?;
            }
            if row + 1 < self.size {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Full-state board encoding: one byte per cell plus the side length.
///
/// Equality compares every cell, so hashed lookups never report a
/// false repetition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    size: usize,
    cells: Box<[u8]>,
}

impl BoardSnapshot {
    /// Raw cell bytes (0 empty, 1 black, 2 white).
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Side length of the encoded board.
    pub fn size(&self) -> usize {
        self.size
    }
}
