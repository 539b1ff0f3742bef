//! First-class action types for Go.
//!
//! Decisions are the player's intent; they are validated by
//! [`Game`](super::Game) before anything on the board changes.

use super::types::{Position, Stone};
use serde::{Deserialize, Serialize};

/// What a player chooses to do on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Place a stone at the position.
    Place(Position),
    /// Give up the turn.
    Pass,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Place(pos) => write!(f, "place at {}", pos),
            Decision::Pass => write!(f, "pass"),
        }
    }
}

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Color that moved.
    pub stone: Stone,
    /// Where the stone was placed.
    pub position: Position,
    /// Every stone removed by the move, the mover's own included on self-capture.
    pub captured: Vec<Position>,
    /// Color to move next.
    pub next: Stone,
}

impl MoveOutcome {
    /// True when the placed stone was removed by its own move.
    pub fn is_suicide(&self) -> bool {
        self.captured.contains(&self.position)
    }
}

/// Error that can occur when validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// The coordinate lies outside the board.
    #[display("Position ({}, {}) is off the board", row, col)]
    OffBoard {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The intersection already holds a stone.
    #[display("Position {} is already occupied", _0)]
    Occupied(#[error(not(source))] Position),

    /// The move would recreate an earlier board position.
    #[display("Move at {} repeats an earlier board position", _0)]
    Ko(#[error(not(source))] Position),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,
}
