//! Optional observers notified of game changes.
//!
//! Rendering and logging subscribe here instead of being driven by the game.

use super::board::Board;
use super::types::{Outcome, Position, Score, Stone};
use tracing::{debug, info};

/// Something that happened in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A stone was placed and any captures resolved.
    StonePlaced {
        /// Color of the placed stone.
        stone: Stone,
        /// Where it was placed.
        position: Position,
        /// Stones removed by the move.
        captured: Vec<Position>,
    },
    /// A player passed.
    Passed {
        /// Color that passed.
        stone: Stone,
        /// Consecutive passes so far.
        pass_count: u8,
    },
    /// The game reached its terminal state.
    Ended {
        /// Final area score.
        score: Score,
        /// Winner or draw.
        outcome: Outcome,
    },
}

/// Receives game events together with the board after the change.
pub trait GameObserver: Send + Sync {
    /// Called after each state change.
    fn on_event(&mut self, event: &GameEvent, board: &Board);
}

/// Observer that writes events and the rendered board to the tracing log.
#[derive(Debug, Default)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    /// Creates an observer whose log lines carry `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl GameObserver for TracingObserver {
    fn on_event(&mut self, event: &GameEvent, board: &Board) {
        match event {
            GameEvent::StonePlaced {
                stone,
                position,
                captured,
            } => {
                debug!(game = %self.label, %stone, %position, captured = captured.len(), "Stone placed\n{}", board);
            }
            GameEvent::Passed { stone, pass_count } => {
                debug!(game = %self.label, %stone, pass_count, "Pass");
            }
            GameEvent::Ended { score, outcome } => {
                info!(
                    game = %self.label,
                    black = score.black,
                    white = score.white,
                    %outcome,
                    "Game ended\n{}",
                    board
                );
            }
        }
    }
}
