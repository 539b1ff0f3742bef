//! Go rule engine: board, captures, repetition and area scoring.

mod action;
mod board;
mod game;
mod observer;
mod rules;
mod types;

pub use action::{Decision, MoveError, MoveOutcome};
pub use board::{Board, BoardSnapshot, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use game::{Game, PASSES_TO_END};
pub use observer::{GameEvent, GameObserver, TracingObserver};
pub use rules::{KoHistory, area_score, connected_group, group_without_liberties, resolve_captures};
pub use types::{Outcome, Player, Position, Score, Stone};
