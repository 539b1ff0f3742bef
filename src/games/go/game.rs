//! Game engine for one Go match.

use super::action::{MoveError, MoveOutcome};
use super::board::{Board, DEFAULT_SIZE};
use super::observer::{GameEvent, GameObserver};
use super::rules::{KoHistory, area_score, resolve_captures};
use super::types::{Outcome, Player, Position, Score, Stone};
use tracing::{debug, info, instrument, warn};

/// Consecutive passes that end a game.
pub const PASSES_TO_END: u8 = 2;

/// One match between a black and a white player.
///
/// The board is only ever replaced by a fully validated trial copy, so a
/// rejected move leaves no trace.
pub struct Game {
    board: Board,
    black: Player,
    white: Player,
    current: Stone,
    pass_count: u8,
    history: KoHistory,
    moves_played: usize,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("board", &self.board)
            .field("black", &self.black)
            .field("white", &self.white)
            .field("current", &self.current)
            .field("pass_count", &self.pass_count)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Game {
    /// Creates a game on a 9x9 board. Black moves first.
    pub fn new(black: impl Into<String>, white: impl Into<String>) -> Self {
        Self::with_size(black, white, DEFAULT_SIZE)
    }

    /// Creates a game on a board of the given size.
    #[instrument(skip(black, white))]
    pub fn with_size(black: impl Into<String>, white: impl Into<String>, size: usize) -> Self {
        let black = Player::new(black.into(), Stone::Black);
        let white = Player::new(white.into(), Stone::White);
        info!(black = black.username(), white = white.username(), "Creating new game");
        Self {
            board: Board::new(size),
            black,
            white,
            current: Stone::Black,
            pass_count: 0,
            history: KoHistory::new(),
            moves_played: 0,
            observers: Vec::new(),
        }
    }

    /// Creates a game starting from an arranged position, black to move.
    ///
    /// The starting position itself is not part of the repetition history.
    pub fn with_board(black: impl Into<String>, white: impl Into<String>, board: Board) -> Self {
        let mut game = Self::with_size(black, white, board.size());
        game.board = board;
        game
    }

    /// Registers an observer for subsequent events.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Color whose turn it is.
    pub fn current_stone(&self) -> Stone {
        self.current
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> &Player {
        self.player(self.current)
    }

    /// Player holding `stone`. `Empty` resolves to black.
    pub fn player(&self, stone: Stone) -> &Player {
        match stone {
            Stone::White => &self.white,
            _ => &self.black,
        }
    }

    /// Consecutive passes since the last placed stone.
    pub fn pass_count(&self) -> u8 {
        self.pass_count
    }

    /// Number of board positions recorded for repetition checks.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of accepted stone placements.
    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// On the board and currently empty. Repetition is judged by [`Game::do_move`].
    pub fn is_valid_move(&self, pos: Position) -> bool {
        self.board.is_empty(pos)
    }

    /// Whether playing at `pos` now would be accepted, repetition included.
    pub fn is_legal(&self, pos: Position) -> bool {
        !self.is_game_over() && self.trial(pos).is_ok()
    }

    /// Every position the current player may play.
    pub fn legal_positions(&self) -> Vec<Position> {
        if self.is_game_over() {
            return Vec::new();
        }
        self.board
            .empty_positions()
            .into_iter()
            .filter(|&pos| self.trial(pos).is_ok())
            .collect()
    }

    /// Plays the position on a copy of the board and checks for repetition.
    fn trial(&self, pos: Position) -> Result<(Board, Vec<Position>), MoveError> {
        if !self.board.is_valid_position(pos.row, pos.col) {
            return Err(MoveError::OffBoard {
                row: pos.row,
                col: pos.col,
            });
        }
        if !self.is_valid_move(pos) {
            return Err(MoveError::Occupied(pos));
        }

        let mut trial = self.board.clone();
        trial.place(pos, self.current);
        let captured = resolve_captures(&mut trial, pos);

        if self.history.contains(&trial.snapshot()) {
            return Err(MoveError::Ko(pos));
        }
        Ok((trial, captured))
    }

    /// Places the current player's stone at `pos`.
    ///
    /// On success the pass counter resets, the resulting position is
    /// recorded and the turn passes to the opponent. On error nothing
    /// changes and the same player stays to move.
    #[instrument(skip(self), fields(player = %self.current))]
    pub fn do_move(&mut self, pos: Position) -> Result<MoveOutcome, MoveError> {
        if self.is_game_over() {
            warn!("Move attempted after game over");
            return Err(MoveError::GameOver);
        }

        let (board, captured) = self.trial(pos).inspect_err(|e| {
            debug!(error = %e, "Rejected move");
        })?;

        let stone = self.current;
        self.board = board;
        self.history.record(self.board.snapshot());
        self.pass_count = 0;
        self.moves_played += 1;
        self.current = stone.opponent();

        debug!(captured = captured.len(), next = %self.current, "Move applied");
        self.notify(GameEvent::StonePlaced {
            stone,
            position: pos,
            captured: captured.clone(),
        });
        self.notify_if_over();

        Ok(MoveOutcome {
            stone,
            position: pos,
            captured,
            next: self.current,
        })
    }

    /// Passes the turn. Two consecutive passes end the game.
    #[instrument(skip(self), fields(player = %self.current))]
    pub fn pass(&mut self) -> Result<(), MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let stone = self.current;
        self.pass_count += 1;
        self.current = stone.opponent();
        debug!(pass_count = self.pass_count, "Player passed");

        self.notify(GameEvent::Passed {
            stone,
            pass_count: self.pass_count,
        });
        self.notify_if_over();
        Ok(())
    }

    /// True after two consecutive passes or once the board is full.
    pub fn is_game_over(&self) -> bool {
        self.pass_count >= PASSES_TO_END || self.board.is_full()
    }

    /// Area score of both colors on the current board.
    pub fn score(&self) -> Score {
        area_score(&self.board)
    }

    /// Area score of one player.
    pub fn final_score(&self, player: &Player) -> usize {
        self.score().of(player.stone())
    }

    /// Winner or draw, once the game is over.
    pub fn outcome(&self) -> Option<Outcome> {
        self.is_game_over().then(|| self.score().outcome())
    }

    /// Player with the strictly higher score, once the game is over.
    pub fn winner(&self) -> Option<&Player> {
        self.outcome()
            .and_then(|o| o.winner())
            .map(|stone| self.player(stone))
    }

    fn notify_if_over(&mut self) {
        if self.is_game_over() {
            let score = self.score();
            info!(black = score.black, white = score.white, "Game over");
            self.notify(GameEvent::Ended {
                score,
                outcome: score.outcome(),
            });
        }
    }

    fn notify(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event, &self.board);
        }
    }
}
