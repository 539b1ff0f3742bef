//! In-process match between two strategies.

use crate::games::go::{Decision, Game, GameObserver, Outcome, Score, Stone};
use crate::players::Strategy;
use anyhow::Result;
use tracing::{debug, info, instrument, warn};

/// Default cap on turns before both sides are made to pass.
pub const DEFAULT_MAX_TURNS: usize = 500;

/// Final result of a local match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Winner or draw.
    pub outcome: Outcome,
    /// Final area score.
    pub score: Score,
    /// Name of the winning strategy, if any.
    pub winner: Option<String>,
    /// Turns taken, passes included.
    pub turns: usize,
}

/// Plays two strategies against each other on one board.
pub struct LocalMatch {
    game: Game,
    black: Box<dyn Strategy>,
    white: Box<dyn Strategy>,
    max_turns: usize,
}

impl LocalMatch {
    /// Creates a match; `black` moves first.
    pub fn new(black: Box<dyn Strategy>, white: Box<dyn Strategy>, board_size: usize) -> Self {
        let game = Game::with_size(black.name(), white.name(), board_size);
        Self {
            game,
            black,
            white,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Caps the number of turns; afterwards both sides pass.
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Attaches an observer to the game.
    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.game.add_observer(observer);
    }

    /// The game as it stands.
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs the game loop until the game is over.
    #[instrument(skip(self), fields(black = self.black.name(), white = self.white.name()))]
    pub async fn run(&mut self) -> Result<MatchResult> {
        info!("Starting local match");
        let mut turns = 0;

        while !self.game.is_game_over() {
            if turns >= self.max_turns {
                warn!(turns, "Turn cap reached, ending by passes");
                while !self.game.is_game_over() {
                    self.game.pass()?;
                }
                break;
            }

            let stone = self.game.current_stone();
            let strategy = match stone {
                Stone::White => &mut self.white,
                _ => &mut self.black,
            };
            let decision = strategy.determine_move(&self.game).await?;
            debug!(%stone, %decision, "Strategy decided");

            match decision {
                Decision::Place(pos) => {
                    if let Err(e) = self.game.do_move(pos) {
                        warn!(%stone, error = %e, "Strategy chose an illegal move, passing instead");
                        self.game.pass()?;
                    }
                }
                Decision::Pass => self.game.pass()?,
            }
            turns += 1;
        }

        let score = self.game.score();
        let outcome = score.outcome();
        let winner = outcome
            .winner()
            .map(|stone| self.game.player(stone).username().to_string());
        info!(black = score.black, white = score.white, %outcome, turns, "Local match finished");

        Ok(MatchResult {
            outcome,
            score,
            winner,
            turns,
        })
    }
}
