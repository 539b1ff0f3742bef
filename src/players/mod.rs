//! Move-selection capability and its implementations.

mod human;
mod random;

pub use human::HumanStrategy;
pub use random::RandomStrategy;

use crate::games::go::{Decision, Game};
use anyhow::Result;

/// Something that can choose a move for the player whose turn it is.
#[async_trait::async_trait]
pub trait Strategy: Send {
    /// Decides the next action for `game.current_stone()`.
    async fn determine_move(&mut self, game: &Game) -> Result<Decision>;

    /// Returns the player's display name.
    fn name(&self) -> &str;
}
