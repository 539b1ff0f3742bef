//! Player whose decisions come from an external input source.

use super::Strategy;
use crate::games::go::{Decision, Game};
use anyhow::Result;
use tokio::sync::mpsc;

/// Human player; a front end pushes decisions into the channel.
pub struct HumanStrategy {
    name: String,
    input_rx: mpsc::UnboundedReceiver<Decision>,
}

impl HumanStrategy {
    /// Creates a new human player.
    pub fn new(name: impl Into<String>, input_rx: mpsc::UnboundedReceiver<Decision>) -> Self {
        Self {
            name: name.into(),
            input_rx,
        }
    }
}

#[async_trait::async_trait]
impl Strategy for HumanStrategy {
    async fn determine_move(&mut self, game: &Game) -> Result<Decision> {
        // Keep reading until the front end offers something playable.
        while let Some(decision) = self.input_rx.recv().await {
            match decision {
                Decision::Place(pos) if !game.is_legal(pos) => continue,
                other => return Ok(other),
            }
        }

        anyhow::bail!("Input channel closed")
    }

    fn name(&self) -> &str {
        &self.name
    }
}
