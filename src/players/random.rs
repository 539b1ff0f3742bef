//! Computer player that picks a uniformly random legal point.

use super::Strategy;
use crate::games::go::{Decision, Game};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Plays a random legal position, passing when none is left.
pub struct RandomStrategy {
    name: String,
    rng: StdRng,
    pass_probability: f64,
}

impl RandomStrategy {
    /// Creates a random player seeded from system entropy.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_entropy(),
            pass_probability: 0.0,
        }
    }

    /// Creates a reproducible random player.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
            pass_probability: 0.0,
        }
    }

    /// Sets the chance of passing even when a legal point exists.
    pub fn with_pass_probability(mut self, probability: f64) -> Self {
        self.pass_probability = probability.clamp(0.0, 1.0);
        self
    }
}

#[async_trait::async_trait]
impl Strategy for RandomStrategy {
    async fn determine_move(&mut self, game: &Game) -> Result<Decision> {
        let legal = game.legal_positions();
        if self.pass_probability > 0.0 && self.rng.gen_bool(self.pass_probability) {
            debug!(player = %self.name, "Chose to pass");
            return Ok(Decision::Pass);
        }
        let decision = match legal.choose(&mut self.rng) {
            Some(&pos) => Decision::Place(pos),
            None => Decision::Pass,
        };
        debug!(player = %self.name, options = legal.len(), %decision, "Random move chosen");
        Ok(decision)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
