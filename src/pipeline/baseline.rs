//! Baseline learners for comparison runs

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    ports::Learner,
    types::{Action, StateIndex},
};

/// Random learner (picks uniformly among all actions)
///
/// Never learns; useful as a floor when judging whether Q-learning made
/// progress on an environment.
pub struct RandomLearner {
    name: String,
    n_actions: usize,
    rng: StdRng,
}

impl RandomLearner {
    /// Create a new random learner
    pub fn new(name: impl Into<String>, n_actions: usize) -> Self {
        Self {
            name: name.into(),
            n_actions,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: impl Into<String>, n_actions: usize, seed: u64) -> Self {
        Self {
            name: name.into(),
            n_actions,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, _state: StateIndex, _training: bool) -> Result<Action> {
        if self.n_actions == 0 {
            return Err(Error::ActionOutOfRange {
                action: 0,
                n_actions: 0,
            });
        }
        Ok(self.rng.random_range(0..self.n_actions))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}
