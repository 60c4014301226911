//! Learner port - abstraction for tabular control agents
//!
//! The training pipeline drives any learner that picks actions for integer
//! states and optionally learns from transitions:
//! - Q-learning agents (value table + epsilon-greedy)
//! - Baselines (uniform random)

use crate::{
    Result,
    types::{Action, StateIndex, Transition},
};

/// Learner trait - Unified interface for tabular agents
///
/// # Lifecycle
///
/// 1. `on_training_start(total_episodes)` - once, before the first training episode
/// 2. For each step: `select_action(state, training)`, then `learn(&transition)`
///    (training only)
/// 3. `on_episode_end()` - after each training episode
///
/// Evaluation only calls `select_action(state, false)`.
///
/// # Examples
///
/// ```no_run
/// use polebalance::{ports::Learner, types::Transition};
///
/// fn replay<L: Learner>(agent: &mut L, transitions: &[Transition]) -> polebalance::Result<()> {
///     for transition in transitions {
///         agent.learn(transition)?;
///     }
///     agent.on_episode_end();
///     Ok(())
/// }
/// ```
pub trait Learner: Send {
    /// Select an action for `state`.
    ///
    /// With `training == false` the learner must act greedily and must not
    /// explore.
    ///
    /// # Errors
    ///
    /// Returns an error if `state` lies outside the learner's state space.
    fn select_action(&mut self, state: StateIndex, training: bool) -> Result<Action>;

    /// Learn from one observed transition.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive baselines.
    fn learn(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called once before a training run of `total_episodes` episodes.
    ///
    /// Learners with episode-count dependent schedules set them up here.
    fn on_training_start(&mut self, _total_episodes: usize) {}

    /// Called after every training episode; learners decay schedules here.
    fn on_episode_end(&mut self) {}

    /// Get the learner's name.
    ///
    /// Used for identification in reports and logging.
    fn name(&self) -> &str;

    /// Current learning rate, if the learner has one.
    fn alpha(&self) -> Option<f64> {
        None
    }

    /// Current exploration rate, if the learner has one.
    fn epsilon(&self) -> Option<f64> {
        None
    }

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this when configured with a deterministic
    /// seed. Stateless learners can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
