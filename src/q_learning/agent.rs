//! Q-learning agent
//!
//! Epsilon-greedy control over a dense value table, with a learning rate that
//! decays multiplicatively and an exploration rate that falls linearly to a
//! floor over the training run.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::debug;

use crate::{
    Error, Result,
    pipeline::{TrainingConfig, TrainingPipeline, TrainingResult, evaluate_learner},
    ports::{DiscreteEnvironment, Learner},
    q_learning::{hyperparameters::Hyperparameters, q_table::QTable, serialization::AgentSnapshot},
    types::{Action, StateIndex, Transition},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal action-value function by always updating toward the
/// best next-state value, regardless of the action actually taken next.
///
/// # Examples
///
/// ```
/// use polebalance::{
///     q_learning::{Hyperparameters, QLearningAgent},
///     types::Transition,
/// };
///
/// let mut agent = QLearningAgent::new(4, 2, Hyperparameters::default())?.with_seed(42);
/// agent.update(&Transition::new(0, 1, 2, 1.0, true))?;
/// assert_eq!(agent.q_value(0, 1)?, 0.5);
/// assert_eq!(agent.act(0, false)?, 1);
/// # Ok::<(), polebalance::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    params: Hyperparameters,
    alpha: f64,
    epsilon: f64,
    epsilon_drop: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent with an all-zero value table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHyperparameter`] for out-of-range settings and
    /// [`Error::InvalidConfiguration`] if either table dimension is zero.
    pub fn new(n_states: usize, n_actions: usize, params: Hyperparameters) -> Result<Self> {
        params.validate()?;
        let q_table = QTable::new(n_states, n_actions)?;
        Ok(Self {
            q_table,
            params,
            alpha: params.alpha,
            epsilon: params.epsilon,
            epsilon_drop: 0.0,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    /// Size the table from a discrete environment's state and action counts.
    pub fn for_environment<E>(env: &E, params: Hyperparameters) -> Result<Self>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        Self::new(env.state_count(), env.action_count(), params)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// ε-greedy action selection
    ///
    /// While training, explores with probability ε. Otherwise picks uniformly
    /// among the actions tied for the highest value, so equal estimates do
    /// not bias toward low action indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StateOutOfRange`] if `state` is not a row of the table.
    pub fn act(&mut self, state: StateIndex, training: bool) -> Result<Action> {
        let greedy = self.q_table.greedy_actions(state)?;

        if training && self.epsilon > 0.0 && self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            return Ok(self.rng.random_range(0..self.q_table.n_actions()));
        }

        // Exploit: uniform over tied maxima
        greedy
            .choose(&mut self.rng)
            .copied()
            .ok_or(Error::StateOutOfRange {
                state,
                n_states: self.q_table.n_states(),
            })
    }

    /// Apply one Q-learning update with the current learning rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TransitionOutOfRange`] carrying the transition if an
    /// index falls outside the table.
    pub fn update(&mut self, transition: &Transition) -> Result<()> {
        self.q_table
            .q_learning_update(transition, self.alpha, self.params.gamma)?;
        Ok(())
    }

    /// Prepare the linear ε schedule for a run of `n_episodes` episodes.
    pub fn begin_training(&mut self, n_episodes: usize) {
        self.epsilon_drop = if n_episodes == 0 {
            0.0
        } else {
            (self.epsilon - self.params.epsilon_final) / n_episodes as f64
        };
    }

    /// Decay α and ε after an episode.
    pub fn end_episode(&mut self) {
        self.alpha *= self.params.alpha_decay;
        if self.epsilon > self.params.epsilon_final {
            self.epsilon = (self.epsilon - self.epsilon_drop).max(self.params.epsilon_final);
        }
    }

    /// Train for `n_episodes` episodes on a discrete environment.
    ///
    /// # Errors
    ///
    /// Fails if the environment's state or action count differs from the
    /// table's, or if any step or update fails; the failing episode is not
    /// recorded.
    pub fn train<E>(&mut self, env: &mut E, n_episodes: usize) -> Result<TrainingResult>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        let mut pipeline = TrainingPipeline::new(TrainingConfig::new(n_episodes));
        self.train_with(env, &mut pipeline)
    }

    /// Train through a configured pipeline (observers, reporting interval).
    pub fn train_with<E>(
        &mut self,
        env: &mut E,
        pipeline: &mut TrainingPipeline,
    ) -> Result<TrainingResult>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        self.check_environment(env)?;
        pipeline.run(self, env)
    }

    /// Greedy rollouts without exploration or learning; returns each
    /// episode's total reward.
    pub fn evaluate<E>(&mut self, env: &mut E, n_episodes: usize) -> Result<Vec<f64>>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        self.check_environment(env)?;
        evaluate_learner(self, env, n_episodes)
    }

    fn check_environment<E>(&self, env: &E) -> Result<()>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        if env.state_count() != self.q_table.n_states()
            || env.action_count() != self.q_table.n_actions()
        {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "environment has {}x{} states/actions but the value table is {}x{}",
                    env.state_count(),
                    env.action_count(),
                    self.q_table.n_states(),
                    self.q_table.n_actions()
                ),
            });
        }
        Ok(())
    }

    /// Capture the value table and current schedule values.
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            version: AgentSnapshot::VERSION,
            n_states: self.q_table.n_states(),
            n_actions: self.q_table.n_actions(),
            values: self.q_table.values().to_vec(),
            gamma: self.params.gamma,
            alpha: self.alpha,
            epsilon: self.epsilon,
            epsilon_final: self.params.epsilon_final,
        }
    }

    /// Rebuild an agent from a snapshot.
    ///
    /// Snapshots do not record the α decay rate, so it is supplied here.
    pub fn from_snapshot(snapshot: &AgentSnapshot, alpha_decay: f64) -> Result<Self> {
        snapshot.check_version()?;
        let params = Hyperparameters {
            gamma: snapshot.gamma,
            alpha: snapshot.alpha,
            alpha_decay,
            epsilon: snapshot.epsilon,
            epsilon_final: snapshot.epsilon_final,
        };
        params.validate()?;
        let q_table =
            QTable::from_values(snapshot.n_states, snapshot.n_actions, snapshot.values.clone())?;
        Ok(Self {
            q_table,
            params,
            alpha: params.alpha,
            epsilon: params.epsilon,
            epsilon_drop: 0.0,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn q_value(&self, state: StateIndex, action: Action) -> Result<f64> {
        self.q_table.get(state, action)
    }

    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.params
    }

    pub fn current_alpha(&self) -> f64 {
        self.alpha
    }

    pub fn current_epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn n_states(&self) -> usize {
        self.q_table.n_states()
    }

    pub fn n_actions(&self) -> usize {
        self.q_table.n_actions()
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl Learner for QLearningAgent {
    fn select_action(&mut self, state: StateIndex, training: bool) -> Result<Action> {
        self.act(state, training)
    }

    fn learn(&mut self, transition: &Transition) -> Result<()> {
        self.update(transition)
    }

    fn on_training_start(&mut self, total_episodes: usize) {
        self.begin_training(total_episodes);
        debug!(
            total_episodes,
            epsilon = self.epsilon,
            epsilon_drop = self.epsilon_drop,
            "epsilon schedule prepared"
        );
    }

    fn on_episode_end(&mut self) {
        self.end_episode();
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn alpha(&self) -> Option<f64> {
        Some(self.alpha)
    }

    fn epsilon(&self) -> Option<f64> {
        Some(self.epsilon)
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}
