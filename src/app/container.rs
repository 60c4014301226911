//! Dependency injection container for polebalance runs.
//!
//! The container owns run-wide defaults and provides factory methods that
//! wire environment, discretizer, agent and pipeline together.

use tracing::debug;

use super::config::{AgentConfig, RunConfig};
use crate::{
    Result,
    discretizer::Discretizer,
    envs::CartPole,
    pipeline::{ReportObserver, TrainingConfig, TrainingPipeline},
    ports::DiscreteEnvironment,
    q_learning::QLearningAgent,
};

/// Discretized cart-pole as seen by the agent
pub type DiscreteCartPole = Discretizer<CartPole>;

/// Application with dependency injection.
///
/// Centralizes creation and wiring of dependencies. Seeds come from the
/// configuration when set, otherwise from the container default.
///
/// # Examples
///
/// ## Production usage
///
/// ```
/// use polebalance::app::{App, RunConfig};
///
/// let app = App::new();
/// let config = RunConfig::default();
/// let env = app.create_environment(&config)?;
/// let agent = app.create_agent(&config.agent, &env)?;
/// assert_eq!(agent.n_states(), 10_000);
/// # Ok::<(), polebalance::Error>(())
/// ```
///
/// ## Testing with a fixed seed
///
/// ```
/// use polebalance::app::App;
///
/// let app = App::for_testing().with_default_seed(42).build();
/// assert_eq!(app.default_seed(), Some(42));
/// ```
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create a new app with production defaults (no default seed).
    pub fn new() -> Self {
        Self { default_seed: None }
    }

    /// Create a builder for constructing app with custom defaults.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new()
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Seed used for a run: the agent's configured seed, else the default.
    pub fn run_seed(&self, config: &RunConfig) -> Option<u64> {
        config.agent.seed.or(self.default_seed)
    }

    /// Build the discretized cart-pole described by `config`.
    ///
    /// The simulator is seeded one past the run seed so its start states do
    /// not share a stream with the agent's exploration.
    pub fn create_environment(&self, config: &RunConfig) -> Result<DiscreteCartPole> {
        config.validate()?;
        let mut env = CartPole::new().with_max_steps(config.max_steps);
        if let Some(seed) = self.run_seed(config) {
            env = env.with_seed(seed.wrapping_add(1));
        }
        Discretizer::with_bounds(
            env,
            config.discretizer.n_bins,
            config.discretizer.low.clone(),
            config.discretizer.high.clone(),
        )
    }

    /// Create a Q-learning agent sized for `env`.
    pub fn create_agent<E>(&self, config: &AgentConfig, env: &E) -> Result<QLearningAgent>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        let mut agent = QLearningAgent::for_environment(env, config.hyperparameters)?;
        if let Some(seed) = config.seed.or(self.default_seed) {
            agent = agent.with_seed(seed);
        }
        debug!(
            states = agent.n_states(),
            actions = agent.n_actions(),
            seed = agent.rng_seed(),
            "created Q-learning agent"
        );
        Ok(agent)
    }

    /// Create a training pipeline for `config`, logging periodic reports.
    pub fn create_pipeline(&self, config: &RunConfig) -> TrainingPipeline {
        let mut training = TrainingConfig::new(config.train_episodes);
        training.report_every = config.report_every;
        let pipeline = TrainingPipeline::new(training);
        if config.report_every.is_some() {
            pipeline.with_observer(Box::new(ReportObserver::new()))
        } else {
            pipeline
        }
    }
}

/// Builder for constructing app with custom defaults.
#[derive(Debug, Default)]
pub struct AppBuilder {
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the seed used when a configuration does not name one.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    pub fn build(self) -> App {
        App {
            default_seed: self.default_seed,
        }
    }
}
