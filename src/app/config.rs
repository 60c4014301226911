//! Configuration types for run setup.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    envs::{DISCRETIZATION_HIGH, DISCRETIZATION_LOW, cart_pole::DEFAULT_MAX_STEPS},
    q_learning::Hyperparameters,
};

/// Configuration for creating a Q-learning agent.
///
/// This type provides a type-safe, builder-style API for configuring agents
/// before creation through the dependency injection container.
///
/// # Examples
///
/// ```
/// use polebalance::{app::AgentConfig, q_learning::Hyperparameters};
///
/// let config = AgentConfig::new()
///     .with_seed(42)
///     .with_hyperparameters(Hyperparameters {
///         alpha: 0.3,
///         ..Default::default()
///     });
/// assert_eq!(config.hyperparameters.alpha, 0.3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Learning, discount and exploration settings
    pub hyperparameters: Hyperparameters,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    /// Create a new agent configuration with default hyperparameters and no
    /// seed (non-deterministic).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hyperparameters(mut self, hyperparameters: Hyperparameters) -> Self {
        self.hyperparameters = hyperparameters;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Grid laid over the cart-pole observation space.
///
/// Defaults to 8 bins per dimension over the usual cart-pole bounds, since the
/// simulator leaves both velocities unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscretizerConfig {
    /// Interior bins per dimension
    pub n_bins: usize,
    /// Lower bounds overriding the environment's, one per dimension
    pub low: Option<Vec<f64>>,
    /// Upper bounds overriding the environment's, one per dimension
    pub high: Option<Vec<f64>>,
}

impl Default for DiscretizerConfig {
    fn default() -> Self {
        Self {
            n_bins: 8,
            low: Some(DISCRETIZATION_LOW.to_vec()),
            high: Some(DISCRETIZATION_HIGH.to_vec()),
        }
    }
}

impl DiscretizerConfig {
    pub fn with_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }

    pub fn with_bounds(mut self, low: Vec<f64>, high: Vec<f64>) -> Self {
        self.low = Some(low);
        self.high = Some(high);
        self
    }
}

/// Everything needed for a train-then-evaluate run.
///
/// Loaded from JSON; missing fields take their defaults, so a file may set
/// only what it changes:
///
/// ```json
/// { "train_episodes": 2000, "agent": { "seed": 7 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub agent: AgentConfig,
    pub discretizer: DiscretizerConfig,
    /// Number of training episodes
    pub train_episodes: usize,
    /// Number of greedy evaluation episodes after training
    pub eval_episodes: usize,
    /// Report interval in episodes (`None` disables reports)
    pub report_every: Option<usize>,
    /// Cart-pole step limit per episode
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            discretizer: DiscretizerConfig::default(),
            train_episodes: 1000,
            eval_episodes: 100,
            report_every: Some(10),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl RunConfig {
    /// Load a run configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened,
    /// [`Error::Serialization`] for malformed JSON, and the errors of
    /// [`RunConfig::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that are not checked when the agent and environment
    /// are built.
    pub fn validate(&self) -> Result<()> {
        self.agent.hyperparameters.validate()?;
        if self.discretizer.n_bins == 0 {
            return Err(Error::InvalidConfiguration {
                message: "discretizer.n_bins must be positive".to_string(),
            });
        }
        if self.report_every == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "report_every must be positive".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_steps must be positive".to_string(),
            });
        }
        Ok(())
    }
}
