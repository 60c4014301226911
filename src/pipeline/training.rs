//! Training pipeline for tabular learners

use std::{collections::VecDeque, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    ports::{DiscreteEnvironment, Learner, Observer},
    types::Transition,
};

/// Width of the rolling reward average recorded every episode
pub const AVERAGE_WINDOW: usize = 50;

/// Rewards averaged into [`EpisodeReport::recent_mean`]
pub const RECENT_MEAN_WINDOW: usize = 10;

/// Rewards listed in [`EpisodeReport::recent_rewards`]
pub const RECENT_REWARDS: usize = 5;

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Report interval; episodes with `episode % report_every == 0` are
    /// reported to observers
    pub report_every: Option<usize>,

    /// Random seed applied to the learner before the run
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            report_every: None,
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn new(episodes: usize) -> Self {
        Self {
            episodes,
            ..Default::default()
        }
    }

    pub fn with_report_every(mut self, every: usize) -> Self {
        self.report_every = Some(every);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.report_every == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "report interval must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Running statistics after one training episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Episode index (0-based)
    pub episode: usize,
    /// Steps taken in this episode
    pub steps: usize,
    /// Total reward of this episode
    pub reward: f64,
    /// Steps taken since training started
    pub total_steps: usize,
    /// Best episode reward so far
    pub best_reward: f64,
    /// Mean reward of the last 10 episodes
    pub recent_mean: f64,
    /// Rewards of the last 5 episodes, oldest first
    pub recent_rewards: Vec<f64>,
    /// Mean reward of the last 50 episodes
    pub average_reward: f64,
    /// Learning rate after this episode's decay
    pub alpha: Option<f64>,
    /// Exploration rate after this episode's decay
    pub epsilon: Option<f64>,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Name of the trained learner
    pub learner: String,

    /// Total reward of every episode, in order
    pub reward_history: Vec<f64>,

    /// Rolling mean over the last 50 episodes, one entry per episode
    pub reward_averaged: Vec<f64>,

    /// Environment steps across all episodes
    pub total_steps: usize,

    /// Best episode reward (0 for an empty run)
    pub max_reward: f64,

    /// Mean episode reward (0 for an empty run)
    pub mean_reward: f64,
}

impl TrainingResult {
    /// Create a new training result, deriving the rolling average and totals.
    pub fn new(learner: impl Into<String>, reward_history: Vec<f64>, total_steps: usize) -> Self {
        let reward_averaged = rolling_mean(&reward_history, AVERAGE_WINDOW);
        let max_reward = if reward_history.is_empty() {
            0.0
        } else {
            reward_history
                .iter()
                .copied()
                .fold(f64::NEG_INFINITY, f64::max)
        };
        let mean_reward = mean(&reward_history);

        Self {
            learner: learner.into(),
            reward_history,
            reward_averaged,
            total_steps,
            max_reward,
            mean_reward,
        }
    }

    pub fn episodes(&self) -> usize {
        self.reward_history.len()
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Mean of the trailing `window` values at every position.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|end| mean(&values[(end + 1).saturating_sub(window)..=end]))
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Training pipeline for a single learner on a discrete environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run training with the given learner and environment
    ///
    /// Each episode resets the environment, then alternates action
    /// selection, stepping and learning until the environment reports
    /// termination. The learner decays its schedules after every episode.
    ///
    /// # Errors
    ///
    /// Any environment, learner or observer error aborts the run; the
    /// episode in progress is not recorded.
    pub fn run<E>(&mut self, learner: &mut dyn Learner, env: &mut E) -> Result<TrainingResult>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            learner.set_rng_seed(seed)?;
        }

        let episodes = self.config.episodes;
        learner.on_training_start(episodes);
        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut reward_history = Vec::with_capacity(episodes);
        let mut window: VecDeque<f64> = VecDeque::with_capacity(AVERAGE_WINDOW);
        let mut total_steps = 0;
        let mut best_reward = f64::NEG_INFINITY;

        for episode in 0..episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let (reward, steps) = self.train_episode(episode, learner, env)?;
            learner.on_episode_end();

            total_steps += steps;
            best_reward = best_reward.max(reward);
            reward_history.push(reward);
            if window.len() == AVERAGE_WINDOW {
                window.pop_front();
            }
            window.push_back(reward);

            let recent_start = reward_history.len().saturating_sub(RECENT_REWARDS);
            let report = EpisodeReport {
                episode,
                steps,
                reward,
                total_steps,
                best_reward,
                recent_mean: mean(
                    &reward_history[reward_history.len().saturating_sub(RECENT_MEAN_WINDOW)..],
                ),
                recent_rewards: reward_history[recent_start..].to_vec(),
                average_reward: window.iter().sum::<f64>() / window.len() as f64,
                alpha: learner.alpha(),
                epsilon: learner.epsilon(),
            };

            debug!(
                episode,
                steps,
                reward,
                average = report.average_reward,
                "episode finished"
            );

            for observer in &mut self.observers {
                observer.on_episode_end(&report)?;
            }
            if self
                .config
                .report_every
                .is_some_and(|every| episode % every == 0)
            {
                for observer in &mut self.observers {
                    observer.on_report(&report)?;
                }
            }
        }

        let result = TrainingResult::new(learner.name(), reward_history, total_steps);
        info!(
            learner = %result.learner,
            episodes = result.episodes(),
            max_reward = result.max_reward,
            mean_reward = result.mean_reward,
            "training completed"
        );

        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }

        Ok(result)
    }

    /// Evaluate a learner greedily; observers are not notified.
    pub fn evaluate<E>(
        &mut self,
        learner: &mut dyn Learner,
        env: &mut E,
        episodes: usize,
    ) -> Result<Vec<f64>>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        evaluate_learner(learner, env, episodes)
    }

    fn train_episode<E>(
        &mut self,
        episode: usize,
        learner: &mut dyn Learner,
        env: &mut E,
    ) -> Result<(f64, usize)>
    where
        E: DiscreteEnvironment + ?Sized,
    {
        let mut state = env.reset()?;
        let mut reward_episode = 0.0;
        let mut step_num = 0;

        loop {
            let action = learner.select_action(state, true)?;
            let step = env.step(action)?;
            let transition = Transition::new(state, action, step.observation, step.reward, step.done);
            learner.learn(&transition)?;

            for observer in &mut self.observers {
                observer.on_step(episode, step_num, &transition)?;
            }

            step_num += 1;
            reward_episode += step.reward;
            state = step.observation;
            if step.done {
                break;
            }
        }

        Ok((reward_episode, step_num))
    }
}

/// Roll out `episodes` greedy episodes and return each total reward.
///
/// The learner is asked for actions with `training == false` and never
/// learns, so value tables and schedules are left untouched.
pub fn evaluate_learner<E>(
    learner: &mut dyn Learner,
    env: &mut E,
    episodes: usize,
) -> Result<Vec<f64>>
where
    E: DiscreteEnvironment + ?Sized,
{
    let mut reward_history = Vec::with_capacity(episodes);
    for _ in 0..episodes {
        let mut state = env.reset()?;
        let mut reward_episode = 0.0;
        loop {
            let action = learner.select_action(state, false)?;
            let step = env.step(action)?;
            reward_episode += step.reward;
            state = step.observation;
            if step.done {
                break;
            }
        }
        reward_history.push(reward_episode);
    }
    debug!(episodes, learner = learner.name(), "evaluation finished");
    Ok(reward_history)
}
