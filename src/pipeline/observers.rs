//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::training::{EpisodeReport, TrainingResult};
use crate::{Result, ports::Observer, types::Transition};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    best_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            best_reward: f64::NEG_INFINITY,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.best_reward = self.best_reward.max(report.reward);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(report.episode as u64 + 1);
            pb.set_message(format!(
                "best: {} avg50: {:.2}",
                self.best_reward, report.average_reward
            ));
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "best: {} mean: {:.2}",
                result.max_reward, result.mean_reward
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
pub struct MetricsObserver {
    episodes: usize,
    total_steps: usize,
    best_reward: Option<f64>,
    reward_sum: f64,
    longest_episode: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            episodes: 0,
            total_steps: 0,
            best_reward: None,
            reward_sum: 0.0,
            longest_episode: 0,
        }
    }

    /// Get average episode length
    pub fn avg_episode_length(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.episodes as f64
        }
    }

    /// Get average episode reward
    pub fn avg_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.reward_sum / self.episodes as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            total_steps: self.total_steps,
            best_reward: self.best_reward,
            avg_reward: self.avg_reward(),
            avg_episode_length: self.avg_episode_length(),
            longest_episode: self.longest_episode,
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub total_steps: usize,
    pub best_reward: Option<f64>,
    pub avg_reward: f64,
    pub avg_episode_length: f64,
    pub longest_episode: usize,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        self.total_steps += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        self.episodes += 1;
        self.reward_sum += report.reward;
        self.longest_episode = self.longest_episode.max(report.steps);
        self.best_reward = Some(
            self.best_reward
                .map_or(report.reward, |best| best.max(report.reward)),
        );
        Ok(())
    }
}

/// Report observer - Logs the periodic training report through `tracing`
#[derive(Debug, Default)]
pub struct ReportObserver;

impl ReportObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for ReportObserver {
    fn on_report(&mut self, report: &EpisodeReport) -> Result<()> {
        info!(
            episode = report.episode,
            step = report.total_steps,
            best = report.best_reward,
            avg = report.recent_mean,
            recent = ?report.recent_rewards,
            alpha = report.alpha,
            epsilon = report.epsilon,
            "training progress"
        );
        Ok(())
    }
}

/// Callback observer - Hands each periodic report to a closure
///
/// ```
/// use polebalance::pipeline::{CallbackObserver, EpisodeReport};
///
/// let observer = CallbackObserver::new(|report: &EpisodeReport| {
///     println!("episode {} best {}", report.episode, report.best_reward);
/// });
/// # let _ = observer;
/// ```
pub struct CallbackObserver<F> {
    callback: F,
}

impl<F> CallbackObserver<F>
where
    F: FnMut(&EpisodeReport) + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Observer for CallbackObserver<F>
where
    F: FnMut(&EpisodeReport) + Send,
{
    fn on_report(&mut self, report: &EpisodeReport) -> Result<()> {
        (self.callback)(report);
        Ok(())
    }
}

/// One JSONL record per finished episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    #[serde(flatten)]
    pub report: EpisodeReport,
    /// Every transition of the episode, when step recording is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
}

/// JSONL observer - Exports observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_transitions: Vec<Transition>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing one line per episode
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        Ok(Self {
            writer,
            record_steps: false,
            current_transitions: Vec::new(),
        })
    }

    /// Also embed every transition of the episode in its line
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_transitions.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        if self.record_steps {
            self.current_transitions.push(*transition);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, report: &EpisodeReport) -> Result<()> {
        let observation = EpisodeObservation {
            report: report.clone(),
            transitions: std::mem::take(&mut self.current_transitions),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}
