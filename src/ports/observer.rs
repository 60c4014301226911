//! Observer port - abstraction for training observation and data collection
//!
//! Observers receive training events without influencing learning, so
//! progress display, periodic reports and episode logs compose freely.

use crate::{
    Result,
    pipeline::{EpisodeReport, TrainingResult},
    types::Transition,
};

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(episode, step, transition)` - for each environment step
///    - `on_episode_end(report)`
///    - `on_report(report)` - only on reporting episodes
/// 3. `on_training_end(result)` - once at the end
///
/// # Examples
///
/// ```no_run
/// use polebalance::{pipeline::EpisodeReport, ports::Observer};
///
/// struct LongestEpisode {
///     best: f64,
/// }
///
/// impl Observer for LongestEpisode {
///     fn on_episode_end(&mut self, report: &EpisodeReport) -> polebalance::Result<()> {
///         self.best = self.best.max(report.reward);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each environment step, once the learner has been updated.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Step number within the episode (0-based)
    /// * `transition` - The transition that was just learned from
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends, after schedules were decayed.
    fn on_episode_end(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called every `report_every` episodes with the same running statistics
    /// passed to `on_episode_end`.
    fn on_report(&mut self, _report: &EpisodeReport) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
