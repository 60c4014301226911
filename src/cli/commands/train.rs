//! Train command - Train a Q-learning agent on the built-in cart-pole

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    analysis::RewardSummary,
    app::{App, RunConfig},
    cli::output::{format_number, print_kv, print_section, print_subsection},
    export::RewardCurveExporter,
    pipeline::{JsonlObserver, ProgressObserver, TrainingResult},
};

#[derive(Debug, Serialize)]
struct TrainingStats {
    episodes: usize,
    total_steps: usize,
    max_reward: f64,
    mean_reward: f64,
    final_reward_avg50: Option<f64>,
}

impl From<&TrainingResult> for TrainingStats {
    fn from(result: &TrainingResult) -> Self {
        Self {
            episodes: result.episodes(),
            total_steps: result.total_steps,
            max_reward: result.max_reward,
            mean_reward: result.mean_reward,
            final_reward_avg50: result.reward_averaged.last().copied(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: TrainingStats,
    evaluation: Option<RewardSummary>,
    evaluation_rewards: &'a [f64],
    config: &'a RunConfig,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent on cart-pole, then evaluate it")]
pub struct TrainArgs {
    /// JSON run configuration; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Number of greedy evaluation episodes
    #[arg(long)]
    pub eval_episodes: Option<usize>,

    /// Interior bins per observation dimension
    #[arg(long)]
    pub bins: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log a progress report every K episodes
    #[arg(long)]
    pub report_every: Option<usize>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for the per-episode reward curve (CSV)
    #[arg(long)]
    pub curve: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    /// Resolve the run configuration: file (or defaults), then flag overrides.
    pub fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(episodes) = self.episodes {
            config.train_episodes = episodes;
        }
        if let Some(episodes) = self.eval_episodes {
            config.eval_episodes = episodes;
        }
        if let Some(bins) = self.bins {
            config.discretizer.n_bins = bins;
        }
        if let Some(seed) = self.seed {
            config.agent.seed = Some(seed);
        }
        if let Some(every) = self.report_every {
            config.report_every = Some(every);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.run_config()?;
    let app = App::new();

    let mut env = app
        .create_environment(&config)
        .context("Failed to build the discretized environment")?;
    let mut agent = app.create_agent(&config.agent, &env)?;

    let mut pipeline = app.create_pipeline(&config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let result = agent.train_with(&mut env, &mut pipeline)?;
    let rewards = agent.evaluate(&mut env, config.eval_episodes)?;
    let evaluation = RewardSummary::from_rewards(&rewards);

    print_section("Training");
    print_kv("Episodes", &format_number(result.episodes()));
    print_kv("Total steps", &format_number(result.total_steps));
    print_kv("Max reward", &format!("{}", result.max_reward));
    print_kv("Average reward", &format!("{:.4}", result.mean_reward));
    print_kv("Final alpha", &format!("{:.4}", agent.current_alpha()));
    print_kv("Final epsilon", &format!("{:.4}", agent.current_epsilon()));

    print_section("Evaluation");
    match &evaluation {
        Some(summary) => {
            print_kv(
                "Reward history",
                &format!("avg {:.4} over {} episodes", summary.mean, summary.count),
            );
            print_subsection("Reward distribution");
            for (label, value) in summary.rows() {
                print_kv(label, &format!("{value:.4}"));
            }
        }
        None => print_kv("Reward history", "no evaluation episodes"),
    }

    if let Some(path) = &args.curve {
        RewardCurveExporter::export_to_file(path, &result)
            .with_context(|| format!("Failed to write reward curve {}", path.display()))?;
        print_kv("Reward curve", &path.display().to_string());
    }

    if let Some(path) = &args.summary {
        let path = sanitize_summary_path(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let summary = TrainingSummaryFile {
            training: TrainingStats::from(&result),
            evaluation,
            evaluation_rewards: &rewards,
            config: &config,
            seed: app.run_seed(&config),
        };
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        to_writer_pretty(file, &summary)?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_summary_path() {
        assert_eq!(
            sanitize_summary_path(Path::new("out/run")),
            PathBuf::from("out/run.json")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/run.JSON")),
            PathBuf::from("out/run.JSON")
        );
        assert_eq!(
            sanitize_summary_path(Path::new("out/")),
            PathBuf::from("out/training_summary.json")
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = TrainArgs::parse_from([
            "train",
            "--episodes",
            "12",
            "--bins",
            "5",
            "--seed",
            "4",
            "--report-every",
            "3",
        ]);
        let config = args.run_config().unwrap();
        assert_eq!(config.train_episodes, 12);
        assert_eq!(config.discretizer.n_bins, 5);
        assert_eq!(config.agent.seed, Some(4));
        assert_eq!(config.report_every, Some(3));
        assert_eq!(config.eval_episodes, 100);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = TrainArgs::parse_from(["train", "--bins", "0"]);
        assert!(args.run_config().is_err());
    }
}
