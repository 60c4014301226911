//! Descriptive statistics of reward sequences

use std::fmt;

use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min, OrderStatistics};

/// Count, moments and order statistics of a set of episode rewards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for fewer than two rewards
    pub std_dev: Option<f64>,
    pub min: f64,
    pub lower_quartile: f64,
    pub median: f64,
    pub upper_quartile: f64,
    pub max: f64,
}

impl RewardSummary {
    /// Summarize `rewards`; `None` when there is nothing to summarize.
    pub fn from_rewards(rewards: &[f64]) -> Option<Self> {
        if rewards.is_empty() {
            return None;
        }

        let mut data = Data::new(rewards.to_vec());
        Some(Self {
            count: rewards.len(),
            mean: data.mean()?,
            std_dev: data.std_dev(),
            min: data.min(),
            lower_quartile: data.lower_quartile(),
            median: data.median(),
            upper_quartile: data.upper_quartile(),
            max: data.max(),
        })
    }

    /// Rows in display order, labelled the way summary tables usually are
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std_dev.unwrap_or(f64::NAN)),
            ("min", self.min),
            ("25%", self.lower_quartile),
            ("50%", self.median),
            ("75%", self.upper_quartile),
            ("max", self.max),
        ]
    }
}

impl fmt::Display for RewardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.rows() {
            writeln!(f, "{label:<6} {value:>12.4}")?;
        }
        Ok(())
    }
}
