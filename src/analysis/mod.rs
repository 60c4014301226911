//! Analysis tools for training and evaluation runs

pub mod stats;

pub use stats::RewardSummary;
