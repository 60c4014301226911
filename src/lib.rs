//! Tabular Q-learning over discretized continuous observations
//!
//! This crate provides:
//! - A discretizer that turns continuous observation vectors into integer
//!   states by binning each dimension and mixed-radix encoding the bins
//! - A Q-learning agent with epsilon-greedy exploration and decaying
//!   learning and exploration rates
//! - A training pipeline with composable observers (progress, periodic
//!   reports, JSONL episode logs)
//! - A cart-pole simulator, reward statistics and CSV export of learning
//!   curves

pub mod analysis;
pub mod app;
pub mod cli;
pub mod discretizer;
pub mod envs;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use discretizer::Discretizer;
pub use error::{Error, Result};
pub use q_learning::{AgentSnapshot, Hyperparameters, QLearningAgent};
pub use types::{Action, StateIndex, Step, Transition};
