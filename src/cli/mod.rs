//! CLI infrastructure for the polebalance binary
//!
//! This module provides the command-line interface for training and
//! evaluating Q-learning agents and inspecting discrete states.

pub mod commands;
pub mod output;
