//! Export functionality for analysis and plotting
//!
//! Plotting is left to external tools; this module writes the numbers they
//! need. Currently supports CSV export of reward curves.

mod reward_csv;

pub use reward_csv::{RewardCurveExporter, RewardCurveRecord};
